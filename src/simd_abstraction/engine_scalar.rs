//! Portable scalar engine
//!
//! Lanes are plain arrays processed one element at a time. It reproduces the
//! SIMD engines bit for bit on finite inputs (IEEE add/sub/mul/div, wrapping
//! integer ops, all-ones masks, truncating conversion) and serves as the
//! reference that the parity tests and the conformance runner compare
//! against.
//!
//! Engine-specific corners follow these rules:
//! - `min_ps`/`max_ps` return the second operand when the comparison is false
//!   (x86 `minps`/`maxps` semantics, including NaN);
//! - `rcp_ps`/`rsqrt_ps` are exact, which is trivially within tolerance;
//! - `cvttps_epi32` uses Rust `as` casts: saturating, NaN to 0 (NEON semantics).

use super::LaneEngine;
use super::types::MASK_TRUE;

/// Array-of-lanes engine.
#[derive(Clone, Copy, Debug)]
pub struct ScalarEngine;

#[inline]
fn map<T: Copy, U>(a: [T; 4], f: impl Fn(T) -> U) -> [U; 4] {
    [f(a[0]), f(a[1]), f(a[2]), f(a[3])]
}

#[inline]
fn zip<T: Copy, U>(a: [T; 4], b: [T; 4], f: impl Fn(T, T) -> U) -> [U; 4] {
    [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3])]
}

#[inline]
fn mask_f32(cond: bool) -> f32 {
    f32::from_bits(if cond { MASK_TRUE } else { 0 })
}

#[inline]
fn mask_i32(cond: bool) -> i32 {
    if cond { -1 } else { 0 }
}

impl LaneEngine for ScalarEngine {
    const NAME: &'static str = "scalar";

    type F32x4 = [f32; 4];
    type I32x4 = [i32; 4];

    #[inline]
    fn set1_ps(a: f32) -> [f32; 4] {
        [a; 4]
    }

    #[inline]
    fn set_ps(a: f32, b: f32, c: f32, d: f32) -> [f32; 4] {
        [a, b, c, d]
    }

    #[inline]
    fn set1_epi32(a: i32) -> [i32; 4] {
        [a; 4]
    }

    #[inline]
    fn set_epi32(a: i32, b: i32, c: i32, d: i32) -> [i32; 4] {
        [a, b, c, d]
    }

    #[inline]
    unsafe fn load_ps(p: *const f32) -> [f32; 4] {
        unsafe { (p as *const [f32; 4]).read() }
    }

    #[inline]
    unsafe fn loadu_ps(p: *const f32) -> [f32; 4] {
        unsafe { (p as *const [f32; 4]).read_unaligned() }
    }

    #[inline]
    unsafe fn store_ps(p: *mut f32, a: [f32; 4]) {
        unsafe { (p as *mut [f32; 4]).write(a) }
    }

    #[inline]
    unsafe fn storeu_ps(p: *mut f32, a: [f32; 4]) {
        unsafe { (p as *mut [f32; 4]).write_unaligned(a) }
    }

    #[inline]
    unsafe fn store_ss(p: *mut f32, a: [f32; 4]) {
        unsafe { p.write_unaligned(a[0]) }
    }

    #[inline]
    unsafe fn load_epi32(p: *const i32) -> [i32; 4] {
        unsafe { (p as *const [i32; 4]).read() }
    }

    #[inline]
    unsafe fn loadu_epi32(p: *const i32) -> [i32; 4] {
        unsafe { (p as *const [i32; 4]).read_unaligned() }
    }

    #[inline]
    unsafe fn store_epi32(p: *mut i32, a: [i32; 4]) {
        unsafe { (p as *mut [i32; 4]).write(a) }
    }

    #[inline]
    unsafe fn storeu_epi32(p: *mut i32, a: [i32; 4]) {
        unsafe { (p as *mut [i32; 4]).write_unaligned(a) }
    }

    #[inline]
    unsafe fn store1_epi32(p: *mut i32, a: [i32; 4]) {
        unsafe { p.write_unaligned(a[0]) }
    }

    #[inline]
    fn add_ps(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| x + y)
    }

    #[inline]
    fn sub_ps(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| x - y)
    }

    #[inline]
    fn mul_ps(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| x * y)
    }

    #[inline]
    fn div_ps(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| x / y)
    }

    #[inline]
    fn rcp_ps(a: [f32; 4]) -> [f32; 4] {
        map(a, |x| 1.0 / x)
    }

    #[inline]
    fn rsqrt_ps(a: [f32; 4]) -> [f32; 4] {
        map(a, |x| 1.0 / x.sqrt())
    }

    #[inline]
    fn min_ps(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| if x < y { x } else { y })
    }

    #[inline]
    fn max_ps(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| if x > y { x } else { y })
    }

    #[inline]
    fn add_epi32(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, i32::wrapping_add)
    }

    #[inline]
    fn sub_epi32(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, i32::wrapping_sub)
    }

    #[inline]
    fn mullo_epi32(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, i32::wrapping_mul)
    }

    #[inline]
    fn min_epi32(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, i32::min)
    }

    #[inline]
    fn max_epi32(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, i32::max)
    }

    #[inline]
    fn and_si(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, |x, y| x & y)
    }

    #[inline]
    fn or_si(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, |x, y| x | y)
    }

    #[inline]
    fn xor_si(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, |x, y| x ^ y)
    }

    #[inline]
    fn andnot_si(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, |x, y| !x & y)
    }

    #[inline]
    fn cast_ps_si(a: [f32; 4]) -> [i32; 4] {
        map(a, |x| x.to_bits() as i32)
    }

    #[inline]
    fn cast_si_ps(a: [i32; 4]) -> [f32; 4] {
        map(a, |x| f32::from_bits(x as u32))
    }

    #[inline]
    fn cmpgt_ps(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| mask_f32(x > y))
    }

    #[inline]
    fn cmplt_ps(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        zip(a, b, |x, y| mask_f32(x < y))
    }

    #[inline]
    fn cmpgt_epi32(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, |x, y| mask_i32(x > y))
    }

    #[inline]
    fn cmplt_epi32(a: [i32; 4], b: [i32; 4]) -> [i32; 4] {
        zip(a, b, |x, y| mask_i32(x < y))
    }

    #[inline]
    fn cvtepi32_ps(a: [i32; 4]) -> [f32; 4] {
        map(a, |x| x as f32)
    }

    #[inline]
    fn cvttps_epi32(a: [f32; 4]) -> [i32; 4] {
        map(a, |x| x as i32)
    }
}
