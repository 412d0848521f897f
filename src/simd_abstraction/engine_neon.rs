//! NEON engine (aarch64)
//!
//! Maps the vocabulary onto `std::arch::aarch64`. NEON loads and stores have
//! no alignment requirement, so the aligned and unaligned variants share one
//! instruction; the aligned precondition is still part of the contract so
//! code stays portable to SSE.
//!
//! Differences from the x86 forms that this engine papers over:
//! - comparisons return `uint32x4_t` and are reinterpreted to the lane type;
//! - `vbic(x, y)` computes `x & !y`, so `andnot_si` swaps its operands;
//! - `vcvtq_s32_f32` saturates out-of-range lanes and maps NaN to 0 where
//!   SSE returns `i32::MIN`.

use super::LaneEngine;
use super::types::simd_arch::*;

/// 128-bit NEON engine.
#[derive(Clone, Copy, Debug)]
pub struct NeonEngine;

#[allow(unused_unsafe)]
impl LaneEngine for NeonEngine {
    const NAME: &'static str = "neon";

    type F32x4 = float32x4_t;
    type I32x4 = int32x4_t;

    #[inline]
    fn set1_ps(a: f32) -> float32x4_t {
        unsafe { vdupq_n_f32(a) }
    }

    #[inline]
    fn set_ps(a: f32, b: f32, c: f32, d: f32) -> float32x4_t {
        unsafe {
            let v = vdupq_n_f32(a);
            let v = vsetq_lane_f32::<1>(b, v);
            let v = vsetq_lane_f32::<2>(c, v);
            vsetq_lane_f32::<3>(d, v)
        }
    }

    #[inline]
    fn set1_epi32(a: i32) -> int32x4_t {
        unsafe { vdupq_n_s32(a) }
    }

    #[inline]
    fn set_epi32(a: i32, b: i32, c: i32, d: i32) -> int32x4_t {
        unsafe {
            let v = vdupq_n_s32(a);
            let v = vsetq_lane_s32::<1>(b, v);
            let v = vsetq_lane_s32::<2>(c, v);
            vsetq_lane_s32::<3>(d, v)
        }
    }

    #[inline]
    unsafe fn load_ps(p: *const f32) -> float32x4_t {
        unsafe { vld1q_f32(p) }
    }

    #[inline]
    unsafe fn loadu_ps(p: *const f32) -> float32x4_t {
        unsafe { vld1q_f32(p) }
    }

    #[inline]
    unsafe fn store_ps(p: *mut f32, a: float32x4_t) {
        unsafe { vst1q_f32(p, a) }
    }

    #[inline]
    unsafe fn storeu_ps(p: *mut f32, a: float32x4_t) {
        unsafe { vst1q_f32(p, a) }
    }

    #[inline]
    unsafe fn store_ss(p: *mut f32, a: float32x4_t) {
        unsafe { vst1q_lane_f32::<0>(p, a) }
    }

    #[inline]
    unsafe fn load_epi32(p: *const i32) -> int32x4_t {
        unsafe { vld1q_s32(p) }
    }

    #[inline]
    unsafe fn loadu_epi32(p: *const i32) -> int32x4_t {
        unsafe { vld1q_s32(p) }
    }

    #[inline]
    unsafe fn store_epi32(p: *mut i32, a: int32x4_t) {
        unsafe { vst1q_s32(p, a) }
    }

    #[inline]
    unsafe fn storeu_epi32(p: *mut i32, a: int32x4_t) {
        unsafe { vst1q_s32(p, a) }
    }

    #[inline]
    unsafe fn store1_epi32(p: *mut i32, a: int32x4_t) {
        unsafe { vst1q_lane_s32::<0>(p, a) }
    }

    #[inline]
    fn add_ps(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vaddq_f32(a, b) }
    }

    #[inline]
    fn sub_ps(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vsubq_f32(a, b) }
    }

    #[inline]
    fn mul_ps(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vmulq_f32(a, b) }
    }

    #[inline]
    fn div_ps(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vdivq_f32(a, b) }
    }

    #[inline]
    fn rcp_ps(a: float32x4_t) -> float32x4_t {
        unsafe { vrecpeq_f32(a) }
    }

    #[inline]
    fn rsqrt_ps(a: float32x4_t) -> float32x4_t {
        unsafe { vrsqrteq_f32(a) }
    }

    #[inline]
    fn min_ps(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vminq_f32(a, b) }
    }

    #[inline]
    fn max_ps(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vmaxq_f32(a, b) }
    }

    #[inline]
    fn add_epi32(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vaddq_s32(a, b) }
    }

    #[inline]
    fn sub_epi32(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vsubq_s32(a, b) }
    }

    #[inline]
    fn mullo_epi32(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vmulq_s32(a, b) }
    }

    #[inline]
    fn min_epi32(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vminq_s32(a, b) }
    }

    #[inline]
    fn max_epi32(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vmaxq_s32(a, b) }
    }

    #[inline]
    fn and_si(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vandq_s32(a, b) }
    }

    #[inline]
    fn or_si(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vorrq_s32(a, b) }
    }

    #[inline]
    fn xor_si(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { veorq_s32(a, b) }
    }

    #[inline]
    fn andnot_si(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vbicq_s32(b, a) }
    }

    #[inline]
    fn cast_ps_si(a: float32x4_t) -> int32x4_t {
        unsafe { vreinterpretq_s32_f32(a) }
    }

    #[inline]
    fn cast_si_ps(a: int32x4_t) -> float32x4_t {
        unsafe { vreinterpretq_f32_s32(a) }
    }

    #[inline]
    fn cmpgt_ps(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vreinterpretq_f32_u32(vcgtq_f32(a, b)) }
    }

    #[inline]
    fn cmplt_ps(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vreinterpretq_f32_u32(vcltq_f32(a, b)) }
    }

    #[inline]
    fn cmpgt_epi32(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vreinterpretq_s32_u32(vcgtq_s32(a, b)) }
    }

    #[inline]
    fn cmplt_epi32(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vreinterpretq_s32_u32(vcltq_s32(a, b)) }
    }

    #[inline]
    fn cvtepi32_ps(a: int32x4_t) -> float32x4_t {
        unsafe { vcvtq_f32_s32(a) }
    }

    #[inline]
    fn cvttps_epi32(a: float32x4_t) -> int32x4_t {
        unsafe { vcvtq_s32_f32(a) }
    }
}
