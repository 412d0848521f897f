//! SSE2 engine (x86_64)
//!
//! Maps the vocabulary onto `std::arch::x86_64`. Only SSE2 is assumed, since
//! it is part of the x86_64 baseline; the two operations that first appear in
//! SSE4.1 (`pmulld`, `pminsd`/`pmaxsd`) are composed from SSE2 instructions.
//!
//! `_mm_set_ps` takes its arguments high lane first, so `set_ps` uses the
//! `setr` forms to keep lane 0 = first argument.

use super::LaneEngine;
use super::types::simd_arch::*;

/// 128-bit SSE2 engine.
#[derive(Clone, Copy, Debug)]
pub struct SseEngine;

#[allow(unused_unsafe)]
impl LaneEngine for SseEngine {
    const NAME: &'static str = "sse2";

    type F32x4 = __m128;
    type I32x4 = __m128i;

    #[inline]
    fn set1_ps(a: f32) -> __m128 {
        unsafe { _mm_set1_ps(a) }
    }

    #[inline]
    fn set_ps(a: f32, b: f32, c: f32, d: f32) -> __m128 {
        unsafe { _mm_setr_ps(a, b, c, d) }
    }

    #[inline]
    fn set1_epi32(a: i32) -> __m128i {
        unsafe { _mm_set1_epi32(a) }
    }

    #[inline]
    fn set_epi32(a: i32, b: i32, c: i32, d: i32) -> __m128i {
        unsafe { _mm_setr_epi32(a, b, c, d) }
    }

    #[inline]
    unsafe fn load_ps(p: *const f32) -> __m128 {
        unsafe { _mm_load_ps(p) }
    }

    #[inline]
    unsafe fn loadu_ps(p: *const f32) -> __m128 {
        unsafe { _mm_loadu_ps(p) }
    }

    #[inline]
    unsafe fn store_ps(p: *mut f32, a: __m128) {
        unsafe { _mm_store_ps(p, a) }
    }

    #[inline]
    unsafe fn storeu_ps(p: *mut f32, a: __m128) {
        unsafe { _mm_storeu_ps(p, a) }
    }

    #[inline]
    unsafe fn store_ss(p: *mut f32, a: __m128) {
        unsafe { _mm_store_ss(p, a) }
    }

    #[inline]
    unsafe fn load_epi32(p: *const i32) -> __m128i {
        unsafe { _mm_load_si128(p as *const __m128i) }
    }

    #[inline]
    unsafe fn loadu_epi32(p: *const i32) -> __m128i {
        unsafe { _mm_loadu_si128(p as *const __m128i) }
    }

    #[inline]
    unsafe fn store_epi32(p: *mut i32, a: __m128i) {
        unsafe { _mm_store_si128(p as *mut __m128i, a) }
    }

    #[inline]
    unsafe fn storeu_epi32(p: *mut i32, a: __m128i) {
        unsafe { _mm_storeu_si128(p as *mut __m128i, a) }
    }

    #[inline]
    unsafe fn store1_epi32(p: *mut i32, a: __m128i) {
        unsafe { *p = _mm_cvtsi128_si32(a) }
    }

    #[inline]
    fn add_ps(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_add_ps(a, b) }
    }

    #[inline]
    fn sub_ps(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_sub_ps(a, b) }
    }

    #[inline]
    fn mul_ps(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_mul_ps(a, b) }
    }

    #[inline]
    fn div_ps(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_div_ps(a, b) }
    }

    #[inline]
    fn rcp_ps(a: __m128) -> __m128 {
        unsafe { _mm_rcp_ps(a) }
    }

    #[inline]
    fn rsqrt_ps(a: __m128) -> __m128 {
        unsafe { _mm_rsqrt_ps(a) }
    }

    #[inline]
    fn min_ps(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_min_ps(a, b) }
    }

    #[inline]
    fn max_ps(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_max_ps(a, b) }
    }

    #[inline]
    fn add_epi32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_add_epi32(a, b) }
    }

    #[inline]
    fn sub_epi32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_sub_epi32(a, b) }
    }

    #[inline]
    fn mullo_epi32(a: __m128i, b: __m128i) -> __m128i {
        // pmuludq multiplies lanes 0 and 2 into 64-bit products; shifting by
        // one lane brings 1 and 3 into position. The low halves of unsigned
        // and signed products agree, then get re-interleaved.
        unsafe {
            let even = _mm_mul_epu32(a, b);
            let odd = _mm_mul_epu32(_mm_srli_si128(a, 4), _mm_srli_si128(b, 4));
            let even = _mm_shuffle_epi32(even, 0b00_00_10_00);
            let odd = _mm_shuffle_epi32(odd, 0b00_00_10_00);
            _mm_unpacklo_epi32(even, odd)
        }
    }

    #[inline]
    fn min_epi32(a: __m128i, b: __m128i) -> __m128i {
        unsafe {
            let a_gt = _mm_cmpgt_epi32(a, b);
            _mm_or_si128(_mm_and_si128(a_gt, b), _mm_andnot_si128(a_gt, a))
        }
    }

    #[inline]
    fn max_epi32(a: __m128i, b: __m128i) -> __m128i {
        unsafe {
            let a_gt = _mm_cmpgt_epi32(a, b);
            _mm_or_si128(_mm_and_si128(a_gt, a), _mm_andnot_si128(a_gt, b))
        }
    }

    #[inline]
    fn and_si(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_and_si128(a, b) }
    }

    #[inline]
    fn or_si(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_or_si128(a, b) }
    }

    #[inline]
    fn xor_si(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_xor_si128(a, b) }
    }

    #[inline]
    fn andnot_si(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_andnot_si128(a, b) }
    }

    #[inline]
    fn cast_ps_si(a: __m128) -> __m128i {
        unsafe { _mm_castps_si128(a) }
    }

    #[inline]
    fn cast_si_ps(a: __m128i) -> __m128 {
        unsafe { _mm_castsi128_ps(a) }
    }

    #[inline]
    fn cmpgt_ps(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmpgt_ps(a, b) }
    }

    #[inline]
    fn cmplt_ps(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_cmplt_ps(a, b) }
    }

    #[inline]
    fn cmpgt_epi32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_cmpgt_epi32(a, b) }
    }

    #[inline]
    fn cmplt_epi32(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_cmplt_epi32(a, b) }
    }

    #[inline]
    fn cvtepi32_ps(a: __m128i) -> __m128 {
        unsafe { _mm_cvtepi32_ps(a) }
    }

    #[inline]
    fn cvttps_epi32(a: __m128) -> __m128i {
        // Out-of-range and NaN lanes become 0x8000_0000.
        unsafe { _mm_cvttps_epi32(a) }
    }
}
