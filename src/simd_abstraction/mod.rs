//! SIMD abstraction layer
//!
//! This module exposes one portable vocabulary for 4-lane packed 32-bit
//! arithmetic and hides the ISA differences between x86_64 (SSE2) and aarch64
//! (NEON) behind the `LaneEngine` trait. Every engine implements the same
//! trait with identical lane semantics, so kernels written against it compile
//! unchanged on either instruction set.
//!
//! ## Engines
//!
//! - `SseEngine`: SSE2 on x86_64 (`std::arch::x86_64`)
//! - `NeonEngine`: NEON on aarch64 (`std::arch::aarch64`)
//! - `ScalarEngine`: plain `[f32; 4]` / `[i32; 4]` lanes. Used on every other
//!   target, when the `scalar-backend` feature is enabled, and as the
//!   reference the SIMD engines are checked against.
//!
//! ## Build-time selection
//!
//! There is no runtime dispatch. `ActiveEngine` is a type alias resolved by
//! `cfg` from the target architecture and the `scalar-backend` feature, so a
//! call through the vocabulary compiles down to the bare intrinsic.
//!
//! ## Safety model
//!
//! SSE2 is part of the x86_64 baseline and NEON part of the aarch64 baseline,
//! so the arithmetic, logical, comparison and conversion functions are safe.
//! Only the memory transfers are `unsafe`: pointers must be valid for 4 lanes
//! and, for the aligned variants, aligned to `ALIGNMENT` bytes. Misalignment
//! is undefined behavior and is never checked at runtime.
//!
//! ## Approximations
//!
//! `rcp` and `rcp_sqrt` return the hardware estimate with no Newton-Raphson
//! step, and `sqrt` is defined as `rcp(rcp_sqrt(x))` on every engine. Results
//! differ between engines within `RCP_REL_TOLERANCE` / `SQRT_REL_TOLERANCE`.

pub mod engine_scalar;
pub mod types;

#[cfg(target_arch = "aarch64")]
pub mod engine_neon;
#[cfg(target_arch = "x86_64")]
pub mod engine_sse;

#[cfg(test)]
mod neon_tests;

pub use engine_scalar::ScalarEngine;
#[cfg(target_arch = "aarch64")]
pub use engine_neon::NeonEngine;
#[cfg(target_arch = "x86_64")]
pub use engine_sse::SseEngine;
pub use types::{ALIGNMENT, LANES, MASK_TRUE, RCP_REL_TOLERANCE, SQRT_REL_TOLERANCE};

/// Trait for a 4-lane SIMD engine, the closed vocabulary at native-vector level.
///
/// Suffixes follow the x86 convention: `_ps` for packed f32, `_epi32` for
/// packed i32 arithmetic, `_si` for raw 128-bit integer bits.
pub trait LaneEngine: Sized + Copy {
    /// Short name of the instruction set, for diagnostics.
    const NAME: &'static str;

    /// Native 4 x f32 vector type.
    type F32x4: Copy;
    /// Native 4 x i32 vector type.
    type I32x4: Copy;

    // ===== Creation =====
    /// Broadcast `a` into all four lanes.
    fn set1_ps(a: f32) -> Self::F32x4;
    /// Lane 0 = `a`, lane 1 = `b`, lane 2 = `c`, lane 3 = `d`.
    fn set_ps(a: f32, b: f32, c: f32, d: f32) -> Self::F32x4;
    /// Broadcast `a` into all four lanes.
    fn set1_epi32(a: i32) -> Self::I32x4;
    /// Lane 0 = `a`, lane 1 = `b`, lane 2 = `c`, lane 3 = `d`.
    fn set_epi32(a: i32, b: i32, c: i32, d: i32) -> Self::I32x4;

    // ===== Memory Operations =====
    /// Load 4 lanes from an aligned pointer.
    ///
    /// # Safety
    /// `p` must be valid for reading 4 f32 and aligned to `ALIGNMENT` bytes.
    unsafe fn load_ps(p: *const f32) -> Self::F32x4;
    /// Load 4 lanes from any address.
    ///
    /// # Safety
    /// `p` must be valid for reading 4 f32.
    unsafe fn loadu_ps(p: *const f32) -> Self::F32x4;
    /// Store 4 lanes to an aligned pointer.
    ///
    /// # Safety
    /// `p` must be valid for writing 4 f32 and aligned to `ALIGNMENT` bytes.
    unsafe fn store_ps(p: *mut f32, a: Self::F32x4);
    /// Store 4 lanes to any address.
    ///
    /// # Safety
    /// `p` must be valid for writing 4 f32.
    unsafe fn storeu_ps(p: *mut f32, a: Self::F32x4);
    /// Store lane 0 only.
    ///
    /// # Safety
    /// `p` must be valid for writing one f32.
    unsafe fn store_ss(p: *mut f32, a: Self::F32x4);
    /// # Safety
    /// `p` must be valid for reading 4 i32 and aligned to `ALIGNMENT` bytes.
    unsafe fn load_epi32(p: *const i32) -> Self::I32x4;
    /// # Safety
    /// `p` must be valid for reading 4 i32.
    unsafe fn loadu_epi32(p: *const i32) -> Self::I32x4;
    /// # Safety
    /// `p` must be valid for writing 4 i32 and aligned to `ALIGNMENT` bytes.
    unsafe fn store_epi32(p: *mut i32, a: Self::I32x4);
    /// # Safety
    /// `p` must be valid for writing 4 i32.
    unsafe fn storeu_epi32(p: *mut i32, a: Self::I32x4);
    /// # Safety
    /// `p` must be valid for writing one i32.
    unsafe fn store1_epi32(p: *mut i32, a: Self::I32x4);

    // ===== Float Arithmetic =====
    fn add_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4;
    fn sub_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4;
    fn mul_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4;
    /// Exact IEEE division.
    fn div_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4;
    /// Hardware reciprocal estimate, within `RCP_REL_TOLERANCE`.
    fn rcp_ps(a: Self::F32x4) -> Self::F32x4;
    /// Hardware reciprocal square root estimate, within `SQRT_REL_TOLERANCE`.
    fn rsqrt_ps(a: Self::F32x4) -> Self::F32x4;
    /// Lane-wise minimum. With a NaN operand the result is engine-specific.
    fn min_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4;
    /// Lane-wise maximum. With a NaN operand the result is engine-specific.
    fn max_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4;

    /// Approximate square root, `rcp(rsqrt(a))`. Not IEEE `sqrt`.
    #[inline]
    fn sqrt_ps(a: Self::F32x4) -> Self::F32x4 {
        Self::rcp_ps(Self::rsqrt_ps(a))
    }

    // ===== Integer Arithmetic =====
    /// Wrapping add.
    fn add_epi32(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;
    /// Wrapping subtract.
    fn sub_epi32(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;
    /// Low 32 bits of the lane products.
    fn mullo_epi32(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;
    fn min_epi32(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;
    fn max_epi32(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;

    // ===== Bitwise Operations =====
    fn and_si(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;
    fn or_si(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;
    fn xor_si(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;
    /// `!a & b`, x86 operand order on every engine.
    fn andnot_si(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;

    // ===== Bit Casts =====
    /// Reinterpret float lanes as integer lanes, bits unchanged.
    fn cast_ps_si(a: Self::F32x4) -> Self::I32x4;
    /// Reinterpret integer lanes as float lanes, bits unchanged.
    fn cast_si_ps(a: Self::I32x4) -> Self::F32x4;

    // Float logical ops go through the integer unit via explicit casts. The
    // result is only meaningful as a bit pattern (masks), not as arithmetic data.
    #[inline]
    fn and_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4 {
        Self::cast_si_ps(Self::and_si(Self::cast_ps_si(a), Self::cast_ps_si(b)))
    }
    #[inline]
    fn or_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4 {
        Self::cast_si_ps(Self::or_si(Self::cast_ps_si(a), Self::cast_ps_si(b)))
    }
    #[inline]
    fn xor_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4 {
        Self::cast_si_ps(Self::xor_si(Self::cast_ps_si(a), Self::cast_ps_si(b)))
    }
    #[inline]
    fn andnot_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4 {
        Self::cast_si_ps(Self::andnot_si(Self::cast_ps_si(a), Self::cast_ps_si(b)))
    }

    // ===== Comparison Operations =====
    /// `a > b` per lane as an all-ones / all-zeros mask. False on NaN.
    fn cmpgt_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4;
    /// `a < b` per lane as an all-ones / all-zeros mask. False on NaN.
    fn cmplt_ps(a: Self::F32x4, b: Self::F32x4) -> Self::F32x4;
    fn cmpgt_epi32(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;
    fn cmplt_epi32(a: Self::I32x4, b: Self::I32x4) -> Self::I32x4;

    // ===== Conversion =====
    /// Integer to float, round-to-nearest-even above 2^24.
    fn cvtepi32_ps(a: Self::I32x4) -> Self::F32x4;
    /// Float to integer, truncating toward zero. Out-of-range and NaN lanes
    /// are engine-specific.
    fn cvttps_epi32(a: Self::F32x4) -> Self::I32x4;
}

/// Engine compiled into this build.
#[cfg(all(target_arch = "x86_64", not(feature = "scalar-backend")))]
pub type ActiveEngine = SseEngine;

/// Engine compiled into this build.
#[cfg(all(target_arch = "aarch64", not(feature = "scalar-backend")))]
pub type ActiveEngine = NeonEngine;

/// Engine compiled into this build.
#[cfg(any(
    feature = "scalar-backend",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
pub type ActiveEngine = ScalarEngine;

/// Returns a human-readable description of the compiled engine.
pub fn backend_description() -> &'static str {
    #[cfg(all(target_arch = "x86_64", not(feature = "scalar-backend")))]
    {
        "SSE2 (128-bit, 4 x f32 / 4 x i32)"
    }
    #[cfg(all(target_arch = "aarch64", not(feature = "scalar-backend")))]
    {
        "NEON (128-bit, 4 x f32 / 4 x i32)"
    }
    #[cfg(any(
        feature = "scalar-backend",
        not(any(target_arch = "x86_64", target_arch = "aarch64"))
    ))]
    {
        "Scalar (portable [f32; 4] / [i32; 4] lanes)"
    }
}
