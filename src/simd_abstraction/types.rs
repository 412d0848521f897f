//! Architecture bindings shared by the engines
//!
//! Re-exports the `std::arch` module for the current target as `simd_arch` so
//! the SSE and NEON engines can name intrinsics uniformly, and fixes the
//! alignment that the aligned load/store variants require.

#[cfg(target_arch = "x86_64")]
pub use std::arch::x86_64 as simd_arch;

#[cfg(target_arch = "aarch64")]
pub use std::arch::aarch64 as simd_arch;

/// Number of 32-bit lanes in every vector type of the vocabulary.
pub const LANES: usize = 4;

/// Byte alignment required by the aligned load/store variants.
///
/// NEON tolerates any alignment; SSE2 `movaps` faults on anything less than
/// 16 bytes. Callers must honour the stricter of the two.
pub const ALIGNMENT: usize = 16;

/// Relative error bound of `rcp` across all backends.
///
/// NEON `vrecpe` is an ~8-bit estimate, SSE `rcpps` a ~12-bit one; the bound
/// is set by the weaker of the two with one bit of headroom.
pub const RCP_REL_TOLERANCE: f32 = 1.0 / 128.0;

/// Relative error bound of `rcp_sqrt` and `sqrt` across all backends.
///
/// `sqrt` chains two estimates (`rcp` of `rcp_sqrt`), so it accumulates both
/// errors.
pub const SQRT_REL_TOLERANCE: f32 = 1.0 / 64.0;

/// All-ones lane pattern produced by a true comparison.
pub const MASK_TRUE: u32 = u32::MAX;
