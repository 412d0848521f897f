//! 4-lane packed f32 / i32 vector vocabulary with build-time SSE2 / NEON backends.
//!
//! Kernels are written once against [`vocab`] (or the operator overloads on
//! [`PackedFloat4`] / [`PackedInt4`]) and compile to SSE2 on x86_64 or NEON on
//! aarch64. The backend is fixed at build time; see [`simd_abstraction`].

pub mod conformance;
pub mod error;
pub mod lanes;
pub mod simd_abstraction;
pub mod vocab;

pub use lanes::{Aligned4, LaneScalar, PackedFloat4, PackedInt4, PackedLanes};
pub use simd_abstraction::{
    ALIGNMENT, ActiveEngine, LANES, LaneEngine, RCP_REL_TOLERANCE, SQRT_REL_TOLERANCE,
    backend_description,
};
