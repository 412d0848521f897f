//! Error types for the conformance runner.
//!
//! The vocabulary itself never fails; only the self-test has error paths.

/// Result type alias
pub type Result<T> = std::result::Result<T, ConformanceError>;

/// Conformance failures
#[derive(Debug, thiserror::Error)]
pub enum ConformanceError {
    /// Rejected configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Active engine disagrees with the reference on an exact operation
    #[error(
        "{op}: lane {lane} mismatch, expected {expected:#010x}, got {actual:#010x} (sample {sample})"
    )]
    Mismatch {
        /// Operation name
        op: &'static str,
        /// Sample index within the run
        sample: usize,
        /// Lane index
        lane: usize,
        /// Reference lane bits
        expected: u32,
        /// Active engine lane bits
        actual: u32,
    },

    /// Approximate operation outside its documented tolerance
    #[error(
        "{op}: lane {lane} relative error {error:e} exceeds {tolerance:e} (expected {expected}, got {actual}, sample {sample})"
    )]
    ToleranceExceeded {
        /// Operation name
        op: &'static str,
        /// Sample index within the run
        sample: usize,
        /// Lane index
        lane: usize,
        /// Reference value
        expected: f32,
        /// Active engine value
        actual: f32,
        /// Observed relative error
        error: f32,
        /// Documented bound
        tolerance: f32,
    },

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
