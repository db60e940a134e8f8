//! Error types for the benchmark.

use std::panic::Location;

use crate::kernels::Variant;
use crate::simd::Isa;

/// Everything that can end a benchmark run early.
///
/// None of these are retried. A failed run never falls back to a different
/// variant or ISA on the caller's behalf.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// Wrong argument count, unknown variant name, or a malformed option.
    #[error("{0}")]
    Usage(String),

    #[error("invalid matrix dimension '{0}': must be a positive integer")]
    InvalidDimension(String),

    #[error("allocation of {elements} elements for {buffer} failed (at {location})")]
    AllocationFailure {
        buffer: &'static str,
        elements: usize,
        location: &'static Location<'static>,
    },

    #[error("a {n}×{n} matrix has more elements than fit in memory (at {location})")]
    DimensionOverflow {
        n: usize,
        location: &'static Location<'static>,
    },

    #[error("{0} was requested but this CPU does not support it")]
    UnsupportedIsa(Isa),

    #[error("invalid repeat count '{0}': must be at least 1")]
    InvalidRepeat(String),

    #[error("{0} produced different results on repeated runs")]
    Nondeterministic(Variant),

    #[error("{variant} disagrees with baseline at c[{index}]: expected {expected}, got {actual}")]
    Mismatch {
        variant: Variant,
        index: usize,
        expected: f64,
        actual: f64,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BenchError {
    /// Errors that should be followed by the usage text.
    pub fn is_usage(&self) -> bool {
        matches!(self, BenchError::Usage(_))
    }
}

/// Convenience alias for `Result<T, BenchError>`.
pub type Result<T> = std::result::Result<T, BenchError>;
