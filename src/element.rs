//! Element precision shared by every buffer of a run.

use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::AddAssign;

use num_traits::Float;

use crate::kernels::vectorized::Vectorize;

/// Floating-point type a benchmark run is carried out in.
///
/// The harness is generic over this trait and gets monomorphized once per
/// precision, so A, b and c of one run always share a single element type.
pub trait Element:
    Float + AddAssign + Sum + Default + Debug + Display + Into<f64> + Send + Sync + Vectorize + 'static
{
    /// Short name used in reports ("f64", "f32").
    const NAME: &'static str;

    /// Relative tolerance for comparing results across variants.
    ///
    /// Variants differ only in accumulation order, so they agree to within
    /// rounding, never bit-for-bit.
    const TOLERANCE: f64;

    /// Converts an index into the element type, as used by the generator.
    fn from_index(i: usize) -> Self;
}

impl Element for f64 {
    const NAME: &'static str = "f64";
    const TOLERANCE: f64 = 1e-6;

    #[inline]
    fn from_index(i: usize) -> Self {
        i as f64
    }
}

impl Element for f32 {
    const NAME: &'static str = "f32";
    const TOLERANCE: f64 = 1e-3;

    #[inline]
    fn from_index(i: usize) -> Self {
        i as f32
    }
}

/// Precision selector carried by the run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    F64,
    F32,
}

impl Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precision::F64 => f.write_str(f64::NAME),
            Precision::F32 => f.write_str(f32::NAME),
        }
    }
}
