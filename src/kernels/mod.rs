//! Matrix-vector multiplication kernels.
//!
//! Every kernel computes `c[i] = Σ_k A[i][k] · b[k]` for a row-major
//! `n × n` matrix and overwrites `c`. They differ only in how they walk the
//! data, which changes speed and accumulation order but not the math.
//!
//! Available variants:
//! - `baseline`: i-k loop order, one scalar accumulator per row
//! - `interchanged`: k-i loop order (strided walk over A, deliberately slow)
//! - `unrolled`: 4 or 8 products per loop iteration plus a scalar tail
//! - `vectorized`: SIMD lanes (AVX-512 > AVX2 > portable) plus a scalar tail

pub mod baseline;
pub mod interchanged;
pub mod unrolled;
pub mod vectorized;

use std::fmt;
use std::str::FromStr;

pub use baseline::matvec_baseline;
pub use interchanged::matvec_interchanged;
pub use unrolled::{UnrollWidth, matvec_unrolled};
pub use vectorized::matvec_vectorized;

use crate::element::Element;
use crate::error::BenchError;
use crate::simd::Isa;

/// Execution strategy for the matrix-vector product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum Variant {
    #[serde(rename = "baseline")]
    Baseline,
    #[serde(rename = "interchange")]
    Interchanged,
    #[serde(rename = "unroll")]
    Unrolled,
    #[default]
    #[serde(rename = "vectorized")]
    Vectorized,
}

impl Variant {
    /// All variants, baseline first.
    pub const ALL: [Variant; 4] = [
        Variant::Baseline,
        Variant::Interchanged,
        Variant::Unrolled,
        Variant::Vectorized,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Baseline => "baseline",
            Variant::Interchanged => "interchange",
            Variant::Unrolled => "unroll",
            Variant::Vectorized => "vectorized",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" => Ok(Variant::Baseline),
            "interchange" | "interchanged" => Ok(Variant::Interchanged),
            "unroll" | "unrolled" => Ok(Variant::Unrolled),
            "avx2" | "vectorized" | "simd" => Ok(Variant::Vectorized),
            _ => Err(BenchError::Usage(format!(
                "unknown variant '{s}' (expected baseline, interchange, unroll or vectorized)"
            ))),
        }
    }
}

/// A fully configured kernel: a variant plus the knobs that affect it.
///
/// This is the one capability the harness times. It borrows A and b,
/// never keeps them, and overwrites `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    pub variant: Variant,
    /// Used by [`Variant::Unrolled`] only.
    pub unroll: UnrollWidth,
    /// Used by [`Variant::Vectorized`] only.
    pub isa: Isa,
}

impl Kernel {
    /// Kernel with default unroll width and the widest ISA on this CPU.
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            unroll: UnrollWidth::default(),
            isa: Isa::detect(),
        }
    }

    /// Computes `c = A · b`.
    ///
    /// # Panics
    ///
    /// Panics if the slice sizes don't match `n`.
    pub fn run<T: Element>(&self, a: &[T], b: &[T], c: &mut [T], n: usize) {
        assert_eq!(a.len(), n * n, "A: expected {}x{}={} elements", n, n, n * n);
        assert_eq!(b.len(), n, "b: expected {} elements", n);
        assert_eq!(c.len(), n, "c: expected {} elements", n);

        match self.variant {
            Variant::Baseline => matvec_baseline(a, b, c, n),
            Variant::Interchanged => matvec_interchanged(a, b, c, n),
            Variant::Unrolled => matvec_unrolled(a, b, c, n, self.unroll),
            Variant::Vectorized => {
                matvec_vectorized(a, b, c, n, self.isa);
            }
        }
    }

    /// Short description of how this kernel walks the data for `T`, e.g.
    /// `"AVX2, 4 lanes"`.
    pub fn strategy<T: Element>(&self) -> String {
        match self.variant {
            Variant::Baseline => "i-k loop".to_string(),
            Variant::Interchanged => "k-i loop".to_string(),
            Variant::Unrolled => format!("unrolled x{}", self.unroll.get()),
            Variant::Vectorized => {
                let isa = if self.isa.is_available() {
                    self.isa
                } else {
                    Isa::Portable
                };
                format!("{}, {} lanes", isa, isa.lane_width::<T>())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_names_round_trip() {
        for v in Variant::ALL {
            assert_eq!(v.as_str().parse::<Variant>().unwrap(), v);
        }
        assert_eq!("avx2".parse::<Variant>().unwrap(), Variant::Vectorized);
        assert_eq!("Unrolled".parse::<Variant>().unwrap(), Variant::Unrolled);
    }

    #[test]
    fn unknown_variant_is_usage_error() {
        let err = "blocked".parse::<Variant>().unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn default_is_vectorized() {
        assert_eq!(Variant::default(), Variant::Vectorized);
    }

    #[test]
    fn strategy_descriptions() {
        let mut k = Kernel::new(Variant::Unrolled);
        k.unroll = UnrollWidth::Four;
        assert_eq!(k.strategy::<f64>(), "unrolled x4");

        k.variant = Variant::Vectorized;
        k.isa = Isa::Portable;
        assert_eq!(k.strategy::<f32>(), "portable, 8 lanes");
    }

    #[test]
    #[should_panic(expected = "A: expected")]
    fn run_checks_sizes() {
        let a = vec![0.0f64; 8];
        let b = vec![0.0f64; 3];
        let mut c = vec![0.0f64; 3];
        Kernel::new(Variant::Baseline).run(&a, &b, &mut c, 3);
    }
}
