//! SIMD lanes for the vectorized kernel.
//!
//! The vectorized kernel is written once against [`Lanes`]: load `WIDTH`
//! contiguous elements, multiply-add into a `WIDTH`-wide accumulator,
//! reduce horizontally. Each instruction set supplies its own lane types:
//!
//! | ISA        | f64 lanes | f32 lanes |
//! |------------|-----------|-----------|
//! | `Portable` | 4         | 8         |
//! | `Avx2`     | 4         | 8         |
//! | `Avx512`   | 8         | 16        |

#[cfg(target_arch = "x86_64")]
pub mod avx2;
#[cfg(target_arch = "x86_64")]
pub mod avx512;
pub mod portable;

use std::fmt;

use crate::element::Element;
use crate::error::{BenchError, Result};

/// A fixed-width vector of elements and the three operations the
/// vectorized kernel needs.
///
/// # Safety
///
/// Every method may use instructions of the ISA the implementing type is
/// built for. Callers must have checked that the CPU supports it (see
/// [`Isa::is_available`]).
pub trait Lanes: Copy {
    type Elem: Element;

    /// Number of elements processed per operation.
    const WIDTH: usize;

    /// All-zero accumulator.
    unsafe fn zero() -> Self;

    /// Loads the first `WIDTH` elements of `src`.
    ///
    /// # Safety
    ///
    /// `src.len() >= WIDTH`.
    unsafe fn load(src: &[Self::Elem]) -> Self;

    /// `self + a * b`, lane by lane. Fused where the ISA has FMA.
    unsafe fn mul_add(self, a: Self, b: Self) -> Self;

    /// Sum of all lanes. The order of additions is ISA-specific.
    unsafe fn reduce_sum(self) -> Self::Elem;
}

/// Instruction set used by the vectorized kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Isa {
    /// Plain arrays, no target-specific instructions.
    Portable,
    /// AVX2 with FMA, 256-bit registers.
    Avx2,
    /// AVX-512F, 512-bit registers.
    Avx512,
}

impl Isa {
    /// Whether this CPU can run the ISA.
    pub fn is_available(self) -> bool {
        match self {
            Isa::Portable => true,
            Isa::Avx2 => has_avx2_fma(),
            Isa::Avx512 => has_avx512f(),
        }
    }

    /// Widest ISA this CPU supports.
    pub fn detect() -> Isa {
        [Isa::Avx512, Isa::Avx2]
            .into_iter()
            .find(|isa| isa.is_available())
            .unwrap_or(Isa::Portable)
    }

    /// Lane width of this ISA for element type `T`.
    pub fn lane_width<T: Element>(self) -> usize {
        T::lane_width(self)
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Isa::Portable => f.write_str("portable"),
            Isa::Avx2 => f.write_str("AVX2"),
            Isa::Avx512 => f.write_str("AVX-512"),
        }
    }
}

/// ISA as requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IsaChoice {
    /// Widest supported ISA.
    #[default]
    Auto,
    Portable,
    Avx2,
    Avx512,
}

impl IsaChoice {
    /// Resolves the request against the running CPU.
    ///
    /// # Errors
    ///
    /// [`BenchError::UnsupportedIsa`] if an explicit ISA is not available.
    pub fn resolve(self) -> Result<Isa> {
        let isa = match self {
            IsaChoice::Auto => return Ok(Isa::detect()),
            IsaChoice::Portable => Isa::Portable,
            IsaChoice::Avx2 => Isa::Avx2,
            IsaChoice::Avx512 => Isa::Avx512,
        };
        if isa.is_available() {
            Ok(isa)
        } else {
            Err(BenchError::UnsupportedIsa(isa))
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn has_avx2_fma() -> bool {
    is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
}

#[cfg(not(target_arch = "x86_64"))]
fn has_avx2_fma() -> bool {
    false
}

#[cfg(target_arch = "x86_64")]
fn has_avx512f() -> bool {
    is_x86_feature_detected!("avx512f")
}

#[cfg(not(target_arch = "x86_64"))]
fn has_avx512f() -> bool {
    false
}
