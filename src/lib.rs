//! Dense matrix-vector multiplication benchmark, built from scratch.
//!
//! I wanted to see how much of a difference loop order, unrolling and SIMD
//! make on the simplest BLAS-2 kernel, `c = A · b`, on one core. This crate
//! has four interchangeable kernels and a harness that times exactly one
//! call of any of them.
//!
//! ## Usage
//!
//! ```
//! use matvec::multiply;
//!
//! let n = 64;
//! let a = vec![1.0f64; n * n];
//! let b = vec![1.0f64; n];
//! let mut c = vec![0.0f64; n];
//!
//! multiply(&a, &b, &mut c, n);
//! assert_eq!(c[0], 64.0);
//! ```
//!
//! To time a specific variant:
//!
//! ```
//! use matvec::harness::{self, BenchConfig};
//! use matvec::kernels::Variant;
//!
//! let mut config = BenchConfig::new(256);
//! config.variant = Variant::Unrolled;
//! let report = harness::run(&config).unwrap();
//! println!("{report}");
//! ```
//!
//! ## What's inside
//!
//! - Baseline (i-k) and interchanged (k-i) scalar kernels
//! - 4- and 8-way manually unrolled kernels
//! - One SIMD kernel over a lane abstraction: AVX-512, AVX2+FMA or portable
//! - f32 and f64, never mixed within a run

pub mod element;
pub mod error;
pub mod harness;
pub mod kernels;
pub mod matrix;
pub mod simd;
pub mod timer;

pub use element::{Element, Precision};
pub use error::{BenchError, Result};
pub use kernels::{Kernel, Variant};
pub use matrix::{Problem, VectorForm};

/// Matrix-vector multiply: c = A * b
///
/// Picks the fastest available kernel for your CPU (AVX-512 > AVX2 >
/// portable lanes). A is `n × n`, row-major. `c` is overwritten.
///
/// # Panics
///
/// Panics if the slice sizes don't match n.
pub fn multiply<T: Element>(a: &[T], b: &[T], c: &mut [T], n: usize) {
    Kernel::new(Variant::Vectorized).run(a, b, c, n);
}
