//! Input data for the benchmark.
//!
//! The generator fills A and b from a closed-form formula so every run and
//! every variant sees bit-identical input. Buffers are allocated fallibly so
//! an out-of-memory N is reported instead of aborting the process.

pub mod buffer;
pub mod generate;

pub use generate::{Problem, VectorForm};
