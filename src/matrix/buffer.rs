//! Fallible buffer allocation.

use std::panic::Location;

use crate::element::Element;
use crate::error::{BenchError, Result};

/// Allocates a zero-filled buffer of `len` elements.
///
/// Reports [`BenchError::AllocationFailure`] with the caller's file and line
/// when the allocator refuses, rather than aborting like `vec![0.0; len]`.
#[track_caller]
pub fn try_zeroed<T: Element>(buffer: &'static str, len: usize) -> Result<Vec<T>> {
    let location = Location::caller();
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| BenchError::AllocationFailure {
            buffer,
            elements: len,
            location,
        })?;
    v.resize(len, T::zero());
    Ok(v)
}

/// Number of elements in an `n × n` matrix.
///
/// Fails with [`BenchError::DimensionOverflow`] when that count does not fit
/// in `usize`.
#[track_caller]
pub fn square_len(n: usize) -> Result<usize> {
    let location = Location::caller();
    n.checked_mul(n).ok_or(BenchError::DimensionOverflow { n, location })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_buffer_has_requested_len() {
        let v: Vec<f64> = try_zeroed("test", 17).unwrap();
        assert_eq!(v.len(), 17);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn huge_allocation_is_reported_not_aborted() {
        let err = try_zeroed::<f64>("matrix A", usize::MAX / 4).unwrap_err();
        match err {
            BenchError::AllocationFailure {
                buffer, location, ..
            } => {
                assert_eq!(buffer, "matrix A");
                assert!(location.file().ends_with("buffer.rs"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn square_len_overflow() {
        assert_eq!(square_len(1000).unwrap(), 1_000_000);

        let n = usize::MAX / 2;
        match square_len(n).unwrap_err() {
            err @ BenchError::DimensionOverflow { .. } => {
                let msg = err.to_string();
                assert!(msg.contains(&format!("{n}×{n}")), "{msg}");
                assert!(!msg.contains(&usize::MAX.to_string()), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
