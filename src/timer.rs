//! Monotonic timing around a single kernel call.
//!
//! Backed by [`Instant`], which never goes backwards and ignores wall-clock
//! adjustments.

use std::time::{Duration, Instant};

/// The value a timed closure returned and how long it took.
#[derive(Debug, Clone, Copy)]
pub struct Timed<R> {
    pub value: R,
    pub elapsed: Duration,
}

/// Runs `f` once and measures it.
///
/// Only the closure body is inside the timed region, so callers set up
/// inputs and outputs before calling this.
#[inline(never)]
pub fn time<R>(f: impl FnOnce() -> R) -> Timed<R> {
    let start = Instant::now();
    let value = f();
    let elapsed = start.elapsed();
    Timed { value, elapsed }
}

/// Estimates the smallest step the monotonic clock can measure.
///
/// Spins until `Instant::now()` changes and keeps the smallest step seen
/// over a few samples.
pub fn resolution() -> Duration {
    const SAMPLES: usize = 8;

    let mut best = Duration::MAX;
    for _ in 0..SAMPLES {
        let start = Instant::now();
        let mut now = Instant::now();
        while now == start {
            now = Instant::now();
        }
        best = best.min(now - start);
    }
    best
}

/// `2·n²` flops over `elapsed`, in GFLOP/s.
///
/// `None` when the clock did not advance.
pub fn gflops(n: usize, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        let n = n as f64;
        Some(2.0 * n * n * 1e-9 / secs)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_returns_value_and_nonnegative_elapsed() {
        let t = time(|| (0..1000u64).sum::<u64>());
        assert_eq!(t.value, 499_500);
        assert!(t.elapsed < Duration::from_secs(5));
    }

    #[test]
    fn resolution_is_fine_grained() {
        let r = resolution();
        assert!(r > Duration::ZERO);
        assert!(r <= Duration::from_micros(1), "resolution {r:?} coarser than 1us");
    }

    #[test]
    fn throughput_formula() {
        let g = gflops(1000, Duration::from_millis(2)).unwrap();
        assert!((g - 1.0).abs() < 1e-12);
        assert!(gflops(1000, Duration::ZERO).is_none());
    }
}
