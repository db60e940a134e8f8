//! Drives a benchmark run: generate, time, derive metrics, report.
//!
//! Generation and allocation of `c` happen outside the timed region; the
//! timer wraps exactly one kernel call. All buffers are owned here for the
//! duration of a run and dropped on every exit path, errors included.

pub mod config;
pub mod report;

use std::time::Duration;

use tracing::{debug, info, warn};

pub use config::{BenchConfig, DEFAULT_VARIANT};
pub use report::{Comparison, ComparisonRow, OutputFormat, Report, Sweep};

use crate::element::{Element, Precision};
use crate::error::{BenchError, Result};
use crate::kernels::{Kernel, Variant};
use crate::matrix::Problem;
use crate::matrix::buffer::try_zeroed;
use crate::simd::Isa;
use crate::timer;

/// Times the configured variant.
///
/// # Errors
///
/// Invalid dimension or repeat count, an unavailable ISA, allocation
/// failure, or results that differ between repetitions.
pub fn run(config: &BenchConfig) -> Result<Report> {
    config.validate()?;
    let isa = config.isa.resolve()?;
    debug!(%isa, "resolved instruction set");

    match config.precision {
        Precision::F64 => run_typed::<f64>(config, isa),
        Precision::F32 => run_typed::<f32>(config, isa),
    }
}

/// Times every variant on the same input, baseline first, and checks each
/// result against the baseline.
///
/// Disagreement is recorded in the rows rather than returned as an error;
/// call [`Comparison::verify`] to turn it into one.
pub fn compare(config: &BenchConfig) -> Result<Comparison> {
    config.validate()?;
    let isa = config.isa.resolve()?;
    debug!(%isa, "resolved instruction set");

    match config.precision {
        Precision::F64 => compare_typed::<f64>(config, isa),
        Precision::F32 => compare_typed::<f32>(config, isa),
    }
}

/// Runs [`compare`] once per dimension in `config.sizes`, in the order
/// given.
///
/// Stops at the first size that fails to run; disagreement with the
/// baseline is left in the rows for [`Sweep::verify`].
pub fn sweep(config: &BenchConfig) -> Result<Sweep> {
    if config.sizes.is_empty() {
        return Err(BenchError::Usage("no sizes to sweep".to_string()));
    }

    let mut comparisons = Vec::with_capacity(config.sizes.len());
    for &n in &config.sizes {
        let sized = BenchConfig {
            n,
            sizes: Vec::new(),
            ..config.clone()
        };
        info!(n, "comparing variants");
        comparisons.push(compare(&sized)?);
    }
    Ok(Sweep { comparisons })
}

fn kernel_for(config: &BenchConfig, variant: Variant, isa: Isa) -> Kernel {
    Kernel {
        variant,
        unroll: config.unroll,
        isa,
    }
}

fn run_typed<T: Element>(config: &BenchConfig, isa: Isa) -> Result<Report> {
    let problem = Problem::<T>::generate(config.n, config.vector)?;
    let kernel = kernel_for(config, config.variant, isa);
    let resolution = timer::resolution();

    let m = measure(&kernel, &problem, config.repeat)?;

    Ok(Report {
        n: config.n,
        variant: config.variant,
        strategy: kernel.strategy::<T>(),
        precision: config.precision,
        vector: problem.form(),
        repeat: config.repeat,
        elapsed: m.best,
        mean: m.mean,
        resolution,
        gflops: timer::gflops(config.n, m.best),
        checksum: checksum(&m.c),
        sample: sample(&m.c),
    })
}

fn compare_typed<T: Element>(config: &BenchConfig, isa: Isa) -> Result<Comparison> {
    let problem = Problem::<T>::generate(config.n, config.vector)?;
    let resolution = timer::resolution();

    let mut reference: Option<(Vec<T>, Duration)> = None;
    let mut rows = Vec::with_capacity(Variant::ALL.len());

    for variant in Variant::ALL {
        let kernel = kernel_for(config, variant, isa);
        let m = measure(&kernel, &problem, config.repeat)?;

        let (deviation, speedup) = match &reference {
            Some((expected, baseline_time)) => (
                max_relative_error(expected, &m.c),
                baseline_time.as_secs_f64() / m.best.as_secs_f64(),
            ),
            None => (Deviation::default(), 1.0),
        };
        let agrees = deviation.rel_error <= T::TOLERANCE;
        if !agrees {
            warn!(
                %variant,
                index = deviation.index,
                rel_error = deviation.rel_error,
                "result disagrees with baseline"
            );
        }

        rows.push(ComparisonRow {
            variant,
            strategy: kernel.strategy::<T>(),
            elapsed: m.best,
            gflops: timer::gflops(config.n, m.best),
            speedup,
            checksum: checksum(&m.c),
            max_rel_error: deviation.rel_error,
            worst_index: deviation.index,
            worst_expected: deviation.expected,
            worst_actual: deviation.actual,
            agrees,
        });

        if reference.is_none() {
            reference = Some((m.c, m.best));
        }
    }

    Ok(Comparison {
        n: config.n,
        precision: config.precision,
        vector: problem.form(),
        repeat: config.repeat,
        tolerance: T::TOLERANCE,
        resolution,
        rows,
    })
}

struct Measurement<T> {
    best: Duration,
    mean: Duration,
    c: Vec<T>,
}

/// Times `repeat` calls of `kernel`, each into a freshly zeroed `c`.
///
/// Every repetition must produce a bit-identical result.
fn measure<T: Element>(kernel: &Kernel, problem: &Problem<T>, repeat: usize) -> Result<Measurement<T>> {
    let n = problem.n();
    let mut best = Duration::MAX;
    let mut total = Duration::ZERO;
    let mut result: Option<Vec<T>> = None;

    for rep in 0..repeat {
        let mut c = try_zeroed::<T>("vector c", n)?;

        let timed = timer::time(|| kernel.run(problem.a(), problem.b(), &mut c, n));
        info!(
            variant = %kernel.variant,
            n,
            rep,
            elapsed_us = timed.elapsed.as_secs_f64() * 1e6,
            "timed kernel call"
        );

        best = best.min(timed.elapsed);
        total += timed.elapsed;

        if result.as_ref().is_some_and(|prev| !bitwise_eq(prev, &c)) {
            return Err(BenchError::Nondeterministic(kernel.variant));
        }
        if result.is_none() {
            result = Some(c);
        }
    }

    // validate() guarantees repeat >= 1
    let c = result.unwrap_or_default();
    Ok(Measurement {
        best,
        mean: mean(total, repeat),
        c,
    })
}

/// `total / count`, in whole nanoseconds, for any `count >= 1`.
fn mean(total: Duration, count: usize) -> Duration {
    let nanos = total.as_nanos() / count as u128;
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

fn bitwise_eq<T: Element>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(&x, &y)| {
            let (x, y): (f64, f64) = (x.into(), y.into());
            x.to_bits() == y.to_bits()
        })
}

/// Sum of all elements, accumulated in f64.
pub fn checksum<T: Element>(c: &[T]) -> f64 {
    c.iter().map(|&x| -> f64 { x.into() }).sum()
}

/// `c[N/2]`, or `None` for an empty result.
pub fn sample<T: Element>(c: &[T]) -> Option<f64> {
    c.get(c.len() / 2).map(|&x| x.into())
}

/// Where two results differ most, relative to magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deviation {
    pub rel_error: f64,
    pub index: usize,
    pub expected: f64,
    pub actual: f64,
}

/// Largest element-wise relative difference between `expected` and
/// `actual`.
///
/// # Panics
///
/// Panics if the lengths differ.
pub fn max_relative_error<T: Element>(expected: &[T], actual: &[T]) -> Deviation {
    assert_eq!(expected.len(), actual.len(), "result length mismatch");

    let mut worst = Deviation::default();
    for (i, (&e, &a)) in expected.iter().zip(actual).enumerate() {
        let (e, a): (f64, f64) = (e.into(), a.into());
        let scale = e.abs().max(a.abs());
        let rel = if scale == 0.0 { 0.0 } else { (e - a).abs() / scale };
        // NaN compares false, so an explicit check keeps it from hiding
        if rel > worst.rel_error || (rel.is_nan() && !worst.rel_error.is_nan()) {
            worst = Deviation {
                rel_error: rel,
                index: i,
                expected: e,
                actual: a,
            };
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::VectorForm;

    #[test]
    fn run_reports_checksum_and_sample() {
        let mut config = BenchConfig::new(4);
        config.variant = Variant::Baseline;
        let report = run(&config).unwrap();

        let p = Problem::<f64>::generate(4, config.vector).unwrap();
        let mut c = vec![0.0; 4];
        crate::kernels::matvec_baseline(p.a(), p.b(), &mut c, 4);

        assert_eq!(report.checksum, c.iter().sum::<f64>());
        assert_eq!(report.sample, Some(c[2]));
        assert_eq!(report.strategy, "i-k loop");
    }

    #[test]
    fn repeat_reports_best_and_mean() {
        let mut config = BenchConfig::new(64);
        config.repeat = 3;
        let report = run(&config).unwrap();
        assert_eq!(report.repeat, 3);
        assert!(report.elapsed <= report.mean);
    }

    #[test]
    fn compare_runs_every_variant() {
        let mut config = BenchConfig::new(37);
        config.precision = Precision::F32;
        let cmp = compare(&config).unwrap();
        let variants: Vec<_> = cmp.rows.iter().map(|r| r.variant).collect();
        assert_eq!(variants, Variant::ALL);
        assert_eq!(cmp.rows[0].speedup, 1.0);
        assert!(cmp.verify().is_ok());
    }

    #[test]
    fn compare_reports_vector_form_of_input() {
        let mut config = BenchConfig::new(5);
        config.vector = VectorForm::Shifted;
        let cmp = compare(&config).unwrap();
        assert_eq!(cmp.vector, VectorForm::Shifted);
        assert_eq!(run(&config).unwrap().vector, VectorForm::Shifted);
    }

    #[test]
    fn sweep_compares_each_size() {
        let mut config = BenchConfig::new(8);
        config.sizes = vec![8, 17, 3];
        let sweep = sweep(&config).unwrap();

        let sizes: Vec<_> = sweep.comparisons.iter().map(|c| c.n).collect();
        assert_eq!(sizes, [8, 17, 3]);
        for cmp in &sweep.comparisons {
            assert_eq!(cmp.rows.len(), Variant::ALL.len());
        }
        assert!(sweep.verify().is_ok());
    }

    #[test]
    fn sweep_needs_sizes() {
        assert!(sweep(&BenchConfig::new(8)).unwrap_err().is_usage());
    }

    #[test]
    fn mean_handles_counts_beyond_u32() {
        let count = u32::MAX as usize + 1;
        let total = Duration::from_secs(count as u64);
        assert_eq!(mean(total, count), Duration::from_secs(1));
        assert_eq!(mean(Duration::from_micros(10), 3), Duration::from_nanos(3333));
    }

    #[test]
    fn run_rejects_zero_dimension() {
        assert!(matches!(
            run(&BenchConfig::new(0)),
            Err(BenchError::InvalidDimension(_))
        ));
    }

    #[test]
    fn relative_error_finds_worst_element() {
        let d = max_relative_error(&[1.0f64, 2.0, 4.0], &[1.0, 2.0, 5.0]);
        assert_eq!(d.index, 2);
        assert!((d.rel_error - 0.2).abs() < 1e-12);
        assert_eq!(max_relative_error::<f64>(&[], &[]), Deviation::default());
    }

    #[test]
    fn sample_of_empty_is_none() {
        assert_eq!(sample::<f64>(&[]), None);
        assert_eq!(checksum::<f32>(&[]), 0.0);
    }
}
