//! Benchmark results and their text/JSON rendering.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::element::Precision;
use crate::error::{BenchError, Result};
use crate::kernels::Variant;
use crate::matrix::VectorForm;

/// How results are written to standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn micros<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1e6)
}

fn fmt_gflops(g: Option<f64>) -> String {
    match g {
        Some(g) => format!("{g:.3}"),
        None => "n/a".to_string(),
    }
}

/// Outcome of timing one variant.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub n: usize,
    pub variant: Variant,
    /// How the kernel walked the data, e.g. "AVX2, 4 lanes".
    pub strategy: String,
    pub precision: Precision,
    pub vector: VectorForm,
    pub repeat: usize,
    /// Fastest of the `repeat` timed calls.
    #[serde(rename = "elapsed_us", serialize_with = "micros")]
    pub elapsed: Duration,
    #[serde(rename = "mean_us", serialize_with = "micros")]
    pub mean: Duration,
    #[serde(rename = "timer_resolution_us", serialize_with = "micros")]
    pub resolution: Duration,
    /// Derived from the fastest call; `None` if the clock did not advance.
    pub gflops: Option<f64>,
    /// Sum of all elements of c, accumulated in f64.
    pub checksum: f64,
    /// `c[N/2]`.
    pub sample: Option<f64>,
}

impl Report {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "n = {}\tvariant = {} ({})\tprecision = {}",
            self.n, self.variant, self.strategy, self.precision
        )?;
        writeln!(
            f,
            "Time = {:.3} us\tTimer Resolution = {:.3} us\tPerformance = {} Gflop/s",
            self.elapsed.as_secs_f64() * 1e6,
            self.resolution.as_secs_f64() * 1e6,
            fmt_gflops(self.gflops)
        )?;
        if self.repeat > 1 {
            writeln!(
                f,
                "Mean time = {:.3} us over {} runs",
                self.mean.as_secs_f64() * 1e6,
                self.repeat
            )?;
        }
        if let Some(sample) = self.sample {
            writeln!(f, "C[N/2] = {sample}")?;
        }
        write!(f, "Checksum (sum of c elements) = {}", self.checksum)
    }
}

/// One line of a [`Comparison`].
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub variant: Variant,
    pub strategy: String,
    #[serde(rename = "elapsed_us", serialize_with = "micros")]
    pub elapsed: Duration,
    pub gflops: Option<f64>,
    /// Baseline time divided by this variant's time.
    pub speedup: f64,
    pub checksum: f64,
    /// Largest element-wise relative difference from the baseline result.
    pub max_rel_error: f64,
    /// Index of that difference.
    pub worst_index: usize,
    #[serde(skip)]
    pub worst_expected: f64,
    #[serde(skip)]
    pub worst_actual: f64,
    /// Whether `max_rel_error` is within tolerance.
    pub agrees: bool,
}

/// Every variant timed on the same input, baseline first.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub n: usize,
    pub precision: Precision,
    pub vector: VectorForm,
    pub repeat: usize,
    pub tolerance: f64,
    #[serde(rename = "timer_resolution_us", serialize_with = "micros")]
    pub resolution: Duration,
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    /// Fails with [`BenchError::Mismatch`] for the first variant that
    /// disagrees with the baseline.
    pub fn verify(&self) -> Result<()> {
        match self.rows.iter().find(|row| !row.agrees) {
            Some(row) => Err(BenchError::Mismatch {
                variant: row.variant,
                index: row.worst_index,
                expected: row.worst_expected,
                actual: row.worst_actual,
            }),
            None => Ok(()),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Matrix-vector {}×{} ({}, timer resolution {:.3} us)",
            self.n,
            self.n,
            self.precision,
            self.resolution.as_secs_f64() * 1e6
        )?;
        writeln!(f, "{}", "-".repeat(96))?;
        writeln!(
            f,
            "   {:<12} {:<18} {:>12} {:>10} {:>8} {:>22} {:>8}",
            "Variant", "Strategy", "Time (us)", "GFLOP/s", "Speedup", "Checksum", "Check"
        )?;
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "{}. {:<12} {:<18} {:>12.3} {:>10} {:>7.2}× {:>22} {:>8}",
                i + 1,
                row.variant.as_str(),
                row.strategy,
                row.elapsed.as_secs_f64() * 1e6,
                fmt_gflops(row.gflops),
                row.speedup,
                row.checksum,
                if row.agrees { "ok" } else { "MISMATCH" }
            )?;
        }
        writeln!(f, "{}", "-".repeat(96))?;
        write!(
            f,
            "Speedup relative to {}. Results checked against it with relative tolerance {:e}.",
            Variant::Baseline,
            self.tolerance
        )
    }
}

/// One [`Comparison`] per matrix dimension, in the order they ran.
///
/// Serializes as a plain JSON array of comparisons.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Sweep {
    pub comparisons: Vec<Comparison>,
}

impl Sweep {
    /// Fails on the first size where some variant disagrees with the
    /// baseline.
    pub fn verify(&self) -> Result<()> {
        self.comparisons.iter().try_for_each(Comparison::verify)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Mean over all sizes of one variant's speedup relative to baseline.
    pub fn mean_speedup(&self, variant: Variant) -> Option<f64> {
        let speedups: Vec<f64> = self
            .comparisons
            .iter()
            .filter_map(|c| c.rows.iter().find(|r| r.variant == variant))
            .map(|r| r.speedup)
            .collect();
        if speedups.is_empty() {
            None
        } else {
            Some(speedups.iter().sum::<f64>() / speedups.len() as f64)
        }
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = 14 + 14 * self.comparisons.len() + 14;
        writeln!(f, "{}", "=".repeat(width))?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "{}", "=".repeat(width))?;

        write!(f, "{:<14}", "Variant")?;
        for c in &self.comparisons {
            write!(f, "{:>14}", format!("{}×{}", c.n, c.n))?;
        }
        writeln!(f, "{:>14}", "Avg speedup")?;
        writeln!(f, "{}", "-".repeat(width))?;

        for variant in Variant::ALL {
            write!(f, "{:<14}", variant.as_str())?;
            for c in &self.comparisons {
                let gflops = c.rows.iter().find(|r| r.variant == variant).and_then(|r| r.gflops);
                write!(f, "{:>11} GF", fmt_gflops(gflops))?;
            }
            match self.mean_speedup(variant) {
                Some(s) => writeln!(f, "{:>13.2}×", s)?,
                None => writeln!(f, "{:>14}", "n/a")?,
            }
        }
        write!(f, "{}", "-".repeat(width))
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.comparisons {
            writeln!(f, "{c}\n")?;
        }
        self.write_summary(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(variant: Variant, speedup: f64, agrees: bool) -> ComparisonRow {
        ComparisonRow {
            variant,
            strategy: "test".to_string(),
            elapsed: Duration::from_micros(10),
            gflops: Some(1.5),
            speedup,
            checksum: 2.0,
            max_rel_error: if agrees { 0.0 } else { 0.25 },
            worst_index: if agrees { 0 } else { 3 },
            worst_expected: if agrees { 0.0 } else { 4.0 },
            worst_actual: if agrees { 0.0 } else { 5.0 },
            agrees,
        }
    }

    fn comparison(n: usize, rows: Vec<ComparisonRow>) -> Comparison {
        Comparison {
            n,
            precision: Precision::F64,
            vector: VectorForm::Harmonic,
            repeat: 1,
            tolerance: 1e-6,
            resolution: Duration::from_nanos(20),
            rows,
        }
    }

    #[test]
    fn verify_reports_disagreeing_variant() {
        let cmp = comparison(
            8,
            vec![
                row(Variant::Baseline, 1.0, true),
                row(Variant::Interchanged, 0.5, true),
                row(Variant::Unrolled, 2.0, false),
            ],
        );

        match cmp.verify() {
            Err(BenchError::Mismatch {
                variant,
                index,
                expected,
                actual,
            }) => {
                assert_eq!(variant, Variant::Unrolled);
                assert_eq!(index, 3);
                assert_eq!(expected, 4.0);
                assert_eq!(actual, 5.0);
            }
            other => panic!("expected a mismatch, got {other:?}"),
        }
        assert!(cmp.to_string().contains("MISMATCH"));
    }

    #[test]
    fn verify_accepts_agreeing_rows() {
        let cmp = comparison(8, vec![row(Variant::Baseline, 1.0, true)]);
        assert!(cmp.verify().is_ok());
        assert!(!cmp.to_string().contains("MISMATCH"));
    }

    #[test]
    fn comparison_json_has_rows() {
        let cmp = comparison(
            8,
            vec![row(Variant::Baseline, 1.0, true), row(Variant::Vectorized, 3.0, true)],
        );
        let json = cmp.render(OutputFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["n"], 8);
        assert_eq!(v["rows"][1]["variant"], "vectorized");
        assert_eq!(v["rows"][1]["speedup"], 3.0);
        assert!(v["rows"][0].get("worst_expected").is_none());
    }

    #[test]
    fn sweep_verify_finds_mismatch_in_any_size() {
        let sweep = Sweep {
            comparisons: vec![
                comparison(4, vec![row(Variant::Baseline, 1.0, true)]),
                comparison(
                    16,
                    vec![row(Variant::Baseline, 1.0, true), row(Variant::Vectorized, 2.0, false)],
                ),
            ],
        };
        assert!(matches!(
            sweep.verify(),
            Err(BenchError::Mismatch {
                variant: Variant::Vectorized,
                ..
            })
        ));
    }

    #[test]
    fn sweep_summary_and_json() {
        let sweep = Sweep {
            comparisons: vec![
                comparison(
                    4,
                    vec![row(Variant::Baseline, 1.0, true), row(Variant::Vectorized, 2.0, true)],
                ),
                comparison(
                    16,
                    vec![row(Variant::Baseline, 1.0, true), row(Variant::Vectorized, 4.0, true)],
                ),
            ],
        };
        assert_eq!(sweep.mean_speedup(Variant::Vectorized), Some(3.0));
        assert_eq!(sweep.mean_speedup(Variant::Unrolled), None);

        let text = sweep.to_string();
        assert!(text.contains("SUMMARY"));
        assert!(text.contains("4×4"));
        assert!(text.contains("16×16"));
        assert!(text.contains("3.00×"));

        let json = sweep.render(OutputFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        let sizes: Vec<_> = v
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["n"].as_u64().unwrap())
            .collect();
        assert_eq!(sizes, [4, 16]);
    }
}
