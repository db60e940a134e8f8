//! Run configuration.

use crate::element::Precision;
use crate::error::{BenchError, Result};
use crate::harness::report::OutputFormat;
use crate::kernels::{UnrollWidth, Variant};
use crate::matrix::VectorForm;
use crate::simd::IsaChoice;

/// Variant used when none is given on the command line.
pub const DEFAULT_VARIANT: Variant = Variant::Vectorized;

/// Everything one benchmark invocation needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Matrix dimension N.
    pub n: usize,
    pub variant: Variant,
    pub precision: Precision,
    pub unroll: UnrollWidth,
    pub isa: IsaChoice,
    pub vector: VectorForm,
    /// How many times the timed call is repeated, each with a fresh `c`.
    pub repeat: usize,
    /// Run every variant instead of just `variant`.
    pub compare: bool,
    /// Dimensions for a multi-size comparison; empty for a single run at `n`.
    pub sizes: Vec<usize>,
    pub format: OutputFormat,
}

impl BenchConfig {
    /// Config for dimension `n` with every other knob at its default.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            variant: DEFAULT_VARIANT,
            precision: Precision::default(),
            unroll: UnrollWidth::default(),
            isa: IsaChoice::default(),
            vector: VectorForm::default(),
            repeat: 1,
            compare: false,
            sizes: Vec::new(),
            format: OutputFormat::default(),
        }
    }

    /// Builds a config from the positional arguments `[VARIANT] N`.
    ///
    /// # Errors
    ///
    /// [`BenchError::Usage`] for a wrong argument count or unknown variant,
    /// [`BenchError::InvalidDimension`] if N is not a positive integer.
    pub fn from_positionals<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let (variant, n) = match args {
            [n] => (DEFAULT_VARIANT, n.as_ref()),
            [variant, n] => (variant.as_ref().parse::<Variant>()?, n.as_ref()),
            _ => {
                return Err(BenchError::Usage(format!(
                    "expected [VARIANT] <N>, got {} argument(s)",
                    args.len()
                )));
            }
        };

        let mut config = Self::new(parse_dimension(n)?);
        config.variant = variant;
        Ok(config)
    }

    /// Builds a comparison config over several dimensions, e.g. the values
    /// of `--sizes 256,512,1024`.
    ///
    /// # Errors
    ///
    /// [`BenchError::Usage`] for an empty list,
    /// [`BenchError::InvalidDimension`] for any entry that is not a positive
    /// integer.
    pub fn from_sizes<S: AsRef<str>>(sizes: &[S]) -> Result<Self> {
        let sizes = sizes
            .iter()
            .map(|s| parse_dimension(s.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let Some(&first) = sizes.first() else {
            return Err(BenchError::Usage("--sizes needs at least one dimension".to_string()));
        };

        let mut config = Self::new(first);
        config.compare = true;
        config.sizes = sizes;
        Ok(config)
    }

    /// Checks the numeric knobs.
    pub fn validate(&self) -> Result<()> {
        if let Some(&n) = std::iter::once(&self.n).chain(&self.sizes).find(|&&n| n == 0) {
            return Err(BenchError::InvalidDimension(n.to_string()));
        }
        if self.repeat == 0 {
            return Err(BenchError::InvalidRepeat(self.repeat.to_string()));
        }
        Ok(())
    }
}

/// Parses a matrix dimension. Anything but a positive integer is rejected.
pub fn parse_dimension(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(BenchError::InvalidDimension(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_parsing() {
        assert_eq!(parse_dimension("1024").unwrap(), 1024);
        for bad in ["0", "-5", "abc", "", "1.5"] {
            assert!(
                matches!(parse_dimension(bad), Err(BenchError::InvalidDimension(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn positionals_default_variant() {
        let c = BenchConfig::from_positionals(&["64"]).unwrap();
        assert_eq!(c.n, 64);
        assert_eq!(c.variant, Variant::Vectorized);
    }

    #[test]
    fn positionals_with_variant() {
        let c = BenchConfig::from_positionals(&["interchange", "8"]).unwrap();
        assert_eq!(c.variant, Variant::Interchanged);
        assert_eq!(c.n, 8);
    }

    #[test]
    fn positionals_errors() {
        let none: [&str; 0] = [];
        assert!(BenchConfig::from_positionals(&none).unwrap_err().is_usage());
        assert!(
            BenchConfig::from_positionals(&["a", "b", "c"])
                .unwrap_err()
                .is_usage()
        );
        assert!(
            BenchConfig::from_positionals(&["blocked", "8"])
                .unwrap_err()
                .is_usage()
        );
        assert!(matches!(
            BenchConfig::from_positionals(&["unroll", "zero"]),
            Err(BenchError::InvalidDimension(_))
        ));
    }

    #[test]
    fn sizes_build_a_comparison() {
        let c = BenchConfig::from_sizes(&["256", "512", " 1024"]).unwrap();
        assert_eq!(c.sizes, [256, 512, 1024]);
        assert_eq!(c.n, 256);
        assert!(c.compare);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn sizes_errors() {
        let none: [&str; 0] = [];
        assert!(BenchConfig::from_sizes(&none).unwrap_err().is_usage());
        assert!(matches!(
            BenchConfig::from_sizes(&["8", "0"]),
            Err(BenchError::InvalidDimension(_))
        ));

        let mut c = BenchConfig::new(4);
        c.sizes = vec![4, 0];
        assert!(matches!(c.validate(), Err(BenchError::InvalidDimension(_))));
    }

    #[test]
    fn validate_repeat() {
        let mut c = BenchConfig::new(4);
        assert!(c.validate().is_ok());
        c.repeat = 0;
        assert!(matches!(c.validate(), Err(BenchError::InvalidRepeat(_))));
    }
}
