//! Deterministic generator for A and b.

use tracing::debug;

use crate::element::Element;
use crate::error::{BenchError, Result};
use crate::matrix::buffer::{square_len, try_zeroed};

/// Formula used for the input vector.
///
/// Both forms are deterministic. A run picks one and uses it for every
/// variant it measures, otherwise checksums are not comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VectorForm {
    /// `b[i] = 1 / (i + 1)`
    #[default]
    Harmonic,
    /// `b[i] = 1 / (i + 2)`
    Shifted,
}

impl VectorForm {
    fn offset(self) -> usize {
        match self {
            VectorForm::Harmonic => 1,
            VectorForm::Shifted => 2,
        }
    }
}

/// Fills a row-major `n × n` matrix with `A[i][j] = 1 / (i + j + 2)`.
pub fn fill_matrix<T: Element>(a: &mut [T], n: usize) {
    if n == 0 {
        return;
    }
    for (i, row) in a.chunks_exact_mut(n).enumerate() {
        for (j, x) in row.iter_mut().enumerate() {
            *x = T::one() / T::from_index(i + j + 2);
        }
    }
}

/// Fills the input vector according to `form`.
pub fn fill_vector<T: Element>(b: &mut [T], form: VectorForm) {
    let offset = form.offset();
    for (i, x) in b.iter_mut().enumerate() {
        *x = T::one() / T::from_index(i + offset);
    }
}

/// Generated input for one benchmark run: A (`n × n`, row-major) and b.
#[derive(Debug, Clone)]
pub struct Problem<T> {
    n: usize,
    form: VectorForm,
    a: Vec<T>,
    b: Vec<T>,
}

impl<T: Element> Problem<T> {
    /// Allocates and fills A and b for dimension `n`.
    ///
    /// # Errors
    ///
    /// [`BenchError::InvalidDimension`] if `n == 0`,
    /// [`BenchError::DimensionOverflow`] if `n × n` does not fit in `usize`,
    /// [`BenchError::AllocationFailure`] if the buffers cannot be allocated.
    pub fn generate(n: usize, form: VectorForm) -> Result<Self> {
        if n == 0 {
            return Err(BenchError::InvalidDimension(n.to_string()));
        }

        let mut a = try_zeroed("matrix A", square_len(n)?)?;
        let mut b = try_zeroed("vector b", n)?;
        fill_matrix(&mut a, n);
        fill_vector(&mut b, form);

        debug!(n, precision = T::NAME, ?form, "generated input");
        Ok(Self { n, form, a, b })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn form(&self) -> VectorForm {
        self.form
    }

    /// The matrix, row-major.
    pub fn a(&self) -> &[T] {
        &self.a
    }

    pub fn b(&self) -> &[T] {
        &self.b
    }
}
