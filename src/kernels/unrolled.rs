//! Manually unrolled scalar kernels.

use crate::element::Element;

/// How many products the unrolled kernel fuses per loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, clap::ValueEnum)]
pub enum UnrollWidth {
    #[value(name = "4")]
    #[serde(rename = "4")]
    Four,
    #[default]
    #[value(name = "8")]
    #[serde(rename = "8")]
    Eight,
}

impl UnrollWidth {
    pub fn get(self) -> usize {
        match self {
            UnrollWidth::Four => 4,
            UnrollWidth::Eight => 8,
        }
    }
}

/// Unrolled matrix-vector product with the given width.
pub fn matvec_unrolled<T: Element>(a: &[T], b: &[T], c: &mut [T], n: usize, width: UnrollWidth) {
    match width {
        UnrollWidth::Four => matvec_unrolled_4(a, b, c, n),
        UnrollWidth::Eight => matvec_unrolled_8(a, b, c, n),
    }
}

/// Row-wise dot products, four terms per iteration.
///
/// Each term is added to the accumulator in turn, so the rounding order is
/// the same as [`matvec_baseline`](super::baseline::matvec_baseline); only
/// the loop overhead changes. The last `n % 4` columns go through a plain
/// loop, which covers the whole row when `n < 4`.
pub fn matvec_unrolled_4<T: Element>(a: &[T], b: &[T], c: &mut [T], n: usize) {
    for i in 0..n {
        let row = &a[i * n..(i + 1) * n];
        let mut sum = T::zero();
        let mut k = 0;

        while k + 4 <= n {
            sum += row[k] * b[k];
            sum += row[k + 1] * b[k + 1];
            sum += row[k + 2] * b[k + 2];
            sum += row[k + 3] * b[k + 3];
            k += 4;
        }

        while k < n {
            sum += row[k] * b[k];
            k += 1;
        }

        c[i] = sum;
    }
}

/// Row-wise dot products, eight terms per iteration.
///
/// The eight products are summed into one partial before touching the
/// accumulator, which shortens the dependency chain on `sum` and changes
/// rounding order relative to the baseline.
pub fn matvec_unrolled_8<T: Element>(a: &[T], b: &[T], c: &mut [T], n: usize) {
    for i in 0..n {
        let row = &a[i * n..(i + 1) * n];
        let mut sum = T::zero();
        let mut k = 0;

        while k + 8 <= n {
            sum += row[k] * b[k]
                + row[k + 1] * b[k + 1]
                + row[k + 2] * b[k + 2]
                + row[k + 3] * b[k + 3]
                + row[k + 4] * b[k + 4]
                + row[k + 5] * b[k + 5]
                + row[k + 6] * b[k + 6]
                + row[k + 7] * b[k + 7];
            k += 8;
        }

        while k < n {
            sum += row[k] * b[k];
            k += 1;
        }

        c[i] = sum;
    }
}
