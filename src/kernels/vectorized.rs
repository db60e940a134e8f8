//! SIMD matrix-vector product.
//!
//! One generic row kernel, [`dot_lanes`], written against
//! [`Lanes`](crate::simd::Lanes). Each ISA gets a thin `#[target_feature]`
//! entry point that instantiates it with its own lane type, so the
//! intrinsics inline into code compiled for that ISA.

use crate::simd::Isa;
use crate::simd::Lanes;
use crate::simd::portable::Portable;

/// Per-precision dispatch to the right lane type.
///
/// Implemented for `f32` and `f64`; a supertrait of
/// [`Element`](crate::element::Element).
pub trait Vectorize: Sized {
    /// Lane width the vectorized kernel uses for this type under `isa`.
    fn lane_width(isa: Isa) -> usize;

    /// Runs the vectorized kernel and returns the ISA actually used.
    ///
    /// An ISA the CPU lacks falls back to [`Isa::Portable`].
    fn matvec_vectorized(a: &[Self], b: &[Self], c: &mut [Self], n: usize, isa: Isa) -> Isa;
}

/// Dot product of `row` with the first `row.len()` elements of `b`.
///
/// Main loop runs while a full `V::WIDTH` chunk remains, then the lanes are
/// reduced and the tail is finished with scalar multiply-adds. When the row
/// is shorter than one chunk the main loop never runs.
///
/// # Safety
///
/// The CPU must support the ISA of `V`.
#[inline(always)]
pub unsafe fn dot_lanes<V: Lanes>(row: &[V::Elem], b: &[V::Elem]) -> V::Elem {
    let n = row.len();
    let b = &b[..n];

    let mut acc = unsafe { V::zero() };
    let mut k = 0;
    while k + V::WIDTH <= n {
        acc = unsafe { acc.mul_add(V::load(&row[k..]), V::load(&b[k..])) };
        k += V::WIDTH;
    }

    let mut sum = unsafe { acc.reduce_sum() };
    for (&x, &y) in row[k..].iter().zip(&b[k..]) {
        sum += x * y;
    }
    sum
}

/// Applies [`dot_lanes`] to every row of the `n × n` matrix `a`.
///
/// # Safety
///
/// The CPU must support the ISA of `V`.
#[inline(always)]
pub unsafe fn matvec_lanes<V: Lanes>(a: &[V::Elem], b: &[V::Elem], c: &mut [V::Elem], n: usize) {
    if n == 0 {
        return;
    }
    for (row, out) in a.chunks_exact(n).zip(c.iter_mut()) {
        *out = unsafe { dot_lanes::<V>(row, b) };
    }
}

#[cfg(target_arch = "x86_64")]
mod x86 {
    use super::matvec_lanes;
    use crate::simd::avx2::{F32x8, F64x4};
    use crate::simd::avx512::{F32x16, F64x8};

    #[target_feature(enable = "avx2,fma")]
    pub unsafe fn matvec_avx2_f64(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
        unsafe { matvec_lanes::<F64x4>(a, b, c, n) }
    }

    #[target_feature(enable = "avx2,fma")]
    pub unsafe fn matvec_avx2_f32(a: &[f32], b: &[f32], c: &mut [f32], n: usize) {
        unsafe { matvec_lanes::<F32x8>(a, b, c, n) }
    }

    #[target_feature(enable = "avx512f")]
    pub unsafe fn matvec_avx512_f64(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
        unsafe { matvec_lanes::<F64x8>(a, b, c, n) }
    }

    #[target_feature(enable = "avx512f")]
    pub unsafe fn matvec_avx512_f32(a: &[f32], b: &[f32], c: &mut [f32], n: usize) {
        unsafe { matvec_lanes::<F32x16>(a, b, c, n) }
    }
}

fn usable(isa: Isa) -> Isa {
    if isa.is_available() { isa } else { Isa::Portable }
}

impl Vectorize for f64 {
    fn lane_width(isa: Isa) -> usize {
        match isa {
            Isa::Portable | Isa::Avx2 => 4,
            Isa::Avx512 => 8,
        }
    }

    fn matvec_vectorized(a: &[f64], b: &[f64], c: &mut [f64], n: usize, isa: Isa) -> Isa {
        let isa = usable(isa);
        match isa {
            // SAFETY: `usable` only returns ISAs this CPU reports.
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => unsafe { x86::matvec_avx512_f64(a, b, c, n) },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => unsafe { x86::matvec_avx2_f64(a, b, c, n) },
            _ => unsafe { matvec_lanes::<Portable<f64, 4>>(a, b, c, n) },
        }
        isa
    }
}

impl Vectorize for f32 {
    fn lane_width(isa: Isa) -> usize {
        match isa {
            Isa::Portable | Isa::Avx2 => 8,
            Isa::Avx512 => 16,
        }
    }

    fn matvec_vectorized(a: &[f32], b: &[f32], c: &mut [f32], n: usize, isa: Isa) -> Isa {
        let isa = usable(isa);
        match isa {
            // SAFETY: `usable` only returns ISAs this CPU reports.
            #[cfg(target_arch = "x86_64")]
            Isa::Avx512 => unsafe { x86::matvec_avx512_f32(a, b, c, n) },
            #[cfg(target_arch = "x86_64")]
            Isa::Avx2 => unsafe { x86::matvec_avx2_f32(a, b, c, n) },
            _ => unsafe { matvec_lanes::<Portable<f32, 8>>(a, b, c, n) },
        }
        isa
    }
}

/// Vectorized matrix-vector product for any [`Element`](crate::element::Element).
///
/// Returns the ISA that actually ran.
pub fn matvec_vectorized<T: Vectorize>(a: &[T], b: &[T], c: &mut [T], n: usize, isa: Isa) -> Isa {
    T::matvec_vectorized(a, b, c, n, isa)
}
