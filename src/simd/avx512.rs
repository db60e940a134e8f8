//! AVX-512F lanes: 8 × f64 or 16 × f32 per 512-bit register.

use std::arch::x86_64::*;

use crate::simd::Lanes;

#[derive(Debug, Clone, Copy)]
pub struct F64x8(__m512d);

#[derive(Debug, Clone, Copy)]
pub struct F32x16(__m512);

impl Lanes for F64x8 {
    type Elem = f64;
    const WIDTH: usize = 8;

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn zero() -> Self {
        F64x8(_mm512_setzero_pd())
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn load(src: &[f64]) -> Self {
        debug_assert!(src.len() >= Self::WIDTH);
        F64x8(unsafe { _mm512_loadu_pd(src.as_ptr()) })
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn mul_add(self, a: Self, b: Self) -> Self {
        F64x8(_mm512_fmadd_pd(a.0, b.0, self.0))
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn reduce_sum(self) -> f64 {
        _mm512_reduce_add_pd(self.0)
    }
}

impl Lanes for F32x16 {
    type Elem = f32;
    const WIDTH: usize = 16;

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn zero() -> Self {
        F32x16(_mm512_setzero_ps())
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn load(src: &[f32]) -> Self {
        debug_assert!(src.len() >= Self::WIDTH);
        F32x16(unsafe { _mm512_loadu_ps(src.as_ptr()) })
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn mul_add(self, a: Self, b: Self) -> Self {
        F32x16(_mm512_fmadd_ps(a.0, b.0, self.0))
    }

    #[inline]
    #[target_feature(enable = "avx512f")]
    unsafe fn reduce_sum(self) -> f32 {
        _mm512_reduce_add_ps(self.0)
    }
}
