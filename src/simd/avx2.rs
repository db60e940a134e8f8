//! AVX2 + FMA lanes: 4 × f64 or 8 × f32 per 256-bit register.

use std::arch::x86_64::*;

use crate::simd::Lanes;

/// Four f64 lanes in one `ymm` register.
#[derive(Debug, Clone, Copy)]
pub struct F64x4(__m256d);

/// Eight f32 lanes in one `ymm` register.
#[derive(Debug, Clone, Copy)]
pub struct F32x8(__m256);

impl Lanes for F64x4 {
    type Elem = f64;
    const WIDTH: usize = 4;

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn zero() -> Self {
        F64x4(_mm256_setzero_pd())
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn load(src: &[f64]) -> Self {
        debug_assert!(src.len() >= Self::WIDTH);
        F64x4(unsafe { _mm256_loadu_pd(src.as_ptr()) })
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn mul_add(self, a: Self, b: Self) -> Self {
        F64x4(_mm256_fmadd_pd(a.0, b.0, self.0))
    }

    /// (l0 + l2) + (l1 + l3)
    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn reduce_sum(self) -> f64 {
        let lo = _mm256_castpd256_pd128(self.0);
        let hi = _mm256_extractf128_pd(self.0, 1);
        let pair = _mm_add_pd(lo, hi);
        let high = _mm_unpackhi_pd(pair, pair);
        _mm_cvtsd_f64(_mm_add_sd(pair, high))
    }
}

impl Lanes for F32x8 {
    type Elem = f32;
    const WIDTH: usize = 8;

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn zero() -> Self {
        F32x8(_mm256_setzero_ps())
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn load(src: &[f32]) -> Self {
        debug_assert!(src.len() >= Self::WIDTH);
        F32x8(unsafe { _mm256_loadu_ps(src.as_ptr()) })
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn mul_add(self, a: Self, b: Self) -> Self {
        F32x8(_mm256_fmadd_ps(a.0, b.0, self.0))
    }

    #[inline]
    #[target_feature(enable = "avx2,fma")]
    unsafe fn reduce_sum(self) -> f32 {
        // 8 -> 4 -> 2 -> 1
        let lo = _mm256_castps256_ps128(self.0);
        let hi = _mm256_extractf128_ps(self.0, 1);
        let quad = _mm_add_ps(lo, hi);
        let pair = _mm_add_ps(quad, _mm_movehl_ps(quad, quad));
        let single = _mm_add_ss(pair, _mm_shuffle_ps(pair, pair, 0b01));
        _mm_cvtss_f32(single)
    }
}
