//! Target-independent lanes backed by plain arrays.
//!
//! Used when no x86 extension is available or when `--isa portable` is
//! requested. The compiler may still auto-vectorize the lane loops.

use crate::element::Element;
use crate::simd::Lanes;

/// `L` lanes of `T` held in an array.
#[derive(Debug, Clone, Copy)]
pub struct Portable<T, const L: usize>([T; L]);

impl<T: Element, const L: usize> Lanes for Portable<T, L> {
    type Elem = T;
    const WIDTH: usize = L;

    #[inline(always)]
    unsafe fn zero() -> Self {
        Portable([T::zero(); L])
    }

    #[inline(always)]
    unsafe fn load(src: &[T]) -> Self {
        let mut lanes = [T::zero(); L];
        lanes.copy_from_slice(&src[..L]);
        Portable(lanes)
    }

    #[inline(always)]
    unsafe fn mul_add(self, a: Self, b: Self) -> Self {
        let mut acc = self.0;
        for ((slot, x), y) in acc.iter_mut().zip(a.0).zip(b.0) {
            *slot += x * y;
        }
        Portable(acc)
    }

    #[inline(always)]
    unsafe fn reduce_sum(self) -> T {
        self.0.into_iter().sum()
    }
}
