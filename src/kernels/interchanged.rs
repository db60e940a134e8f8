use crate::element::Element;

/// Matrix-vector product using k-i loop order.
///
/// Same sum of products as [`matvec_baseline`](super::baseline::matvec_baseline),
/// but the loops are swapped: the inner loop walks down a column of A with
/// stride `n`, so every element of A touches a different cache line once
/// `n` is large. Expected to be slower; it exists to measure that.
///
/// # Arguments
///
/// * `a` - Matrix A (n × n), row-major
/// * `b` - Vector b (n)
/// * `c` - Result c (n), overwritten
/// * `n` - Dimension
pub fn matvec_interchanged<T: Element>(a: &[T], b: &[T], c: &mut [T], n: usize) {
    c[..n].fill(T::zero());

    for k in 0..n {
        for i in 0..n {
            c[i] += a[i * n + k] * b[k];
        }
    }
}
