use crate::element::Element;

/// Matrix-vector product using i-k loop order.
///
/// The textbook form: for each row of A, walk it left to right and
/// accumulate into one scalar. Both A and b are read with stride 1.
///
/// This is the reference result every other variant is checked against.
///
/// # Arguments
///
/// * `a` - Matrix A (n × n), row-major
/// * `b` - Vector b (n)
/// * `c` - Result c (n), overwritten
/// * `n` - Dimension
pub fn matvec_baseline<T: Element>(a: &[T], b: &[T], c: &mut [T], n: usize) {
    for i in 0..n {
        let mut sum = T::zero();
        for k in 0..n {
            sum += a[i * n + k] * b[k];
        }
        c[i] = sum;
    }
}
