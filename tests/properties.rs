//! Property-based tests over random dimensions and inputs.

use matvec::harness::max_relative_error;
use matvec::kernels::{Kernel, UnrollWidth, Variant, matvec_baseline};
use matvec::simd::Isa;
use matvec::{Element, Problem, VectorForm};
use proptest::prelude::*;

fn variant_strategy() -> impl Strategy<Value = Variant> {
    prop::sample::select(Variant::ALL.to_vec())
}

fn unroll_strategy() -> impl Strategy<Value = UnrollWidth> {
    prop_oneof![Just(UnrollWidth::Four), Just(UnrollWidth::Eight)]
}

fn isa_strategy() -> impl Strategy<Value = Isa> {
    prop::sample::select(vec![Isa::Portable, Isa::Avx2, Isa::Avx512])
}

/// Random square matrix and vector with entries in [-1, 1].
fn matvec_input() -> impl Strategy<Value = (usize, Vec<f64>, Vec<f64>)> {
    (0usize..40).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(-1.0f64..1.0, n * n),
            prop::collection::vec(-1.0f64..1.0, n),
        )
    })
}

fn reference<T: Element>(a: &[T], b: &[T], n: usize) -> Vec<T> {
    let mut c = vec![T::zero(); n];
    matvec_baseline(a, b, &mut c, n);
    c
}

proptest! {
    #[test]
    fn generated_input_matches_variants(
        n in 1usize..70,
        variant in variant_strategy(),
        unroll in unroll_strategy(),
        isa in isa_strategy(),
    ) {
        let p = Problem::<f64>::generate(n, VectorForm::Harmonic).unwrap();
        // An unavailable ISA falls back to portable lanes
        let kernel = Kernel { variant, unroll, isa };
        let mut c = vec![0.0; n];
        kernel.run(p.a(), p.b(), &mut c, n);

        let d = max_relative_error(&reference(p.a(), p.b(), n), &c);
        prop_assert!(d.rel_error <= f64::TOLERANCE, "{:?}", d);
    }

    #[test]
    fn random_input_matches_baseline(
        (n, a, b) in matvec_input(),
        variant in variant_strategy(),
    ) {
        let expected = reference(&a, &b, n);
        let mut c = vec![0.0; n];
        Kernel::new(variant).run(&a, &b, &mut c, n);

        // Signed inputs can cancel, so compare against the sum of magnitudes
        for i in 0..n {
            let scale: f64 = (0..n).map(|k| (a[i * n + k] * b[k]).abs()).sum();
            prop_assert!(
                (expected[i] - c[i]).abs() <= 1e-12 * scale.max(1.0),
                "row {} of {}: {} vs {}", i, variant, expected[i], c[i]
            );
        }
    }

    #[test]
    fn generator_is_pure(n in 1usize..50) {
        let p = Problem::<f32>::generate(n, VectorForm::Shifted).unwrap();
        for i in 0..n {
            prop_assert_eq!(p.b()[i], 1.0f32 / (i + 2) as f32);
            for j in 0..n {
                prop_assert_eq!(p.a()[i * n + j], 1.0f32 / (i + j + 2) as f32);
            }
        }
    }
}
