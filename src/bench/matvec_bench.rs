use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use matvec::kernels::{Kernel, UnrollWidth, Variant};
use matvec::simd::Isa;
use matvec::{Problem, VectorForm};

const SIZES: [usize; 3] = [256, 1024, 2048];

fn bench_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("matvec_f64");

    for &n in &SIZES {
        let p = Problem::<f64>::generate(n, VectorForm::Harmonic).unwrap();
        let mut out = vec![0.0f64; n];
        // 2 flops per term
        group.throughput(Throughput::Elements(2 * (n * n) as u64));

        for variant in Variant::ALL {
            let kernel = Kernel::new(variant);
            group.bench_with_input(BenchmarkId::new(variant.as_str(), n), &n, |bench, &n| {
                bench.iter(|| kernel.run(black_box(p.a()), black_box(p.b()), &mut out, n));
            });
        }
    }

    group.finish();
}

fn bench_widths(c: &mut Criterion) {
    let n = 1024;
    let p32 = Problem::<f32>::generate(n, VectorForm::Harmonic).unwrap();
    let mut out = vec![0.0f32; n];

    let mut group = c.benchmark_group("matvec_f32_width");
    group.throughput(Throughput::Elements(2 * (n * n) as u64));

    for unroll in [UnrollWidth::Four, UnrollWidth::Eight] {
        let mut kernel = Kernel::new(Variant::Unrolled);
        kernel.unroll = unroll;
        group.bench_function(format!("unroll_{}", unroll.get()), |bench| {
            bench.iter(|| kernel.run(black_box(p32.a()), black_box(p32.b()), &mut out, n));
        });
    }

    for isa in [Isa::Portable, Isa::Avx2, Isa::Avx512] {
        if !isa.is_available() {
            continue;
        }
        let mut kernel = Kernel::new(Variant::Vectorized);
        kernel.isa = isa;
        group.bench_function(format!("simd_{}", isa), |bench| {
            bench.iter(|| kernel.run(black_box(p32.a()), black_box(p32.b()), &mut out, n));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_variants, bench_widths);
criterion_main!(benches);
