use criterion::{criterion_group, criterion_main, Criterion};
use seriesfit::{FitKind, Series, WindowSpec};
use std::hint::black_box;

fn gen_sample_data(n: f64) -> Series {
    Series::from_fn(1.0..=n, 1.0, |x| 5.3 * x * x + 3.0 * x + 1.0 + (x * 0.7).sin() * 50.0)
}

fn criterion_benchmark(c: &mut Criterion) {
    //
    // How the polynomial fit scales with data size
    println!("Benchmarking polynomial fit vs n (order=3)...");
    test_scaling_criterion_group(
        c,
        "polynomial_vs_n",
        &[
            CriterionTestEntry::new("n=100", 1e2, gen_sample_data(1e2)),
            CriterionTestEntry::new("n=1_000", 1e3, gen_sample_data(1e3)),
            CriterionTestEntry::new("n=10_000", 1e4, gen_sample_data(1e4)),
            CriterionTestEntry::new("n=100_000", 1e5, gen_sample_data(1e5)),
        ],
        FitKind::Linear,
        |b, data| b.iter(|| black_box(data).fit_polynomial(3)),
    );

    //
    // Now the same but scaling with order
    println!("Benchmarking polynomial fit vs order (n=1000)...");
    let samples = gen_sample_data(1e3);
    test_scaling_criterion_group(
        c,
        "polynomial_vs_order",
        &[
            CriterionTestEntry::new("order=1", 1.0, (1, &samples)),
            CriterionTestEntry::new("order=2", 2.0, (2, &samples)),
            CriterionTestEntry::new("order=3", 3.0, (3, &samples)),
            CriterionTestEntry::new("order=5", 5.0, (5, &samples)),
            CriterionTestEntry::new("order=7", 7.0, (7, &samples)),
        ],
        FitKind::Polynomial,
        |b, (order, data)| b.iter(|| black_box(data).fit_polynomial(*order)),
    );

    //
    // LOESS window cost grows with n, so the total is quadratic at a fixed bandwidth
    println!("Benchmarking LOESS vs n (bandwidth=0.1)...");
    test_scaling_criterion_group(
        c,
        "loess_vs_n",
        &[
            CriterionTestEntry::new("n=100", 1e2, gen_sample_data(1e2)),
            CriterionTestEntry::new("n=500", 5e2, gen_sample_data(5e2)),
            CriterionTestEntry::new("n=1_000", 1e3, gen_sample_data(1e3)),
            CriterionTestEntry::new("n=5_000", 5e3, gen_sample_data(5e3)),
        ],
        FitKind::Polynomial,
        |b, data| b.iter(|| black_box(data).loess(0.1)),
    );

    //
    // Then every closed-form kind on the same data
    println!("Benchmarking fit vs kind (n=1000)...");
    let samples = gen_sample_data(1e3);
    let mut group = c.benchmark_group("fit_vs_kind");
    for kind in FitKind::ALL {
        group.bench_function(kind.tag(), |b| {
            b.iter(|| black_box(&samples).fit(kind, 3))
        });
    }
    group.finish();

    //
    // And the windowed walk
    println!("Benchmarking map/reduce (n=100_000)...");
    let samples = gen_sample_data(1e5);
    let mut group = c.benchmark_group("map_reduce");
    for count in [10, 100, 1_000] {
        let window = WindowSpec::new(1e5 / count as f64, count).expect("valid window");
        group.bench_function(format!("windows={count}"), |b| {
            b.iter(|| {
                black_box(&samples).map_reduce(
                    |w| (w.x()[0], w.mean()),
                    Series::from_arrays,
                    window,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

fn get_data_for_run<V>(group_id: &str, tests: &[CriterionTestEntry<V>]) -> Series {
    // Each test corresponds to a different x value in the series
    let points: Vec<_> = tests
        .iter()
        .map(|test| {
            let y = get_sample_for_run(group_id, &test.id);
            (test.x, y)
        })
        .collect();
    Series::from_points(&points).expect("Entries must be ordered by x")
}

fn get_sample_for_run(group_id: &str, test_id: &str) -> f64 {
    #[derive(serde::Deserialize)]
    struct CriterionSamples {
        iters: Vec<f64>,
        times: Vec<f64>,
    }

    let raw = std::fs::read_to_string(format!(
        "target/criterion/{group_id}/{test_id}/new/sample.json"
    ))
    .expect("Failed to read sample data");
    let samples: CriterionSamples =
        serde_json::from_str(&raw).expect("Failed to parse sample data");

    samples
        .iters
        .iter()
        .zip(samples.times.iter())
        .map(|(i, t)| t / i)
        .sum::<f64>()
        / (samples.iters.len() as f64)
}

struct CriterionTestEntry<V> {
    id: String,
    x: f64,
    values: V,
}
impl<V> CriterionTestEntry<V> {
    pub fn new(id: &str, x: f64, values: V) -> Self {
        Self {
            id: id.to_string(),
            x,
            values,
        }
    }
}

/// Runs one benchmark per entry, then reports how well `expected` describes time vs x.
fn test_scaling_criterion_group<F, V>(
    c: &mut Criterion,
    id: &str,
    samples: &[CriterionTestEntry<V>],
    expected: FitKind,
    runner: F,
) where
    for<'a, 'b, 'c> F: Fn(&'a mut criterion::Bencher<'b>, &'c V),
{
    let mut group = c.benchmark_group(id);
    for sample in samples {
        group.bench_with_input(&sample.id, &sample.values, &runner);
    }
    group.finish();

    let timings = get_data_for_run(id, samples);
    match timings
        .fit(expected, 2)
        .and_then(|fit| Ok((fit.r_squared(&timings)?, fit)))
    {
        Ok((r2, fit)) => println!("{id}: R² = {r2:.4} for {fit}"),
        Err(err) => println!("{id}: could not fit timings ({err})"),
    }
}
