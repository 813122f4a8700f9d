use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use schemabench_harness::{
    AdapterRegistry, BenchmarkConfig, BenchmarkSuite, ErrorLimit, InstanceGenerator, SchemaFixture, ValidatorConfig,
    run_pass,
};
use std::hint::black_box;

/// Benchmark: one full pass over each realistic corpus, per adapter and error mode
fn bench_is_valid(c: &mut Criterion) {
    let registry = AdapterRegistry::with_default_adapters();
    let suites = BenchmarkSuite::realistic_suites(&BenchmarkConfig::default());

    for (label, error_limit) in [("one", ErrorLimit::First), ("all", ErrorLimit::All)] {
        let config = ValidatorConfig {
            error_limit,
            ..Default::default()
        };
        let mut group = c.benchmark_group(format!("is_valid/{label}"));

        for suite in &suites {
            group.throughput(Throughput::Elements(suite.corpus().len() as u64));

            for name in registry.adapter_names() {
                let Some(adapter) = registry.get(&name) else {
                    continue;
                };
                let handle = match adapter.prepare(suite.schema(), &config) {
                    Ok(handle) => handle,
                    Err(e) => {
                        eprintln!("skipping {name}/{}: {e}", suite.name());
                        continue;
                    }
                };

                group.bench_with_input(BenchmarkId::new(name.as_str(), suite.name()), suite, |b, suite| {
                    b.iter(|| match run_pass(handle.as_ref(), black_box(suite.corpus())) {
                        Ok(elapsed) => elapsed,
                        Err(failure) => panic!("{name}/{}: {failure:?}", suite.name()),
                    })
                });
            }
        }

        group.finish();
    }
}

/// Benchmark: schema preparation alone, per adapter and error mode
fn bench_prepare(c: &mut Criterion) {
    let registry = AdapterRegistry::with_default_adapters();
    let schema = SchemaFixture::realistic();
    let mut group = c.benchmark_group("prepare");

    for (label, error_limit) in [("one", ErrorLimit::First), ("all", ErrorLimit::All)] {
        let config = ValidatorConfig {
            error_limit,
            ..Default::default()
        };

        for name in registry.adapter_names() {
            let Some(adapter) = registry.get(&name) else {
                continue;
            };
            if let Err(e) = adapter.prepare(&schema, &config) {
                eprintln!("skipping {name}: {e}");
                continue;
            }

            group.bench_function(BenchmarkId::new(name.as_str(), label), |b| {
                b.iter(|| match adapter.prepare(black_box(&schema), &config) {
                    Ok(handle) => handle,
                    Err(e) => panic!("{name}: {e}"),
                })
            });
        }
    }

    group.finish();
}

/// Benchmark: corpus generation cost, for comparison with validation cost
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for count in [1usize, 10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| InstanceGenerator::new(black_box(11_664_987_322_298)).corpus(count))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_is_valid, bench_prepare, bench_generate);
criterion_main!(benches);
