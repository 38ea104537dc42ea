use affinity::{all_centers, run_batch, AnalysisSettings, Analyzer, RelationshipGraph, RelationshipRecord};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// Deterministic relationship table: each project links to a handful of
/// nearby projects plus one of a few shared hubs
fn synthetic_records(projects: usize) -> Vec<RelationshipRecord> {
    let mut records = Vec::with_capacity(projects * 6);
    for i in 0..projects {
        let source = format!("P{}", i);
        for step in 1..=4 {
            let j = (i + step * 7) % projects;
            records.push(RelationshipRecord::new(source.clone(), format!("P{}", j), ((i * step) % 13 + 1) as i64));
        }
        records.push(RelationshipRecord::new(source.clone(), format!("HUB{}", i % 5), 3));
    }
    records
}

/// Benchmark graph construction from raw records
fn bench_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");

    for size in [100, 1000, 10_000].iter() {
        let records = synthetic_records(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let graph = RelationshipGraph::build(records.clone());
                criterion::black_box(graph.edge_count());
            });
        });
    }
    group.finish();
}

/// Benchmark single-center analysis on a hub
fn bench_analyze_hub(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_hub");

    for size in [100, 1000, 10_000].iter() {
        let graph = RelationshipGraph::build(synthetic_records(*size));
        let analyzer = Analyzer::new(&graph, AnalysisSettings::default());

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let view = analyzer.analyze("HUB0");
                criterion::black_box(view.map(|v| v.neighbors.len()).unwrap_or(0));
            });
        });
    }
    group.finish();
}

/// Benchmark analyzing every entity
fn bench_batch_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_all");
    group.sample_size(10);

    for size in [100, 1000].iter() {
        let graph = RelationshipGraph::build(synthetic_records(*size));
        let analyzer = Analyzer::new(&graph, AnalysisSettings::default());
        let centers = all_centers(&graph);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let report = run_batch(&analyzer, &centers);
                criterion::black_box(report.map(|r| r.outcomes.len()).unwrap_or(0));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_graph_build, bench_analyze_hub, bench_batch_all);
criterion_main!(benches);
