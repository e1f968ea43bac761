use criterion::{Criterion, criterion_group, criterion_main};
use parallel_features::core::config::{ExtendedOptions, RunConfig};
use parallel_features::core::rewrite::rewrite;
use parallel_features::core::splitter::split;
use std::fs;
use std::hint::black_box;
use std::path::PathBuf;

fn bench_rewrite(c: &mut Criterion) {
    c.bench_function("rewrite_prefixed_path", |b| {
        b.iter(|| rewrite(black_box("json:target/cucumber/report.json"), black_box(42)));
    });
}

fn bench_split(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..200 {
        let sub = dir.path().join(format!("area{}", i % 10));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("f{i}.feature")), "Feature: bench\n").unwrap();
    }

    let mut config = RunConfig::new(vec![dir.path().to_path_buf()], "cucumber {feature}");
    config.cucumber.plugins = vec![
        "json:out/report.json".parse().unwrap(),
        "junit:out/junit.xml".parse().unwrap(),
    ];
    config.extended = vec![ExtendedOptions {
        threads_count: 8,
        output_folder: Some(PathBuf::from("out/extended")),
        json_report: Some("out/report.json".to_string()),
        ..ExtendedOptions::default()
    }];

    c.bench_function("split_200_features", |b| {
        b.iter(|| split(black_box(&config)).unwrap());
    });
}

criterion_group!(benches, bench_rewrite, bench_split);
criterion_main!(benches);
