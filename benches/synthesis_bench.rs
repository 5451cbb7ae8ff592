//! Benchmarks for the pieces of the synthesis pipeline that run on every
//! annealing iteration: mutation, fitness scoring, and a short end-to-end
//! optimization run.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use regexsmith::core::annealing::{AnnealingDriver, OptimizeConfig};
use regexsmith::core::fitness::{MultiCriteriaScorer, ScoringMode};
use regexsmith::core::mutator::Mutator;
use regexsmith::core::pattern::{Bound, Pattern};
use std::collections::BTreeSet;

fn digit_class() -> Pattern {
    Pattern::char_class(BTreeSet::new(), vec![('0', '9')], false)
}

fn bench_mutate(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutate");
    let seed_pattern = Pattern::quantifier(digit_class(), 1, Bound::Infinite, false);

    group.bench_function("single_mutation", |b| {
        let mut mutator = Mutator::new(1, 0.3);
        b.iter(|| black_box(mutator.mutate(black_box(&seed_pattern))));
    });

    group.finish();
}

fn bench_fitness_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");
    let pattern = Pattern::quantifier(digit_class(), 1, Bound::Infinite, false);
    let positives: Vec<String> = (0..20).map(|n| n.to_string()).collect();
    let negatives: Vec<String> = vec!["abc".to_string(), "x1y".to_string()];

    for mode in [ScoringMode::Minimal, ScoringMode::Balanced, ScoringMode::Readable] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{mode:?}")), &mode, |b, mode| {
            let scorer = MultiCriteriaScorer::new(*mode);
            b.iter(|| black_box(scorer.score(black_box(&pattern), &positives, &negatives)));
        });
    }

    group.finish();
}

fn bench_short_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    let positives = vec!["123".to_string(), "456".to_string(), "789".to_string()];
    let negatives = vec!["abc".to_string()];
    let scorer = MultiCriteriaScorer::new(ScoringMode::Balanced);

    group.bench_function("200_iterations", |b| {
        let config = OptimizeConfig {
            seed: 42,
            max_iterations: 200,
            max_no_improvement: 200,
            ..OptimizeConfig::default()
        };
        let driver = AnnealingDriver::new(config);
        b.iter(|| black_box(driver.optimize(&positives, &negatives, &scorer, None).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_mutate, bench_fitness_score, bench_short_optimize);
criterion_main!(benches);
