//! Pipeline throughput on synthetic prices.

#![allow(missing_docs)]

use capm::{
    Analysis, AnalysisConfig, BetaEstimator, BetaEstimatorConfig, PriceSeries, align,
    daily_returns,
};
use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DAYS: u64 = 2520;

fn random_walk(rng: &mut StdRng, symbol: &str, start_price: f64) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
    let mut price = start_price;
    let points = (0..DAYS)
        .map(|i| {
            price *= 1.0 + rng.gen_range(-0.03..0.03);
            (start + Days::new(i), price)
        })
        .collect();
    PriceSeries::new(symbol, points).unwrap()
}

fn universe(n_assets: usize) -> (PriceSeries, Vec<PriceSeries>) {
    let mut rng = StdRng::seed_from_u64(252);
    let benchmark = random_walk(&mut rng, "sp500", 2000.0);
    let assets = (0..n_assets)
        .map(|i| random_walk(&mut rng, &format!("A{i:03}"), 100.0))
        .collect();
    (benchmark, assets)
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for n in [8, 32] {
        let (benchmark, assets) = universe(n);
        let analysis = Analysis::new(AnalysisConfig {
            assets: assets.iter().map(|s| s.symbol().to_string()).collect(),
            ..Default::default()
        })
        .unwrap();
        group.bench_with_input(BenchmarkId::new("run", n), &assets, |b, assets| {
            b.iter(|| analysis.run(black_box(&benchmark), black_box(assets)).unwrap())
        });
    }
    group.finish();
}

fn bench_beta(c: &mut Criterion) {
    let (benchmark, assets) = universe(32);
    let returns = daily_returns(&align(&benchmark, &assets).unwrap()).unwrap();

    let mut group = c.benchmark_group("beta");
    for parallel in [false, true] {
        let estimator = BetaEstimator::with_config(BetaEstimatorConfig {
            parallel,
            ..Default::default()
        });
        group.bench_with_input(
            BenchmarkId::new("estimate_all", if parallel { "parallel" } else { "sequential" }),
            &returns,
            |b, returns| b.iter(|| estimator.estimate_all(black_box(returns)).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_beta);
criterion_main!(benches);
