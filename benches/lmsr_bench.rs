//! LMSR Engine Benchmarks — Preview Hot Path
//!
//! A preview is recomputed on every keystroke of the spend field, so the
//! share solve must stay far below a frame budget.
//!
//! Run with: cargo bench --bench lmsr_bench

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ospm_lmsr::domain::format::format_number;
use ospm_lmsr::domain::lmsr::LmsrEngine;
use ospm_lmsr::domain::trade::{MarketState, Side, TradeIntent};

/// Benchmark the price function for a binary market.
fn bench_lmsr_price(c: &mut Criterion) {
    let engine = LmsrEngine::default();
    let state = MarketState::new(60.0, 40.0, 100.0).unwrap();

    c.bench_function("lmsr_price_binary", |b| {
        b.iter(|| engine.price(black_box(&state)));
    });
}

/// Benchmark the forward cost of 10 shares.
fn bench_lmsr_buy_cost(c: &mut Criterion) {
    let engine = LmsrEngine::default();
    let state = MarketState::new(60.0, 40.0, 100.0).unwrap();

    c.bench_function("lmsr_buy_cost_10_shares", |b| {
        b.iter(|| engine.buy_cost(black_box(&state), Side::Yes, black_box(10.0)));
    });
}

/// Benchmark the inverse solve, balanced and lopsided.
fn bench_simulate_buy(c: &mut Criterion) {
    let engine = LmsrEngine::default();
    let balanced = MarketState::new(0.0, 0.0, 10.0).unwrap();
    let lopsided = MarketState::new(0.0, 400.0, 10.0).unwrap();
    let intent = TradeIntent::new(Side::Yes, 25.0).unwrap();

    c.bench_function("simulate_buy_balanced", |b| {
        b.iter(|| engine.simulate_buy(black_box(&balanced), black_box(&intent)));
    });
    c.bench_function("simulate_buy_lopsided", |b| {
        b.iter(|| engine.simulate_buy(black_box(&lopsided), black_box(&intent)));
    });
}

/// Benchmark quantity formatting.
fn bench_format_number(c: &mut Criterion) {
    c.bench_function("format_number_grouped", |b| {
        b.iter(|| format_number(black_box(1_234_567.89)));
    });
}

criterion_group!(
    benches,
    bench_lmsr_price,
    bench_lmsr_buy_cost,
    bench_simulate_buy,
    bench_format_number,
);
criterion_main!(benches);
