//! LMSR Pricing Benchmarks — Hot-Path Performance Validation
//!
//! Benchmarks the functions that run on every trade: cost evaluation,
//! guard checks, and the partial-fill search (which evaluates guards up to
//! seventeen times per trade).
//!
//! Run with: cargo bench --bench lmsr_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;

use lmsr_market_core::domain::guards;
use lmsr_market_core::domain::lmsr::LmsrModel;
use lmsr_market_core::domain::market::{MarketState, Side, TradeAction};
use lmsr_market_core::domain::{find_max_executable, FillPolicy, GuardConfig, MinFill};

fn market() -> MarketState {
    let mut m = MarketState::new(500_000_000, 25, 64_000).unwrap();
    m.q_yes = 120_000_000;
    m.q_no = 80_000_000;
    m
}

/// Spot price on a skewed book.
fn bench_spot_price(c: &mut Criterion) {
    let model = LmsrModel::from_base_units(500_000_000).unwrap();
    let q_yes = Decimal::new(120_000_000, 6);
    let q_no = Decimal::new(80_000_000, 6);

    c.bench_function("lmsr_spot_price", |b| {
        b.iter(|| model.price(black_box(Side::Yes), black_box(q_yes), black_box(q_no)));
    });
}

/// Cost of a 100-share buy.
fn bench_trade_cost(c: &mut Criterion) {
    let model = LmsrModel::from_base_units(500_000_000).unwrap();
    let q_yes = Decimal::new(120_000_000, 6);
    let q_no = Decimal::new(80_000_000, 6);
    let delta = Decimal::new(100_000_000, 6);

    c.bench_function("lmsr_trade_cost_100_shares", |b| {
        b.iter(|| {
            model.trade_cost(
                black_box(Side::Yes),
                black_box(q_yes),
                black_box(q_no),
                black_box(delta),
            )
        });
    });
}

/// Full guard evaluation with every check enabled.
fn bench_guard_evaluate(c: &mut Criterion) {
    let m = market();
    let config = GuardConfig {
        price_limit: Some(Decimal::new(700_000, 6)),
        slippage: None,
        max_total_cost: Some(100_000_000),
        fill_policy: FillPolicy::AllOrNothing,
    };

    c.bench_function("guard_evaluate_all_checks", |b| {
        b.iter(|| {
            guards::evaluate(
                black_box(Side::Yes),
                black_box(TradeAction::Buy),
                black_box(100_000_000),
                &config,
                &m,
                black_box(0),
            )
        });
    });
}

/// Worst-case partial-fill search: ceiling forces the full sixteen probes.
fn bench_partial_fill_search(c: &mut Criterion) {
    let m = market();
    let config = GuardConfig {
        price_limit: None,
        slippage: None,
        max_total_cost: Some(30_000_000),
        fill_policy: FillPolicy::Partial { min_fill: MinFill::AnyNonZero },
    };

    c.bench_function("partial_fill_search_16_probes", |b| {
        b.iter(|| {
            find_max_executable(
                black_box(Side::Yes),
                black_box(TradeAction::Buy),
                black_box(200_000_000),
                MinFill::AnyNonZero,
                &config,
                &m,
                black_box(0),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_spot_price,
    bench_trade_cost,
    bench_guard_evaluate,
    bench_partial_fill_search
);
criterion_main!(benches);
