//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify that the pricing, guarding, and settlement
//! components maintain their invariants across random inputs.

use proptest::prelude::*;
use rust_decimal::Decimal;

use lmsr_market_core::domain::lmsr::{quantize_cost, LmsrModel};
use lmsr_market_core::domain::market::{fee_amount, MarketState, Position, Side, TradeAction};
use lmsr_market_core::domain::oracle::{FeedObservation, OracleSample};
use lmsr_market_core::domain::settlement::{payout_per_share, position_payout};
use lmsr_market_core::domain::{FillPolicy, GuardConfig, MinFill, SCALE};
use lmsr_market_core::usecases::simulator::{apply_trade, TradeRequest};

fn dec_units(units: i64) -> Decimal {
    Decimal::new(units, 6)
}

// ── LMSR Pricing Properties ─────────────────────────────────

proptest! {
    /// Spot prices stay strictly inside (0, 1) for any book whose exponent
    /// spread is within the underflow floor.
    #[test]
    fn price_always_in_unit_interval(
        b in 100_000_000i64..2_000_000_000,
        q_yes in -2_000_000_000i64..2_000_000_000,
        q_no in -2_000_000_000i64..2_000_000_000,
    ) {
        let model = LmsrModel::from_base_units(b).unwrap();
        let price = model.price(Side::Yes, dec_units(q_yes), dec_units(q_no));
        prop_assert!(price > Decimal::ZERO, "price must be > 0, got {price}");
        prop_assert!(price < Decimal::ONE, "price must be < 1, got {price}");
    }

    /// YES and NO prices sum to exactly one.
    #[test]
    fn prices_sum_to_one(
        b in 100_000_000i64..2_000_000_000,
        q_yes in -2_000_000_000i64..2_000_000_000,
        q_no in -2_000_000_000i64..2_000_000_000,
    ) {
        let model = LmsrModel::from_base_units(b).unwrap();
        let p_yes = model.price(Side::Yes, dec_units(q_yes), dec_units(q_no));
        let p_no = model.price(Side::No, dec_units(q_yes), dec_units(q_no));
        prop_assert_eq!(p_yes + p_no, Decimal::ONE);
    }

    /// Buying more shares always costs more.
    #[test]
    fn cost_monotone_in_size(
        b in 10_000_000i64..1_000_000_000,
        small in 1_000_000i64..100_000_000,
        extra in 1_000_000i64..100_000_000,
    ) {
        let model = LmsrModel::from_base_units(b).unwrap();
        let q = Decimal::ZERO;
        let cost_small = model.trade_cost(Side::Yes, q, q, dec_units(small)).cost;
        let cost_large = model
            .trade_cost(Side::Yes, q, q, dec_units(small + extra))
            .cost;
        prop_assert!(
            cost_large > cost_small,
            "cost must grow with size: {cost_small} vs {cost_large}"
        );
    }

    /// Quantization always rounds toward the vault: the integer cost is
    /// never less than the exact decimal cost.
    #[test]
    fn quantized_cost_never_undercharges(
        b in 10_000_000i64..1_000_000_000,
        shares in 1_000_000i64..500_000_000,
    ) {
        let model = LmsrModel::from_base_units(b).unwrap();
        let quote = model.trade_cost(Side::Yes, Decimal::ZERO, Decimal::ZERO, dec_units(shares));
        let quantized = quantize_cost(quote.cost).unwrap();
        prop_assert!(Decimal::from(quantized) >= quote.cost * Decimal::from(SCALE));
    }
}

// ── Trade Application Properties ────────────────────────────

proptest! {
    /// A buy-then-sell round trip never pays the trader more than they put
    /// in — the vault keeps the rounding residue.
    #[test]
    fn round_trip_never_profits_trader(
        b in 50_000_000i64..1_000_000_000,
        shares in 1_000_000u64..200_000_000,
        fee_bps in 0u16..500,
    ) {
        let mut market = MarketState::new(b, fee_bps, 0).unwrap();
        let mut position = Position::new("p");
        let config = GuardConfig::unrestricted();

        let buy = apply_trade(
            &mut market,
            &mut position,
            &TradeRequest { side: Side::Yes, action: TradeAction::Buy, shares },
            &config,
            0,
        )
        .unwrap();
        let sell = apply_trade(
            &mut market,
            &mut position,
            &TradeRequest { side: Side::Yes, action: TradeAction::Sell, shares },
            &config,
            0,
        )
        .unwrap();

        prop_assert!(
            sell.net <= buy.net,
            "trader paid {} but received {}",
            buy.net,
            sell.net
        );
        prop_assert_eq!(market.q_yes, 0);
        prop_assert_eq!(market.vault_balance + sell.gross, buy.gross);
    }

    /// Partial fills stay within [1, requested] and satisfy the ceiling.
    #[test]
    fn partial_fill_respects_bounds(
        shares in 10_000_000u64..500_000_000,
        ceiling in 1_000_000u64..100_000_000,
    ) {
        let market = MarketState::new(500_000_000, 0, 0).unwrap();
        let config = GuardConfig {
            price_limit: None,
            slippage: None,
            max_total_cost: Some(ceiling),
            fill_policy: FillPolicy::Partial { min_fill: MinFill::AnyNonZero },
        };
        let sim = lmsr_market_core::usecases::simulate_trade(
            &TradeRequest { side: Side::Yes, action: TradeAction::Buy, shares },
            &config,
            &market,
            0,
        )
        .unwrap();
        if sim.success {
            prop_assert!(sim.shares_to_execute >= 1);
            prop_assert!(sim.shares_to_execute <= shares);
            prop_assert!(sim.total_cost <= i64::try_from(ceiling).unwrap());
        }
    }
}

// ── Settlement Properties ───────────────────────────────────

proptest! {
    /// Payout-per-share never exceeds face value, and the total paid to any
    /// split of the winning side never exceeds the vault.
    #[test]
    fn settlement_never_over_distributes(
        vault in 0u64..2_000_000_000_000,
        winning_total in 1_000_000i64..2_000_000_000,
        split in 1u64..20,
    ) {
        let pps = payout_per_share(vault, winning_total).unwrap();
        prop_assert!(pps <= SCALE);

        // Divide the winning side into `split` equal holders plus remainder.
        let total_shares = winning_total.unsigned_abs();
        let per_holder = total_shares / split;
        let mut paid = 0u64;
        for _ in 0..split {
            paid += position_payout(per_holder, pps).unwrap();
        }
        paid += position_payout(total_shares - per_holder * split, pps).unwrap();
        prop_assert!(paid <= vault, "paid {} from vault {}", paid, vault);
    }

    /// Fees floor: never more than the exact proportion.
    #[test]
    fn fee_never_exceeds_exact_proportion(
        cost in 0u64..10_000_000_000_000,
        bps in 0u16..10_000,
    ) {
        let fee = fee_amount(cost, bps);
        prop_assert!(u128::from(fee) * 10_000 <= u128::from(cost) * u128::from(bps));
        // And it is within one unit of exact.
        prop_assert!(
            (u128::from(fee) + 1) * 10_000 > u128::from(cost) * u128::from(bps)
        );
    }
}

// ── Oracle Properties ───────────────────────────────────────

proptest! {
    /// The median is always one of the three feed values and lies between
    /// the minimum and maximum.
    #[test]
    fn median_bounded_by_feeds(
        v0 in -1_000_000_000i64..1_000_000_000,
        v1 in -1_000_000_000i64..1_000_000_000,
        v2 in -1_000_000_000i64..1_000_000_000,
    ) {
        let sample = OracleSample {
            feeds: [
                FeedObservation { value: v0, timestamp: 100 },
                FeedObservation { value: v1, timestamp: 100 },
                FeedObservation { value: v2, timestamp: 100 },
            ],
            decimals: 8,
        };
        let agg = sample.aggregate(100, 90);
        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);
        prop_assert!(agg.median >= min && agg.median <= max);
        prop_assert!([v0, v1, v2].contains(&agg.median));
    }
}
