//! Property-Based Tests — Domain Layer Invariants
//!
//! Uses `proptest` to verify that the LMSR engine and formatting helpers
//! maintain their mathematical invariants across random inputs.

use proptest::prelude::*;

use ospm_lmsr::domain::format::{format_number, format_probability};
use ospm_lmsr::domain::error::LmsrError;
use ospm_lmsr::domain::lmsr::{buy_cost, cost, price, simulate_buy};
use ospm_lmsr::domain::trade::Side;

fn any_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Yes), Just(Side::No)]
}

// ── Price Properties ────────────────────────────────────────

proptest! {
    /// Prices must sum to one and stay strictly inside (0, 1).
    #[test]
    fn prices_sum_to_one(
        q_yes in -1e4f64..1e4,
        q_no in -1e4f64..1e4,
        b in 0.1f64..1e4,
    ) {
        let p = price(q_yes, q_no, b).unwrap();
        prop_assert!((p.yes + p.no - 1.0).abs() < 1e-9, "sum = {}", p.yes + p.no);
        prop_assert!(p.yes > 0.0 && p.yes < 1.0, "p_yes = {}", p.yes);
        prop_assert!(p.no > 0.0 && p.no < 1.0, "p_no = {}", p.no);
    }

    /// YES price strictly increases with YES shares.
    #[test]
    fn yes_price_increases_with_q_yes(
        q_yes in -50.0f64..50.0,
        q_no in -50.0f64..50.0,
        b in 10.0f64..500.0,
        inc in 0.1f64..50.0,
    ) {
        let before = price(q_yes, q_no, b).unwrap().yes;
        let after = price(q_yes + inc, q_no, b).unwrap().yes;
        prop_assert!(after > before, "p({q_yes})={before} >= p({})={after}", q_yes + inc);
    }

    /// Large q/b never overflows the cost function.
    #[test]
    fn cost_stays_finite_for_large_quantities(
        q_yes in 0.0f64..1e7,
        q_no in 0.0f64..1e7,
        b in 1.0f64..100.0,
    ) {
        let c = cost(q_yes, q_no, b).unwrap();
        prop_assert!(c.is_finite());
        prop_assert!(c >= q_yes.max(q_no));
    }
}

// ── Trade Properties ────────────────────────────────────────

proptest! {
    /// Buying shares always costs something, and no more than one token
    /// per share.
    #[test]
    fn buy_cost_positive_and_below_share_count(
        side in any_side(),
        q_yes in -100.0f64..100.0,
        q_no in -100.0f64..100.0,
        b in 10.0f64..500.0,
        delta in 0.01f64..1000.0,
    ) {
        let c = buy_cost(side, q_yes, q_no, b, delta).unwrap();
        prop_assert!(c > 0.0, "cost = {c}");
        prop_assert!(c < delta, "cost {c} >= shares {delta}");
    }

    /// Across extreme imbalances, buying is never free: the cost is either
    /// positive or reported as an underflow.
    #[test]
    fn buy_cost_never_silently_zero(
        side in any_side(),
        q_yes in -1e5f64..1e5,
        q_no in -1e5f64..1e5,
        b in 1e-3f64..1e6,
        delta in 1e-3f64..1e4,
    ) {
        match buy_cost(side, q_yes, q_no, b, delta) {
            Ok(c) => {
                prop_assert!(c > 0.0, "cost = {c}");
                prop_assert!(c <= delta * (1.0 + 1e-9), "cost {c} > shares {delta}");
            }
            Err(e) => prop_assert_eq!(e, LmsrError::CostUnderflow { delta }),
        }
    }

    /// Spending the cost of `delta` shares buys back `delta` shares.
    #[test]
    fn simulate_buy_inverts_buy_cost(
        side in any_side(),
        q_yes in -100.0f64..100.0,
        q_no in -100.0f64..100.0,
        b in 10.0f64..500.0,
        delta in 0.5f64..500.0,
    ) {
        let spend = buy_cost(side, q_yes, q_no, b, delta).unwrap();
        let preview = simulate_buy(side, q_yes, q_no, b, spend).unwrap();
        let rel = (preview.delta_shares - delta).abs() / delta;
        prop_assert!(rel < 1e-6, "solved {} for {delta} (rel {rel})", preview.delta_shares);
        prop_assert!((preview.cost - spend).abs() <= 1e-6 * spend);
        prop_assert!(preview.p_after > preview.p_before);
    }

    /// More spend buys strictly more shares.
    #[test]
    fn shares_increase_with_spend(
        side in any_side(),
        q_yes in -100.0f64..100.0,
        q_no in -100.0f64..100.0,
        b in 10.0f64..500.0,
        spend in 0.1f64..500.0,
        extra in 0.01f64..500.0,
    ) {
        let small = simulate_buy(side, q_yes, q_no, b, spend).unwrap();
        let large = simulate_buy(side, q_yes, q_no, b, spend + extra).unwrap();
        prop_assert!(
            large.delta_shares > small.delta_shares,
            "{} shares for {} vs {} shares for {}",
            small.delta_shares, spend, large.delta_shares, spend + extra
        );
    }

    /// In a balanced market, deeper liquidity means a smaller price move
    /// for the same spend.
    #[test]
    fn deeper_liquidity_moves_price_less(
        side in any_side(),
        q in -100.0f64..100.0,
        spend in 0.5f64..50.0,
        b in 5.0f64..500.0,
        factor in 1.1f64..10.0,
    ) {
        let shallow = simulate_buy(side, q, q, b, spend).unwrap();
        let deep = simulate_buy(side, q, q, b * factor, spend).unwrap();
        let shallow_move = shallow.p_after - shallow.p_before;
        let deep_move = deep.p_after - deep.p_before;
        prop_assert!(deep_move < shallow_move, "deep {deep_move} >= shallow {shallow_move}");
    }

    /// Non-positive spends never produce a preview.
    #[test]
    fn non_positive_spend_has_no_preview(
        side in any_side(),
        spend in -1e6f64..=0.0,
        b in 0.1f64..1e3,
    ) {
        prop_assert!(simulate_buy(side, 0.0, 0.0, b, spend).is_err());
    }
}

// ── Formatting Properties ───────────────────────────────────

proptest! {
    /// Probability strings parse back to the input within rounding.
    #[test]
    fn probability_string_round_trips(p in 0.0f64..=1.0) {
        let text = format_probability(p);
        prop_assert!(text.ends_with('%'));
        let parsed: f64 = text.trim_end_matches('%').parse().unwrap();
        prop_assert!((parsed - p * 100.0).abs() <= 0.05 + 1e-9, "{text} for {p}");
    }

    /// Grouped numbers keep exactly one decimal and parse back.
    #[test]
    fn number_string_round_trips(x in -1e9f64..1e9) {
        let text = format_number(x);
        let (_, frac) = text.split_once('.').unwrap();
        prop_assert_eq!(frac.len(), 1);
        let parsed: f64 = text.replace(',', "").parse().unwrap();
        prop_assert!((parsed - x).abs() <= 0.05 + 1e-6, "{} for {}", text, x);
    }
}
