//! Logarithmic Market Scoring Rule (LMSR) implementation.
//!
//! Prices and costs for binary YES/NO markets, plus the inverse solve
//! that turns a token spend into a share count.
//! Reference: Hanson (2003) "Combinatorial Information Market Design"
//!
//! All evaluation is shifted so that no exponential ever sees a positive
//! argument; `q/b` in the hundreds of thousands stays finite.

use serde::{Deserialize, Serialize};

use super::error::LmsrError;
use super::trade::{MarketState, Side, TradeIntent, TradePreview};

/// Default stopping tolerance of the share solve (relative, on cost).
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Default iteration budget of the share solve.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// A solved preview must reproduce the spend within this relative error.
pub const COST_MATCH_TOLERANCE: f64 = 1e-6;

/// Smallest price ever reported for an outcome.
pub const PRICE_FLOOR: f64 = f64::EPSILON;

/// Instantaneous prices of both outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prices {
    pub yes: f64,
    pub no: f64,
}

impl Prices {
    /// Price of the given side.
    pub const fn of(&self, side: Side) -> f64 {
        match side {
            Side::Yes => self.yes,
            Side::No => self.no,
        }
    }
}

/// LMSR pricing engine for binary markets.
///
/// Holds only the tuning of the share solve; market state is passed to
/// every call, so one engine can be shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmsrEngine {
    tolerance: f64,
    max_iterations: u32,
}

impl Default for LmsrEngine {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl LmsrEngine {
    /// Creates an engine with custom solve tuning.
    ///
    /// Non-positive or non-finite tolerances fall back to the default, as
    /// does a zero iteration budget.
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance: if tolerance.is_finite() && tolerance > 0.0 {
                tolerance
            } else {
                DEFAULT_TOLERANCE
            },
            max_iterations: if max_iterations == 0 {
                DEFAULT_MAX_ITERATIONS
            } else {
                max_iterations
            },
        }
    }

    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Computes the LMSR cost function: C(q) = b * ln(exp(q_yes/b) + exp(q_no/b)).
    ///
    /// Evaluated as `m + b * ln(exp((q_yes-m)/b) + exp((q_no-m)/b))`
    /// with `m = max(q_yes, q_no)`.
    ///
    /// # Errors
    /// Rejects invalid market states.
    pub fn cost(&self, state: &MarketState) -> Result<f64, LmsrError> {
        state.validate()?;
        Ok(shifted_cost(state))
    }

    /// Computes the instantaneous prices (softmax of `q/b`).
    ///
    /// The smaller price is floored at [`PRICE_FLOOR`] and the larger is
    /// its complement, so both stay strictly inside (0, 1).
    ///
    /// # Errors
    /// Rejects invalid market states.
    pub fn price(&self, state: &MarketState) -> Result<Prices, LmsrError> {
        state.validate()?;
        Ok(shifted_prices(state))
    }

    /// Cost of buying exactly `delta` shares of `side`:
    /// `C(state + delta on side) - C(state)`.
    ///
    /// Computed as `b * softplus(ln p_side + ln(exp(delta/b) - 1))`, the
    /// same quantity without the cancellation of subtracting two costs.
    ///
    /// # Errors
    /// - Invalid states and non-positive or non-finite `delta`
    /// - `CostUnderflow` when the true cost is positive but below the
    ///   smallest f64 (a side priced far under [`PRICE_FLOOR`])
    pub fn buy_cost(
        &self,
        state: &MarketState,
        side: Side,
        delta: f64,
    ) -> Result<f64, LmsrError> {
        state.validate()?;
        if !(delta.is_finite() && delta > 0.0) {
            return Err(LmsrError::InvalidShares(delta));
        }
        let curve = CostCurve::new(state, side);
        let cost = curve.cost(delta / state.b);
        if cost > 0.0 {
            Ok(cost)
        } else {
            Err(LmsrError::CostUnderflow { delta })
        }
    }

    /// Solves for the shares a spend buys and returns the full preview.
    ///
    /// # Errors
    /// - `InvalidSpend` for non-positive or non-finite spend (no preview)
    /// - `NoConvergence` if the solve fails inside its budget or the cost
    ///   curve is not representable (e.g. `b` vanishingly small)
    pub fn simulate_buy(
        &self,
        state: &MarketState,
        intent: &TradeIntent,
    ) -> Result<TradePreview, LmsrError> {
        state.validate()?;
        let TradeIntent { side, spend } = *intent;
        if !(spend.is_finite() && spend > 0.0) {
            return Err(LmsrError::InvalidSpend(spend));
        }

        let curve = CostCurve::new(state, side);
        let delta_shares = self.solve_shares(&curve, state.b, spend)?;

        let cost = curve.cost(delta_shares / state.b);
        if !(cost.is_finite() && (cost - spend).abs() <= COST_MATCH_TOLERANCE * spend) {
            return Err(LmsrError::NoConvergence {
                spend,
                iterations: self.max_iterations,
            });
        }

        let p_before = shifted_prices(state).of(side);
        let p_after = shifted_prices(&state.with_added(side, delta_shares)).of(side);

        Ok(TradePreview {
            delta_shares,
            cost,
            p_before,
            p_after,
        })
    }

    /// Safeguarded Newton iteration on `ln(cost(t)) - ln(spend)` over the
    /// scaled share count `t = delta / b`.
    ///
    /// Invariant: the root stays inside `[lo, hi]`. `cost(d) <= d` gives
    /// the lower end; `cost(d) >= d * p_side` and
    /// `cost(d) >= d + b * ln(p_side)` give the upper end.
    fn solve_shares(&self, curve: &CostCurve, b: f64, spend: f64) -> Result<f64, LmsrError> {
        let fail = |iterations| LmsrError::NoConvergence { spend, iterations };

        let s = spend / b;
        let p = curve.log_price.exp();
        let mut lo = s;
        let mut hi = (s - curve.log_price).min(s / p);
        if !(lo.is_finite() && hi.is_finite() && lo > 0.0) {
            return Err(fail(0));
        }
        let target = s.ln();

        let mut t = hi;
        for iteration in 1..=self.max_iterations {
            let h = curve.log_scaled_cost(t) - target;
            if !h.is_finite() {
                return Err(fail(iteration));
            }
            if h.abs() <= self.tolerance {
                return Ok(t * b);
            }
            if h > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            if hi - lo <= 4.0 * f64::EPSILON * hi {
                return Ok(t * b);
            }

            let next = t - h / curve.log_slope(t);
            t = if next > lo && next < hi {
                next
            } else {
                0.5 * (lo + hi)
            };
        }

        Err(fail(self.max_iterations))
    }
}

// ────────────────────────────────────────────
// Flat function API
// ────────────────────────────────────────────

/// `C(q_yes, q_no)` with the default engine.
///
/// # Errors
/// Rejects invalid `b` and non-finite quantities.
pub fn cost(q_yes: f64, q_no: f64, b: f64) -> Result<f64, LmsrError> {
    LmsrEngine::default().cost(&MarketState::new(q_yes, q_no, b)?)
}

/// `{p_yes, p_no}` with the default engine.
///
/// # Errors
/// Rejects invalid `b` and non-finite quantities.
pub fn price(q_yes: f64, q_no: f64, b: f64) -> Result<Prices, LmsrError> {
    LmsrEngine::default().price(&MarketState::new(q_yes, q_no, b)?)
}

/// Cost of buying exactly `delta` shares of `side`.
///
/// # Errors
/// Rejects invalid state and non-positive `delta`.
pub fn buy_cost(side: Side, q_yes: f64, q_no: f64, b: f64, delta: f64) -> Result<f64, LmsrError> {
    LmsrEngine::default().buy_cost(&MarketState::new(q_yes, q_no, b)?, side, delta)
}

/// Shares bought on `side` for `spend` tokens, with prices around the trade.
///
/// # Errors
/// See [`LmsrEngine::simulate_buy`].
pub fn simulate_buy(
    side: Side,
    q_yes: f64,
    q_no: f64,
    b: f64,
    spend: f64,
) -> Result<TradePreview, LmsrError> {
    let state = MarketState::new(q_yes, q_no, b)?;
    LmsrEngine::default().simulate_buy(&state, &TradeIntent { side, spend })
}

// ────────────────────────────────────────────
// Numerics
// ────────────────────────────────────────────

fn shifted_cost(state: &MarketState) -> f64 {
    let MarketState { q_yes, q_no, b } = *state;
    let m = q_yes.max(q_no);
    m + b * (((q_yes - m) / b).exp() + ((q_no - m) / b).exp()).ln()
}

fn shifted_prices(state: &MarketState) -> Prices {
    let MarketState { q_yes, q_no, b } = *state;
    let m = q_yes.max(q_no);
    let e_yes = ((q_yes - m) / b).exp();
    let e_no = ((q_no - m) / b).exp();
    let sum = e_yes + e_no;

    if e_yes <= e_no {
        let yes = (e_yes / sum).max(PRICE_FLOOR);
        Prices { yes, no: 1.0 - yes }
    } else {
        let no = (e_no / sum).max(PRICE_FLOOR);
        Prices { yes: 1.0 - no, no }
    }
}

/// `ln(1 + e^x)` without overflow.
fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// `ln(softplus(x))`, exact to f64 precision even where softplus underflows.
fn ln_softplus(x: f64) -> f64 {
    if x < -36.0 { x } else { softplus(x).ln() }
}

/// `sigmoid(x) / softplus(x)`.
fn sigmoid_over_softplus(x: f64) -> f64 {
    if x < -36.0 {
        1.0
    } else {
        let sigmoid = 1.0 / (1.0 + (-x).exp());
        sigmoid / softplus(x)
    }
}

/// `ln(e^t - 1)` for `t > 0`.
fn ln_expm1(t: f64) -> f64 {
    if t > 1.0 {
        t + (-(-t).exp()).ln_1p()
    } else {
        t.exp_m1().ln()
    }
}

/// The buy-cost curve of one side at a fixed state, over `t = delta / b`.
///
/// `cost(t) = b * softplus(log_price + ln(e^t - 1))`.
struct CostCurve {
    b: f64,
    log_price: f64,
}

impl CostCurve {
    fn new(state: &MarketState, side: Side) -> Self {
        let gap = (state.quantity(side) - state.quantity(side.opposite())) / state.b;
        Self {
            b: state.b,
            log_price: -softplus(-gap),
        }
    }

    fn cost(&self, t: f64) -> f64 {
        self.b * softplus(self.log_price + ln_expm1(t))
    }

    /// `ln(cost(t) / b)`.
    fn log_scaled_cost(&self, t: f64) -> f64 {
        ln_softplus(self.log_price + ln_expm1(t))
    }

    /// Derivative of [`CostCurve::log_scaled_cost`] with respect to `t`.
    fn log_slope(&self, t: f64) -> f64 {
        let x = self.log_price + ln_expm1(t);
        sigmoid_over_softplus(x) / -(-t).exp_m1()
    }
}
