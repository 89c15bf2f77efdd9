//! Core trading domain types.
//!
//! Defines the market state snapshot the engine prices against, the
//! user's trade intent, the derived preview, and the Oracle's ledger
//! entries.
//!
//! Two price conventions coexist:
//! - `TradePreview` prices refer to the traded side
//! - `TradeRecord` prices are YES probabilities, as the Oracle reports them

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::LmsrError;

// ────────────────────────────────────────────
// Type aliases consumed by ports and usecases
// ────────────────────────────────────────────

/// Oracle-assigned market identifier.
pub type MarketId = String;

/// Oracle-assigned trade identifier.
pub type TradeId = String;

/// Persisted visitor identity (owned by the host application).
pub type VisitorId = String;

// ────────────────────────────────────────────
// Side
// ────────────────────────────────────────────

/// Outcome being bought in a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// The other outcome.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    /// Converts a price of this side into the YES probability.
    pub fn yes_probability(self, side_price: f64) -> f64 {
        match self {
            Self::Yes => side_price,
            Self::No => 1.0 - side_price,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            _ => Err(format!("invalid side '{s}', expected 'yes' or 'no'")),
        }
    }
}

// ────────────────────────────────────────────
// Market state snapshot
// ────────────────────────────────────────────

/// Share quantities and liquidity of a binary LMSR market.
///
/// `q_yes`/`q_no` are cumulative net shares issued per outcome; `b` is
/// fixed for the market's lifetime. The engine never mutates a state; a
/// trade yields a new one via [`MarketState::with_added`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    pub q_yes: f64,
    pub q_no: f64,
    pub b: f64,
}

impl MarketState {
    /// Builds a validated state.
    ///
    /// # Errors
    /// `InvalidLiquidity` unless `b` is positive and finite,
    /// `NonFiniteQuantity` if either quantity is NaN or infinite.
    pub fn new(q_yes: f64, q_no: f64, b: f64) -> Result<Self, LmsrError> {
        let state = Self { q_yes, q_no, b };
        state.validate()?;
        Ok(state)
    }

    /// A fresh market with no shares issued.
    ///
    /// # Errors
    /// `InvalidLiquidity` unless `b` is positive and finite.
    pub fn empty(b: f64) -> Result<Self, LmsrError> {
        Self::new(0.0, 0.0, b)
    }

    /// Re-checks the invariants; states may also be built literally or
    /// deserialized.
    ///
    /// # Errors
    /// Same as [`MarketState::new`].
    pub fn validate(&self) -> Result<(), LmsrError> {
        if !(self.b.is_finite() && self.b > 0.0) {
            return Err(LmsrError::InvalidLiquidity(self.b));
        }
        for q in [self.q_yes, self.q_no] {
            if !q.is_finite() {
                return Err(LmsrError::NonFiniteQuantity(q));
            }
        }
        Ok(())
    }

    /// Shares issued for `side`.
    pub const fn quantity(&self, side: Side) -> f64 {
        match side {
            Side::Yes => self.q_yes,
            Side::No => self.q_no,
        }
    }

    /// The state after `delta` shares of `side` are issued.
    pub fn with_added(&self, side: Side, delta: f64) -> Self {
        let mut next = *self;
        match side {
            Side::Yes => next.q_yes += delta,
            Side::No => next.q_no += delta,
        }
        next
    }
}

// ────────────────────────────────────────────
// Trade intent and preview
// ────────────────────────────────────────────

/// A user's local, unsubmitted intention to spend tokens on one side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub side: Side,
    pub spend: f64,
}

impl TradeIntent {
    /// # Errors
    /// `InvalidSpend` unless `spend` is positive and finite.
    pub fn new(side: Side, spend: f64) -> Result<Self, LmsrError> {
        if !(spend.is_finite() && spend > 0.0) {
            return Err(LmsrError::InvalidSpend(spend));
        }
        Ok(Self { side, spend })
    }

    /// Parses the raw text of a spend field. Empty, unparsable,
    /// non-positive and non-finite text yields no intent.
    pub fn parse(side: Side, amount: &str) -> Option<Self> {
        let spend = amount.trim().parse::<f64>().ok()?;
        Self::new(side, spend).ok()
    }
}

/// Advisory outcome of buying with a given spend.
///
/// Fully determined by `(MarketState, TradeIntent)`; discard it whenever
/// either input changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePreview {
    /// Shares of the traded side received.
    pub delta_shares: f64,
    /// Tokens charged, recomputed from `delta_shares`.
    pub cost: f64,
    /// Traded-side price before the trade.
    pub p_before: f64,
    /// Traded-side price after the trade.
    pub p_after: f64,
}

impl TradePreview {
    /// Absolute move of the traded side's price.
    pub fn price_change(&self) -> f64 {
        self.p_after - self.p_before
    }

    /// Relative move of the traded side's price, in percent.
    pub fn price_change_pct(&self) -> f64 {
        (self.p_after - self.p_before) / self.p_before * 100.0
    }

    /// Average tokens paid per share.
    pub fn average_price(&self) -> f64 {
        self.cost / self.delta_shares
    }
}

// ────────────────────────────────────────────
// Ledger entry (Oracle-owned)
// ────────────────────────────────────────────

/// A trade as recorded by the Oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub id: TradeId,
    pub visitor_id: VisitorId,
    pub side: Side,
    pub amount_spent: f64,
    pub shares_got: f64,
    /// YES probability before the trade.
    pub price_before: f64,
    /// YES probability after the trade.
    pub price_after: f64,
    pub created_at: DateTime<Utc>,
}

impl TradeRecord {
    /// Move of the YES probability caused by this trade.
    pub fn price_change(&self) -> f64 {
        self.price_after - self.price_before
    }
}
