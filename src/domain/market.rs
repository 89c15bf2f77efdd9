//! Market listing and snapshot types exchanged with the Oracle.
//!
//! JSON field names follow the Oracle's camelCase convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::LmsrError;
use super::trade::{MarketId, MarketState};

/// Market metadata as listed by the Oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: MarketId,
    pub question: String,
    pub description: Option<String>,
    pub category: String,
    pub source_url: String,
    pub betting_closes_at: DateTime<Utc>,
    pub resolves_at: DateTime<Utc>,
    /// Lifecycle status string owned by the Oracle (e.g. "open", "resolved").
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Market {
    /// Whether the Oracle reports the market as open.
    pub fn is_open(&self) -> bool {
        self.status.eq_ignore_ascii_case("open")
    }

    /// Whether bets are still accepted at `now`.
    pub fn accepts_bets_at(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && now < self.betting_closes_at
    }
}

/// Filters for a market listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// One page of markets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketsResponse {
    pub markets: Vec<Market>,
    pub total: u64,
    pub has_more: bool,
}

/// A single market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketResponse {
    pub market: Market,
}

/// Live pricing state of a market as reported by the Oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub market_id: MarketId,
    pub question: String,
    pub q_yes: f64,
    pub q_no: f64,
    pub b: f64,
    pub price_yes: f64,
    pub price_no: f64,
    pub total_trades: u64,
}

impl MarketSnapshot {
    /// The engine input for this snapshot.
    ///
    /// # Errors
    /// Rejects snapshots with invalid liquidity or non-finite quantities.
    pub fn state(&self) -> Result<MarketState, LmsrError> {
        MarketState::new(self.q_yes, self.q_no, self.b)
    }
}
