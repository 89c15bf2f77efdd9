//! Oracle Port - Market State and Trade Ledger Interface
//!
//! The Oracle service owns share quantities, the trade ledger and market
//! resolution. This crate only reads snapshots from it and submits trade
//! intents; whatever the Oracle answers after a submission is
//! authoritative, and may differ from the local preview by rounding or
//! by trades that landed in between.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::market::{MarketResponse, MarketSnapshot, MarketsParams, MarketsResponse};
use crate::domain::trade::{MarketId, Side, TradeRecord, VisitorId};

/// A trade intent as sent to the Oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSubmission {
  /// Client-generated id; lets the Oracle drop duplicate submissions.
  pub request_id: Uuid,
  pub market_id: MarketId,
  pub visitor_id: VisitorId,
  pub side: Side,
  /// Tokens the visitor commits.
  pub amount: f64,
}

/// The Oracle's answer to an accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReceipt {
  /// Ledger entry written for the trade.
  pub trade: TradeRecord,
  /// Market state after the trade.
  pub snapshot: MarketSnapshot,
}

/// Trait for Oracle clients.
///
/// Implementors talk to the Oracle over whatever transport the host
/// uses. Every method may fail on transport or server errors; callers
/// treat failures as recoverable.
#[async_trait]
pub trait MarketOracle: Send + Sync + 'static {
  /// List markets matching the given filters.
  async fn list_markets(&self, params: &MarketsParams) -> anyhow::Result<MarketsResponse>;

  /// Fetch market metadata.
  async fn get_market(&self, market_id: &MarketId) -> anyhow::Result<MarketResponse>;

  /// Fetch the current pricing state of a market.
  async fn snapshot(&self, market_id: &MarketId) -> anyhow::Result<MarketSnapshot>;

  /// Most recent trades of a market, newest first.
  async fn recent_trades(
    &self,
    market_id: &MarketId,
    limit: usize,
  ) -> anyhow::Result<Vec<TradeRecord>>;

  /// The visitor's trade in this market, if they already placed one.
  async fn visitor_trade(
    &self,
    market_id: &MarketId,
    visitor_id: &VisitorId,
  ) -> anyhow::Result<Option<TradeRecord>>;

  /// Submit a buy.
  ///
  /// # Errors
  /// Returns error if the Oracle rejects the trade or is unreachable.
  async fn submit_trade(&self, submission: &TradeSubmission) -> anyhow::Result<TradeReceipt>;
}
