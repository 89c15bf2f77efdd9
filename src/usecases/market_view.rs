//! Market View - Display Model for a Market Page
//!
//! Fetches a market's metadata, snapshot and recent ledger from the
//! Oracle and turns them into display-ready strings: the market card,
//! the trade history rows and the price chart series. Also renders the
//! summary a visitor sees of their own bet.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::AppConfig;
use crate::domain::chart::{ChartPoint, price_series};
use crate::domain::format::{NumberFormat, format_count, format_time_ago};
use crate::domain::market::{Market, MarketSnapshot};
use crate::domain::trade::{MarketId, Side, TradeId, TradeRecord};
use crate::ports::oracle::MarketOracle;

/// Headline numbers of a market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketCard {
  pub question: String,
  pub yes_price: String,
  pub no_price: String,
  pub yes_shares: String,
  pub no_shares: String,
  pub total_trades: String,
  pub liquidity: String,
  /// Width of the YES bar in percent.
  pub yes_bar_pct: f64,
}

/// Which way a trade moved the YES probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceDirection {
  Up,
  Down,
}

/// One line of the trade history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
  pub id: TradeId,
  pub side: Side,
  pub shares: String,
  pub spent: String,
  pub direction: PriceDirection,
  /// Absolute YES move, as a probability string.
  pub change: String,
  /// YES probability after the trade.
  pub price_after: String,
  pub time_ago: String,
}

/// Market metadata shown above the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketDetails {
  pub category: String,
  pub source_url: String,
  /// Betting close, `"%Y-%m-%d %H:%M"` UTC.
  pub closes_at: String,
  pub accepting_bets: bool,
}

/// The visitor's own bet, shown in place of the trade panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnTradeSummary {
  pub side: Side,
  pub spent: String,
  pub shares: String,
  /// YES probability before the trade.
  pub entry_price: String,
  /// Signed YES move caused by the trade.
  pub price_impact: String,
  pub date: String,
  pub time: String,
  pub payout_label: String,
  /// Tokens paid out if the chosen side wins (one per share).
  pub payout: String,
}

/// Everything a market page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketView {
  pub details: MarketDetails,
  pub card: MarketCard,
  pub history: Vec<HistoryRow>,
  pub chart: Vec<ChartPoint>,
}

/// Build the card from a snapshot.
pub fn market_card(snapshot: &MarketSnapshot, fmt: NumberFormat) -> MarketCard {
  MarketCard {
    question: snapshot.question.clone(),
    yes_price: fmt.probability(snapshot.price_yes),
    no_price: fmt.probability(snapshot.price_no),
    yes_shares: fmt.number(snapshot.q_yes),
    no_shares: fmt.number(snapshot.q_no),
    total_trades: format_count(snapshot.total_trades),
    liquidity: fmt.number(snapshot.b),
    yes_bar_pct: (snapshot.price_yes * 100.0).clamp(0.0, 100.0),
  }
}

pub fn market_details(market: &Market, now: DateTime<Utc>) -> MarketDetails {
  MarketDetails {
    category: market.category.clone(),
    source_url: market.source_url.clone(),
    closes_at: market.betting_closes_at.format("%Y-%m-%d %H:%M").to_string(),
    accepting_bets: market.accepts_bets_at(now),
  }
}

/// Summarise a visitor's trade: `"6.2 tokens"` spent, `"+23.1%"` impact,
/// `"If YES wins"` pays `"10.0 tokens"`.
pub fn own_trade_summary(trade: &TradeRecord, fmt: NumberFormat) -> OwnTradeSummary {
  let change = trade.price_change();
  let impact = fmt.probability(change);
  OwnTradeSummary {
    side: trade.side,
    spent: format!("{} tokens", fmt.number(trade.amount_spent)),
    shares: fmt.number(trade.shares_got),
    entry_price: fmt.probability(trade.price_before),
    price_impact: if change > 0.0 { format!("+{impact}") } else { impact },
    date: trade.created_at.format("%Y-%m-%d").to_string(),
    time: trade.created_at.format("%H:%M").to_string(),
    payout_label: format!("If {} wins", trade.side),
    payout: format!("{} tokens", fmt.number(trade.shares_got)),
  }
}

/// Build history rows from a newest-first ledger.
pub fn history_rows(
  trades: &[TradeRecord],
  fmt: NumberFormat,
  now: DateTime<Utc>,
) -> Vec<HistoryRow> {
  trades
    .iter()
    .map(|trade| {
      let change = trade.price_change();
      HistoryRow {
        id: trade.id.clone(),
        side: trade.side,
        shares: fmt.number(trade.shares_got),
        spent: fmt.number(trade.amount_spent),
        direction: if change > 0.0 {
          PriceDirection::Up
        } else {
          PriceDirection::Down
        },
        change: fmt.probability(change.abs()),
        price_after: fmt.probability(trade.price_after),
        time_ago: format_time_ago(trade.created_at, now),
      }
    })
    .collect()
}

/// Loads market pages through the Oracle port.
pub struct MarketViewer<O: MarketOracle> {
  oracle: Arc<O>,
  fmt: NumberFormat,
  history_limit: usize,
}

impl<O: MarketOracle> MarketViewer<O> {
  pub fn new(oracle: Arc<O>, config: &AppConfig) -> Self {
    Self {
      oracle,
      fmt: config.display.number_format(),
      history_limit: config.trade.history_limit,
    }
  }

  /// Fetch and render a market page as of `now`.
  #[instrument(skip(self))]
  pub async fn load(&self, market_id: &MarketId, now: DateTime<Utc>) -> Result<MarketView> {
    let (market, snapshot, trades) = tokio::try_join!(
      self.oracle.get_market(market_id),
      self.oracle.snapshot(market_id),
      self.oracle.recent_trades(market_id, self.history_limit),
    )
    .with_context(|| format!("Failed to load market {market_id}"))?;

    debug!(trades = trades.len(), "Market view loaded");

    Ok(MarketView {
      details: market_details(&market.market, now),
      card: market_card(&snapshot, self.fmt),
      history: history_rows(&trades, self.fmt, now),
      chart: price_series(&trades, snapshot.price_yes),
    })
  }
}
