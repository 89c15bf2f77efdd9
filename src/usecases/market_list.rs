//! Market List - Paged Market Directory
//!
//! Pages through the Oracle's market listing and renders the directory:
//! a "{total} Market(s)" header, one entry per market, and whether a
//! further page can be loaded.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::AppConfig;
use crate::domain::format::format_count;
use crate::domain::market::{Market, MarketsParams, MarketsResponse};
use crate::domain::trade::MarketId;
use crate::ports::oracle::MarketOracle;

/// One market in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketListEntry {
  pub id: MarketId,
  pub question: String,
  pub category: String,
  /// Betting close, `"%Y-%m-%d %H:%M"` UTC.
  pub closes_at: String,
  pub accepting_bets: bool,
}

/// The rendered directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketListPage {
  pub header: String,
  pub entries: Vec<MarketListEntry>,
  pub has_more: bool,
}

impl MarketListPage {
  /// True when the Oracle has no markets yet.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// `"1 Market"`, `"0 Markets"`, `"1,204 Markets"`.
pub fn markets_header(total: u64) -> String {
  let noun = if total == 1 { "Market" } else { "Markets" };
  format!("{} {noun}", format_count(total))
}

pub fn list_entry(market: &Market, now: DateTime<Utc>) -> MarketListEntry {
  MarketListEntry {
    id: market.id.clone(),
    question: market.question.clone(),
    category: market.category.clone(),
    closes_at: market.betting_closes_at.format("%Y-%m-%d %H:%M").to_string(),
    accepting_bets: market.accepts_bets_at(now),
  }
}

/// Market directory state, accumulated page by page.
pub struct MarketList<O: MarketOracle> {
  oracle: Arc<O>,
  /// Status and category filters; paging fields are set per request.
  filter: MarketsParams,
  page_size: u32,
  markets: Vec<Market>,
  total: u64,
  has_more: bool,
}

impl<O: MarketOracle> MarketList<O> {
  pub fn new(oracle: Arc<O>, filter: MarketsParams, config: &AppConfig) -> Self {
    Self {
      oracle,
      filter,
      page_size: config.display.page_size,
      markets: Vec::new(),
      total: 0,
      has_more: false,
    }
  }

  /// Fetch the first page, replacing whatever was loaded.
  ///
  /// On failure the previous listing is kept.
  #[instrument(skip(self))]
  pub async fn refresh(&mut self) -> Result<()> {
    let response = self.fetch(0).await?;
    self.total = response.total;
    self.has_more = response.has_more;
    self.markets = response.markets;
    Ok(())
  }

  /// Append the next page. Returns `false` without asking the Oracle when
  /// the last page is already loaded.
  #[instrument(skip(self), fields(loaded = self.markets.len()))]
  pub async fn load_more(&mut self) -> Result<bool> {
    if !self.has_more {
      return Ok(false);
    }
    let offset = u32::try_from(self.markets.len()).context("Market list offset exceeds u32")?;
    let response = self.fetch(offset).await?;
    self.total = response.total;
    self.has_more = response.has_more;
    self.markets.extend(response.markets);
    Ok(true)
  }

  async fn fetch(&self, offset: u32) -> Result<MarketsResponse> {
    let params = MarketsParams {
      limit: Some(self.page_size),
      offset: Some(offset),
      ..self.filter.clone()
    };
    let response = self
      .oracle
      .list_markets(&params)
      .await
      .with_context(|| format!("Failed to list markets at offset {offset}"))?;

    debug!(
      offset,
      received = response.markets.len(),
      total = response.total,
      has_more = response.has_more,
      "Market page loaded"
    );
    Ok(response)
  }

  pub fn markets(&self) -> &[Market] {
    &self.markets
  }

  pub const fn has_more(&self) -> bool {
    self.has_more
  }

  /// Render everything loaded so far as of `now`.
  pub fn page(&self, now: DateTime<Utc>) -> MarketListPage {
    MarketListPage {
      header: markets_header(self.total),
      entries: self.markets.iter().map(|m| list_entry(m, now)).collect(),
      has_more: self.has_more,
    }
  }
}
