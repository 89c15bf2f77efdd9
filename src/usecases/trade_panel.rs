//! Trade Panel - Preview and Submission Workflow
//!
//! Drives the "place your bet" flow for one visitor on one market:
//! - Loading the market snapshot and the visitor's existing trade
//! - Recomputing the advisory preview whenever side or amount changes
//! - Gating submission (one bet per visitor, spend range, valid preview)
//! - Submitting to the Oracle and adopting its answer as authoritative
//!
//! The host calls the setters on every input change; there is no
//! observation machinery beyond the preview slot's watch channel.

use std::sync::Arc;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{AppConfig, TradeConfig};
use crate::domain::format::NumberFormat;
use crate::domain::lmsr::LmsrEngine;
use crate::domain::market::MarketSnapshot;
use crate::domain::trade::{MarketId, Side, TradeIntent, TradePreview, TradeRecord, VisitorId};
use crate::ports::oracle::{MarketOracle, TradeReceipt, TradeSubmission};
use crate::usecases::market_view::{OwnTradeSummary, own_trade_summary};
use crate::usecases::preview_slot::PreviewSlot;

/// Why the panel refuses to submit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitBlock {
  #[error("market snapshot not loaded")]
  NotLoaded,

  #[error("visitor already traded in this market")]
  AlreadyTraded,

  #[error("no preview available for the current input")]
  NoPreview,

  #[error("spend {spend} outside the allowed range [{min}, {max}]")]
  SpendOutOfRange { spend: f64, min: f64, max: f64 },
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOutcome {
  /// The Oracle's authoritative answer.
  pub receipt: TradeReceipt,
  /// The advisory preview shown when the trade was submitted.
  pub preview: TradePreview,
  /// `(shares_got - previewed) / previewed`.
  pub share_drift: f64,
}

impl TradeOutcome {
  /// Whether the fill diverged from the preview by more than `threshold`.
  pub fn diverged(&self, threshold: f64) -> bool {
    self.share_drift.abs() > threshold
  }
}

/// Trade panel state for one visitor and one market.
pub struct TradePanel<O: MarketOracle> {
  /// Oracle port.
  oracle: Arc<O>,
  /// Pricing engine for previews.
  engine: LmsrEngine,
  /// Spend range, presets and drift threshold.
  rules: TradeConfig,
  fmt: NumberFormat,
  market_id: MarketId,
  visitor_id: VisitorId,
  /// Latest authoritative market state.
  snapshot: Option<MarketSnapshot>,
  /// The visitor's trade in this market, once known.
  own_trade: Option<TradeRecord>,
  side: Side,
  /// Raw content of the spend field.
  amount: String,
  slot: Arc<PreviewSlot>,
}

impl<O: MarketOracle> TradePanel<O> {
  /// Create a panel; call [`TradePanel::load`] before use.
  pub fn new(
    oracle: Arc<O>,
    market_id: impl Into<MarketId>,
    visitor_id: impl Into<VisitorId>,
    config: &AppConfig,
  ) -> Self {
    Self {
      oracle,
      engine: config.engine.engine(),
      rules: config.trade.clone(),
      fmt: config.display.number_format(),
      market_id: market_id.into(),
      visitor_id: visitor_id.into(),
      snapshot: None,
      own_trade: None,
      side: Side::Yes,
      amount: config.trade.default_amount.clone(),
      slot: Arc::new(PreviewSlot::new()),
    }
  }

  /// Fetch the snapshot and the visitor's existing trade, then refresh
  /// the preview.
  #[instrument(skip(self), fields(market = %self.market_id))]
  pub async fn load(&mut self) -> Result<()> {
    let (snapshot, own_trade) = tokio::try_join!(
      self.oracle.snapshot(&self.market_id),
      self.oracle.visitor_trade(&self.market_id, &self.visitor_id),
    )
    .context("Failed to load market for trade panel")?;

    info!(
      q_yes = snapshot.q_yes,
      q_no = snapshot.q_no,
      b = snapshot.b,
      already_traded = own_trade.is_some(),
      "Trade panel loaded"
    );

    self.snapshot = Some(snapshot);
    self.own_trade = own_trade;
    self.recompute_preview();
    Ok(())
  }

  /// Replace the snapshot (e.g. after a periodic refresh by the host).
  pub fn update_snapshot(&mut self, snapshot: MarketSnapshot) -> Option<TradePreview> {
    self.snapshot = Some(snapshot);
    self.recompute_preview()
  }

  pub fn set_side(&mut self, side: Side) -> Option<TradePreview> {
    self.side = side;
    self.recompute_preview()
  }

  pub fn set_amount(&mut self, amount: impl Into<String>) -> Option<TradePreview> {
    self.amount = amount.into();
    self.recompute_preview()
  }

  /// Set the amount to the preset at `index`. Returns `false` for an
  /// unknown preset.
  pub fn apply_preset(&mut self, index: usize) -> bool {
    let Some(preset) = self.rules.presets.get(index).copied() else {
      return false;
    };
    self.set_amount(preset.to_string());
    true
  }

  /// Recompute the preview for the current inputs and publish it.
  ///
  /// Returns `None` whenever no trade can be previewed: no snapshot yet,
  /// an unparsable or non-positive amount, or an engine error.
  pub fn recompute_preview(&self) -> Option<TradePreview> {
    let Some(snapshot) = &self.snapshot else {
      self.slot.clear();
      return None;
    };

    let state = match snapshot.state() {
      Ok(state) => state,
      Err(e) => {
        warn!(error = %e, market = %self.market_id, "Snapshot unusable for pricing");
        self.slot.clear();
        return None;
      }
    };

    let intent = TradeIntent::parse(self.side, &self.amount);
    match self.slot.recompute(&self.engine, &state, intent.as_ref()) {
      Ok(preview) => preview,
      Err(e) => {
        debug!(error = %e, amount = %self.amount, "No preview for input");
        None
      }
    }
  }

  /// The freshest published preview.
  pub fn preview(&self) -> Option<TradePreview> {
    self.slot.latest()
  }

  /// Shared handle for hosts that watch previews.
  pub fn preview_slot(&self) -> Arc<PreviewSlot> {
    Arc::clone(&self.slot)
  }

  pub const fn side(&self) -> Side {
    self.side
  }

  pub fn amount(&self) -> &str {
    &self.amount
  }

  pub fn presets(&self) -> &[f64] {
    &self.rules.presets
  }

  pub const fn snapshot(&self) -> Option<&MarketSnapshot> {
    self.snapshot.as_ref()
  }

  pub const fn own_trade(&self) -> Option<&TradeRecord> {
    self.own_trade.as_ref()
  }

  /// What to show instead of the panel once the visitor has traded.
  pub fn own_trade_summary(&self) -> Option<OwnTradeSummary> {
    self
      .own_trade
      .as_ref()
      .map(|trade| own_trade_summary(trade, self.fmt))
  }

  /// Why submission is currently refused, if it is.
  pub fn blocked_reason(&self) -> Option<SubmitBlock> {
    if self.snapshot.is_none() {
      return Some(SubmitBlock::NotLoaded);
    }
    if self.own_trade.is_some() {
      return Some(SubmitBlock::AlreadyTraded);
    }
    let intent = TradeIntent::parse(self.side, &self.amount);
    let preview = self.preview().filter(|p| p.delta_shares > 0.0);
    let (Some(intent), Some(_)) = (intent, preview) else {
      return Some(SubmitBlock::NoPreview);
    };

    let spend = intent.spend;
    if spend < self.rules.min_spend || spend > self.rules.max_spend {
      return Some(SubmitBlock::SpendOutOfRange {
        spend,
        min: self.rules.min_spend,
        max: self.rules.max_spend,
      });
    }
    None
  }

  pub fn can_submit(&self) -> bool {
    self.blocked_reason().is_none()
  }

  /// Submit the current intent.
  ///
  /// On success the Oracle's snapshot and trade replace local state and
  /// the preview is cleared (the visitor cannot bet again).
  ///
  /// # Errors
  /// Fails with a [`SubmitBlock`] when submission is refused, or with the
  /// Oracle's error; local state is unchanged in both cases.
  #[instrument(skip(self), fields(market = %self.market_id, side = %self.side))]
  pub async fn submit(&mut self) -> Result<TradeOutcome> {
    if let Some(block) = self.blocked_reason() {
      return Err(block.into());
    }
    let intent = TradeIntent::parse(self.side, &self.amount).ok_or(SubmitBlock::NoPreview)?;
    let preview = self.preview().ok_or(SubmitBlock::NoPreview)?;

    let submission = TradeSubmission {
      request_id: Uuid::new_v4(),
      market_id: self.market_id.clone(),
      visitor_id: self.visitor_id.clone(),
      side: intent.side,
      amount: intent.spend,
    };

    let receipt = self
      .oracle
      .submit_trade(&submission)
      .await
      .with_context(|| format!("Oracle rejected trade {}", submission.request_id))?;

    let share_drift = (receipt.trade.shares_got - preview.delta_shares) / preview.delta_shares;
    let outcome = TradeOutcome {
      receipt,
      preview,
      share_drift,
    };

    if outcome.diverged(self.rules.drift_warn_fraction) {
      warn!(
        previewed = preview.delta_shares,
        filled = outcome.receipt.trade.shares_got,
        drift = share_drift,
        "Fill diverged from preview"
      );
    }
    info!(
      trade_id = %outcome.receipt.trade.id,
      shares = outcome.receipt.trade.shares_got,
      spent = outcome.receipt.trade.amount_spent,
      "Trade accepted"
    );

    self.snapshot = Some(outcome.receipt.snapshot.clone());
    self.own_trade = Some(outcome.receipt.trade.clone());
    self.slot.clear();

    Ok(outcome)
  }
}
