//! Preview Slot - Last-Write-Wins Holder for Trade Previews
//!
//! Hosts may compute previews off the input thread (e.g. one per
//! keystroke in the spend field). Results can then arrive out of order.
//! Each computation takes a ticket when it is issued; a result is only
//! applied if its ticket is newer than the last one applied, so a slow
//! stale computation can never overwrite a fresher preview.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::domain::error::LmsrError;
use crate::domain::lmsr::LmsrEngine;
use crate::domain::trade::{MarketState, TradeIntent, TradePreview};

/// Issuance order of a preview computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PreviewTicket(u64);

impl PreviewTicket {
  pub const fn sequence(self) -> u64 {
    self.0
  }
}

/// What subscribers observe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreviewState {
  /// Sequence of the applied computation (0 before the first one).
  pub sequence: u64,
  /// `None` when the latest input produced no preview.
  pub preview: Option<TradePreview>,
}

/// Shared slot holding the freshest preview.
#[derive(Debug)]
pub struct PreviewSlot {
  issued: AtomicU64,
  state_tx: watch::Sender<PreviewState>,
}

impl Default for PreviewSlot {
  fn default() -> Self {
    Self::new()
  }
}

impl PreviewSlot {
  pub fn new() -> Self {
    let (state_tx, _) = watch::channel(PreviewState::default());
    Self {
      issued: AtomicU64::new(0),
      state_tx,
    }
  }

  /// Take a ticket for a computation about to start.
  pub fn issue(&self) -> PreviewTicket {
    PreviewTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
  }

  /// Whether `ticket` is the most recently issued one.
  pub fn is_current(&self, ticket: PreviewTicket) -> bool {
    self.issued.load(Ordering::SeqCst) == ticket.0
  }

  /// Apply a finished computation. Returns `false` (and drops the
  /// result) when a newer ticket has already been applied.
  pub fn publish(&self, ticket: PreviewTicket, preview: Option<TradePreview>) -> bool {
    let applied = self.state_tx.send_if_modified(|state| {
      if ticket.0 > state.sequence {
        state.sequence = ticket.0;
        state.preview = preview;
        true
      } else {
        false
      }
    });

    if !applied {
      debug!(
        ticket = ticket.0,
        applied = self.state_tx.borrow().sequence,
        "Discarding stale preview"
      );
    }
    applied
  }

  /// Compute and publish in one step.
  ///
  /// An engine error publishes "no preview" and is returned to the caller.
  pub fn recompute(
    &self,
    engine: &LmsrEngine,
    state: &MarketState,
    intent: Option<&TradeIntent>,
  ) -> Result<Option<TradePreview>, LmsrError> {
    let ticket = self.issue();
    let result = intent
      .map(|intent| engine.simulate_buy(state, intent))
      .transpose();
    self.publish(ticket, result.as_ref().ok().copied().flatten());
    result
  }

  /// Clear the preview (e.g. the market changed and inputs are stale).
  pub fn clear(&self) {
    let ticket = self.issue();
    self.publish(ticket, None);
  }

  /// The freshest applied preview.
  pub fn latest(&self) -> Option<TradePreview> {
    self.state_tx.borrow().preview
  }

  /// Observe every applied preview.
  pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
    self.state_tx.subscribe()
  }
}
