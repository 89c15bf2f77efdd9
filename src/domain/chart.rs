//! Price-history series for the YES probability line.
//!
//! Only the data is built here; drawing belongs to the host.

use serde::{Deserialize, Serialize};

use super::trade::{Side, TradeRecord};

/// Label of the trailing point carrying the current price.
pub const NOW_LABEL: &str = "Now";

/// One point of the YES-probability line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub index: usize,
    /// YES probability in percent (0..=100).
    pub price_pct: f64,
    /// `HH:MM` (UTC) of the trade, or [`NOW_LABEL`].
    pub label: String,
    /// Side of the trade that produced the point; `None` for "Now".
    pub side: Option<Side>,
}

/// Builds the series from a newest-first ledger and the current YES price.
///
/// Points run oldest to newest, followed by a "Now" point. With no trades
/// the series is empty so the host can show a placeholder.
pub fn price_series(trades_newest_first: &[TradeRecord], current_p_yes: f64) -> Vec<ChartPoint> {
    if trades_newest_first.is_empty() {
        return Vec::new();
    }

    let mut points: Vec<ChartPoint> = trades_newest_first
        .iter()
        .rev()
        .enumerate()
        .map(|(index, trade)| ChartPoint {
            index,
            price_pct: trade.price_after * 100.0,
            label: trade.created_at.format("%H:%M").to_string(),
            side: Some(trade.side),
        })
        .collect();

    points.push(ChartPoint {
        index: points.len(),
        price_pct: current_p_yes * 100.0,
        label: NOW_LABEL.to_string(),
        side: None,
    });
    points
}
