//! Domain layer - Core pricing logic and models.
//!
//! Pure computation over explicit inputs: no I/O, no shared mutable
//! state (hexagonal architecture inner ring). Everything here is safe to
//! call from any thread and testable in isolation.

pub mod chart;
pub mod error;
pub mod format;
pub mod lmsr;
pub mod market;
pub mod trade;

// Re-export core types for convenience
pub use chart::{ChartPoint, price_series};
pub use error::LmsrError;
pub use format::{
    NumberFormat, format_count, format_number, format_probability, format_signed_percent,
    format_time_ago,
};
pub use lmsr::{LmsrEngine, Prices, buy_cost, cost, price, simulate_buy};
pub use market::{Market, MarketResponse, MarketSnapshot, MarketsParams, MarketsResponse};
pub use trade::{
    MarketId, MarketState, Side, TradeId, TradeIntent, TradePreview, TradeRecord, VisitorId,
};
