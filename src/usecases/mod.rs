//! Use Cases Layer - Application Workflows
//!
//! Orchestrates domain logic with the Oracle port to implement the
//! client's workflows. Each use case is a self-contained operation.
//!
//! Use cases:
//! - `PreviewSlot`: last-write-wins publication of trade previews
//! - `TradePanel`: preview, gate and submit a visitor's trade
//! - `MarketViewer`: market card, trade history and price chart
//! - `MarketList`: paged market directory

pub mod market_list;
pub mod market_view;
pub mod preview_slot;
pub mod trade_panel;
