//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer requires
//! from the outside world. Hosts provide the implementations.
//!
//! Port categories:
//! - `MarketOracle`: market snapshots, trade ledger and trade submission

pub mod oracle;
