//! Fundledger - reporting console over a buy/sell investment ledger
//!
//! This library provides the ledger store, the report aggregation engine
//! (signed-value normalization, grouping, anomaly flagging) and the
//! formatting helpers shared by the CLI and the interactive session.

pub mod config;
pub mod db;
pub mod error;
pub mod importers;
pub mod reports;
pub mod utils;
