//! Core domain types and logic.

pub mod numeric;
pub mod asset;
pub mod rate;
pub mod trade;
pub mod trade_pair;
pub mod record;
pub mod report;
pub mod summary;
pub mod ledger;
pub mod wallet;
pub mod execution;
pub mod config;
pub mod error;
