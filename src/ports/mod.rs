//! Port traits: the seams between the ledger and the outside world.

pub mod clock_port;
pub mod config_port;
pub mod pair_store_port;
pub mod rate_port;
pub mod trade_store_port;
