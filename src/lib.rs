//! fxledger: exact-arithmetic FX trade ledger.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], and a thin command-line front end
//! in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
