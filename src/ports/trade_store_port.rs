//! Persistence port for open trades.

use crate::domain::error::LedgerError;
use crate::domain::record::TradeRecord;

/// Ordered append and full scan over trade records.
pub trait TradeStorePort {
    fn append_trades(&mut self, records: &[TradeRecord]) -> Result<(), LedgerError>;

    fn load_trades(&self) -> Result<Vec<TradeRecord>, LedgerError>;
}
