//! In-memory trade and pair store for tests and dry runs.

use crate::domain::error::LedgerError;
use crate::domain::record::{TradePairRecord, TradeRecord};
use crate::ports::pair_store_port::PairStorePort;
use crate::ports::trade_store_port::TradeStorePort;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    trades: Vec<TradeRecord>,
    pairs: Vec<TradePairRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trades(trades: Vec<TradeRecord>) -> Self {
        Self {
            trades,
            pairs: Vec::new(),
        }
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn pairs(&self) -> &[TradePairRecord] {
        &self.pairs
    }
}

impl TradeStorePort for MemoryStore {
    fn append_trades(&mut self, records: &[TradeRecord]) -> Result<(), LedgerError> {
        self.trades.extend_from_slice(records);
        Ok(())
    }

    fn load_trades(&self) -> Result<Vec<TradeRecord>, LedgerError> {
        Ok(self.trades.clone())
    }
}

impl PairStorePort for MemoryStore {
    fn append_pairs(&mut self, records: &[TradePairRecord]) -> Result<(), LedgerError> {
        self.pairs.extend_from_slice(records);
        Ok(())
    }

    fn load_pairs(&self) -> Result<Vec<TradePairRecord>, LedgerError> {
        Ok(self.pairs.clone())
    }
}
