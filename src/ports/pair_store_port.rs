//! Persistence port for realized trade pairs.

use crate::domain::error::LedgerError;
use crate::domain::record::TradePairRecord;

pub trait PairStorePort {
    fn append_pairs(&mut self, records: &[TradePairRecord]) -> Result<(), LedgerError>;

    fn load_pairs(&self) -> Result<Vec<TradePairRecord>, LedgerError>;
}
