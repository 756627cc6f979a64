//! Realized trade pairs collected while closing a ledger.

use std::collections::BTreeMap;

use super::error::LedgerError;
use super::numeric::Numeric;
use super::record::TradePairRecord;
use super::trade_pair::TradePair;

/// Grouping key `(code_X, code_Y, code_Z)`.
pub type PairKey = (String, String, String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pairs: Vec<TradePair>,
}

impl Report {
    pub fn new() -> Self {
        Report::default()
    }

    pub fn add(&mut self, pair: TradePair) {
        self.pairs.push(pair);
    }

    pub fn extend(&mut self, other: Report) {
        self.pairs.extend(other.pairs);
    }

    pub fn pairs(&self) -> &[TradePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn group_by_code(&self) -> BTreeMap<PairKey, Vec<&TradePair>> {
        let mut groups: BTreeMap<PairKey, Vec<&TradePair>> = BTreeMap::new();
        for pair in &self.pairs {
            let (x, y, z) = pair.codes();
            groups
                .entry((x.to_string(), y.to_string(), z.to_string()))
                .or_default()
                .push(pair);
        }
        groups
    }

    /// Per group: `(used, earned)` = `(Σ X(s), Σ Z(t+dt))`.
    pub fn totals(&self) -> BTreeMap<PairKey, (Numeric, Numeric)> {
        self.group_by_code()
            .into_iter()
            .map(|(key, pairs)| {
                let used: Numeric = pairs.iter().map(|p| p.before().x().quantity()).sum();
                let earned: Numeric = pairs.iter().map(|p| p.after().y().quantity()).sum();
                (key, (used, earned))
            })
            .collect()
    }

    pub fn records(&self) -> Vec<TradePairRecord> {
        self.pairs.iter().map(TradePair::to_record).collect()
    }

    /// Rebuilds a report, validating every record.
    pub fn from_records(records: &[TradePairRecord]) -> Result<Self, LedgerError> {
        let pairs = records
            .iter()
            .map(TradePair::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Report { pairs })
    }
}

impl FromIterator<TradePair> for Report {
    fn from_iter<I: IntoIterator<Item = TradePair>>(iter: I) -> Self {
        Report {
            pairs: iter.into_iter().collect(),
        }
    }
}
