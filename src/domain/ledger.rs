//! Open positions and the matching algorithm that realizes them.
//!
//! A [`Ledger`] holds open trades in insertion order. Closing walks every
//! trade chronologically; each trade first settles against open positions of
//! the reverse direction, and whatever it cannot settle stays open.
//!
//! Matching is quadratic in the number of open entries. That is fine for a
//! personal ledger and is not optimised.

use chrono::NaiveDateTime;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::LedgerError;
use super::numeric::Numeric;
use super::record::TradeRecord;
use super::report::Report;
use super::summary::TradeSummary;
use super::trade::Trade;

/// Order in which reverse-direction candidates are consumed, by their own
/// rate. Ties keep ledger insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for MatchOrder {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ascending" | "asc" => Ok(MatchOrder::Ascending),
            "descending" | "desc" => Ok(MatchOrder::Descending),
            other => Err(LedgerError::Parse {
                input: other.to_string(),
                reason: "expected ascending or descending".into(),
            }),
        }
    }
}

impl fmt::Display for MatchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOrder::Ascending => write!(f, "ascending"),
            MatchOrder::Descending => write!(f, "descending"),
        }
    }
}

/// Direction key `(from, to)`.
pub type DirectionKey = (String, String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<Trade>,
    order: MatchOrder,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn with_order(mut self, order: MatchOrder) -> Self {
        self.order = order;
        self
    }

    pub fn order(&self) -> MatchOrder {
        self.order
    }

    pub fn entries(&self) -> &[Trade] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, trade: Trade) {
        self.entries.push(trade);
    }

    pub fn extend(&mut self, trades: impl IntoIterator<Item = Trade>) {
        self.entries.extend(trades);
    }

    /// Validates the stored rate before appending.
    pub fn add_record(&mut self, record: &TradeRecord) -> Result<(), LedgerError> {
        self.entries.push(Trade::from_record(record)?);
        Ok(())
    }

    pub fn from_records(records: &[TradeRecord]) -> Result<Self, LedgerError> {
        let mut ledger = Ledger::new();
        for record in records {
            ledger.add_record(record)?;
        }
        Ok(ledger)
    }

    pub fn records(&self) -> Vec<TradeRecord> {
        self.entries.iter().map(Trade::to_record).collect()
    }

    /// Removes entries by position. Unknown positions are ignored.
    pub fn drop(&mut self, positions: &[usize]) {
        let mut index = 0;
        self.entries.retain(|_| {
            let keep = !positions.contains(&index);
            index += 1;
            keep
        });
    }

    /// Positions of the open entries `trade` should settle against, in the
    /// order they are consumed.
    ///
    /// Candidates convert in the reverse direction of `trade` and are not
    /// later than it. They are taken by rate until their received quantity
    /// covers what `trade` gives up.
    pub fn find_matches(&self, trade: &Trade, order: MatchOrder) -> Vec<usize> {
        let mut candidates: Vec<(usize, &Trade)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.reversed_direction_of(trade) && entry.t() <= trade.t())
            .collect();

        candidates.sort_by(|(_, a), (_, b)| {
            let by_rate = a.rate().ratio().cmp(b.rate().ratio());
            match order {
                MatchOrder::Ascending => by_rate,
                MatchOrder::Descending => by_rate.reverse(),
            }
        });

        let mut remaining = trade.x().quantity().clone();
        let mut selected = Vec::new();
        for (index, entry) in candidates {
            selected.push(index);
            if entry.y().quantity() >= &remaining {
                break;
            }
            remaining = &remaining - entry.y().quantity();
        }
        selected
    }

    /// Settles `trade` against matching open positions.
    ///
    /// Returns `None` for the report when nothing matched; the ledger is then
    /// unchanged and the caller decides whether `trade` opens a position.
    /// Otherwise the matched entries are removed and any unsettled remainder
    /// is appended.
    pub fn settle(
        &self,
        trade: &Trade,
        order: MatchOrder,
    ) -> Result<(Ledger, Option<Report>), LedgerError> {
        let matches = self.find_matches(trade, order);
        if matches.is_empty() {
            return Ok((self.clone(), None));
        }

        let mut report = Report::new();
        let mut remainder = Some(trade.clone());
        for &index in &matches {
            let Some(incoming) = remainder.take() else {
                break;
            };
            let (pair, rest) = self.entries[index].settle(&incoming)?;
            report.add(pair);
            remainder = rest;
        }

        let mut ledger = self.clone();
        ledger.drop(&matches);
        debug!(
            "settled {} against {} open entries, remainder {}",
            trade,
            matches.len(),
            if remainder.is_some() { "kept" } else { "none" }
        );
        if let Some(rest) = remainder {
            ledger.add(rest);
        }
        Ok((ledger, Some(report)))
    }

    /// Splits the ledger into still-open positions and realized pairs using
    /// the ledger's own match order.
    pub fn close(&self) -> Result<(Ledger, Report), LedgerError> {
        self.close_with(self.order)
    }

    pub fn close_with(&self, order: MatchOrder) -> Result<(Ledger, Report), LedgerError> {
        let mut trades = self.entries.clone();
        trades.sort_by_key(Trade::t);

        let mut open = Ledger::new().with_order(self.order);
        let mut report = Report::new();
        let mut trades = trades.into_iter();
        if let Some(first) = trades.next() {
            open.add(first);
        }
        for trade in trades {
            let (next, settled) = open.settle(&trade, order)?;
            open = next;
            match settled {
                Some(settled) => report.extend(settled),
                None => open.add(trade),
            }
        }

        debug!(
            "closed {} trades into {} open entries and {} pairs",
            self.len(),
            open.len(),
            report.len()
        );
        Ok((open, report))
    }

    pub fn group_by_code(&self) -> BTreeMap<DirectionKey, Vec<&Trade>> {
        let mut groups: BTreeMap<DirectionKey, Vec<&Trade>> = BTreeMap::new();
        for trade in &self.entries {
            groups
                .entry((trade.x().code().to_string(), trade.y().code().to_string()))
                .or_default()
                .push(trade);
        }
        groups
    }

    /// Open entries converting `code_from` into `code_to`, described.
    pub fn describe(&self, code_from: &str, code_to: &str) -> TradeSummary {
        let slice: Vec<&Trade> = self
            .entries
            .iter()
            .filter(|t| t.x().code() == code_from && t.y().code() == code_to)
            .collect();
        TradeSummary::from_trades(code_from, code_to, &slice)
    }

    /// Closes the ledger and describes each direction.
    ///
    /// Realized rows come from the report groups and describe the open slice
    /// of the group's first leg. Open directions with no realized row get a
    /// row of their own. With an `origin`, rows starting from it come first,
    /// then rows passing through it.
    pub fn summarize(&self, origin: Option<&str>) -> Result<Vec<TradeSummary>, LedgerError> {
        let (open, report) = self.close()?;

        let mut rows: Vec<TradeSummary> = report
            .totals()
            .into_iter()
            .map(|((code_x, code_y, _), (used, earned))| {
                open.describe(&code_x, &code_y).with_realized(used, earned)
            })
            .collect();

        for (from, to) in open.group_by_code().into_keys() {
            if rows.iter().any(|r| r.capital == from && r.via == to) {
                continue;
            }
            rows.push(open.describe(&from, &to));
        }

        let by_codes = |a: &TradeSummary, b: &TradeSummary| {
            (&a.capital, &a.via).cmp(&(&b.capital, &b.via))
        };
        match origin {
            None => rows.sort_by(by_codes),
            Some(origin) => {
                let rank = |r: &TradeSummary| {
                    if r.capital == origin {
                        0
                    } else if r.via == origin {
                        1
                    } else {
                        2
                    }
                };
                rows.sort_by(|a, b| {
                    rank(a).cmp(&rank(b)).then_with(|| match rank(a) {
                        0 => a.via.cmp(&b.via),
                        1 => a.capital.cmp(&b.capital),
                        _ => by_codes(a, b),
                    })
                });
            }
        }
        Ok(rows)
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.entries.iter().map(Trade::t).min()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.entries.iter().map(Trade::t).max()
    }

    /// Entries at or before `t`.
    pub fn until(&self, t: NaiveDateTime) -> Ledger {
        Ledger {
            entries: self
                .entries
                .iter()
                .filter(|e| e.t() <= t)
                .cloned()
                .collect(),
            order: self.order,
        }
    }

    /// Sum of open quantities given up per code.
    pub fn position_by_code(&self) -> BTreeMap<String, Numeric> {
        let mut totals: BTreeMap<String, Numeric> = BTreeMap::new();
        for trade in &self.entries {
            let total = totals.entry(trade.x().code().to_string()).or_default();
            *total = &*total + trade.x().quantity();
        }
        totals
    }
}

impl FromIterator<Trade> for Ledger {
    fn from_iter<I: IntoIterator<Item = Trade>>(iter: I) -> Self {
        Ledger {
            entries: iter.into_iter().collect(),
            order: MatchOrder::default(),
        }
    }
}
