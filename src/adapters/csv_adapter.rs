//! CSV file store for trade and trade-pair records.
//!
//! Trades live in one file with the fixed record columns followed by one
//! column per info key. Appending rewrites the trade file through a temporary
//! file in the same directory so that the header always holds the union of
//! info keys. Pairs have a fixed header and are appended in place.
//!
//! Ids and info values are stored verbatim; an empty cell means absent.

use crate::domain::error::LedgerError;
use crate::domain::numeric::Numeric;
use crate::domain::record::{
    format_timestamp, parse_timestamp, TradePairRecord, TradeRecord, PAIR_COLUMNS, TRADE_COLUMNS,
};
use crate::domain::summary::{TradeSummary, SUMMARY_COLUMNS};
use crate::domain::trade::Info;
use crate::ports::pair_store_port::PairStorePort;
use crate::ports::trade_store_port::TradeStorePort;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct CsvStore {
    trades_path: PathBuf,
    pairs_path: Option<PathBuf>,
}

impl CsvStore {
    pub fn new(trades_path: PathBuf) -> Self {
        Self {
            trades_path,
            pairs_path: None,
        }
    }

    pub fn with_pairs(mut self, pairs_path: PathBuf) -> Self {
        self.pairs_path = Some(pairs_path);
        self
    }

    fn pairs_path(&self) -> Result<&Path, LedgerError> {
        self.pairs_path
            .as_deref()
            .ok_or_else(|| LedgerError::storage("no pairs file configured"))
    }
}

fn csv_error(path: &Path, e: csv::Error) -> LedgerError {
    LedgerError::storage(format!("{}: {}", path.display(), e))
}

fn write_error(e: csv::Error) -> LedgerError {
    LedgerError::storage(e.to_string())
}

fn cell<'a>(record: &'a csv::StringRecord, index: usize, column: &str) -> Result<&'a str, LedgerError> {
    record
        .get(index)
        .ok_or_else(|| LedgerError::storage(format!("missing {column} column")))
}

fn numeric_cell(record: &csv::StringRecord, index: usize, column: &str) -> Result<Numeric, LedgerError> {
    cell(record, index, column)?.parse()
}

fn optional_cell(record: &csv::StringRecord, index: usize, column: &str) -> Result<Option<String>, LedgerError> {
    let value = cell(record, index, column)?;
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn check_header(path: &Path, headers: &csv::StringRecord, expected: &[&str]) -> Result<(), LedgerError> {
    for (i, column) in expected.iter().enumerate() {
        if headers.get(i) != Some(*column) {
            return Err(LedgerError::storage(format!(
                "{}: expected column {} to be {:?}, found {:?}",
                path.display(),
                i,
                column,
                headers.get(i)
            )));
        }
    }
    Ok(())
}

fn read_trades(path: &Path) -> Result<Vec<TradeRecord>, LedgerError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    let headers = rdr.headers().map_err(|e| csv_error(path, e))?.clone();
    check_header(path, &headers, &TRADE_COLUMNS)?;
    let info_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .skip(TRADE_COLUMNS.len())
        .map(|(i, name)| (i, name.to_string()))
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| csv_error(path, e))?;
        let mut info = Info::new();
        for (i, name) in &info_columns {
            if let Some(value) = optional_cell(&row, *i, name)? {
                info.insert(name.clone(), value);
            }
        }
        records.push(TradeRecord {
            t: parse_timestamp(cell(&row, 0, TRADE_COLUMNS[0])?)?,
            id: optional_cell(&row, 1, TRADE_COLUMNS[1])?,
            from: cell(&row, 2, TRADE_COLUMNS[2])?.trim().to_string(),
            from_quantity: numeric_cell(&row, 3, TRADE_COLUMNS[3])?,
            to: cell(&row, 4, TRADE_COLUMNS[4])?.trim().to_string(),
            to_quantity: numeric_cell(&row, 5, TRADE_COLUMNS[5])?,
            rate: numeric_cell(&row, 6, TRADE_COLUMNS[6])?,
            info,
        });
    }
    Ok(records)
}

/// Writes trade records with the record columns followed by the sorted union
/// of info keys.
pub fn write_trade_table<W: Write>(writer: W, records: &[TradeRecord]) -> Result<(), LedgerError> {
    let info_keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.info.keys().map(String::as_str))
        .collect();

    let mut wtr = csv::Writer::from_writer(writer);
    let header: Vec<&str> = TRADE_COLUMNS.iter().copied().chain(info_keys.iter().copied()).collect();
    wtr.write_record(&header).map_err(write_error)?;

    for record in records {
        let mut row = vec![
            format_timestamp(&record.t),
            record.id.clone().unwrap_or_default(),
            record.from.clone(),
            record.from_quantity.to_string(),
            record.to.clone(),
            record.to_quantity.to_string(),
            record.rate.to_string(),
        ];
        row.extend(
            info_keys
                .iter()
                .map(|key| record.info.get(*key).cloned().unwrap_or_default()),
        );
        wtr.write_record(&row).map_err(write_error)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes pair records, optionally preceded by the header row.
pub fn write_pair_table<W: Write>(
    writer: W,
    records: &[TradePairRecord],
    with_header: bool,
) -> Result<(), LedgerError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    if with_header {
        wtr.write_record(PAIR_COLUMNS).map_err(write_error)?;
    }
    for record in records {
        wtr.write_record(pair_row(record)).map_err(write_error)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_summary_table<W: Write>(writer: W, rows: &[TradeSummary]) -> Result<(), LedgerError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SUMMARY_COLUMNS).map_err(write_error)?;
    for row in rows {
        wtr.write_record(row.cells()).map_err(write_error)?;
    }
    wtr.flush()?;
    Ok(())
}

fn pair_row(record: &TradePairRecord) -> Vec<String> {
    vec![
        record.before_id.clone().unwrap_or_default(),
        record.after_id.clone().unwrap_or_default(),
        format_timestamp(&record.s),
        format_timestamp(&record.t),
        record.x_s.to_string(),
        record.y_t.to_string(),
        record.z_t.to_string(),
        record.code_x.clone(),
        record.code_y.clone(),
        record.code_z.clone(),
        record.rate_ys_xs.to_string(),
        record.rate_zt_yt.to_string(),
        record.rate_zt_xs.to_string(),
    ]
}

fn read_pairs(path: &Path) -> Result<Vec<TradePairRecord>, LedgerError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    let headers = rdr.headers().map_err(|e| csv_error(path, e))?.clone();
    check_header(path, &headers, &PAIR_COLUMNS)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| csv_error(path, e))?;
        records.push(TradePairRecord {
            before_id: optional_cell(&row, 0, PAIR_COLUMNS[0])?,
            after_id: optional_cell(&row, 1, PAIR_COLUMNS[1])?,
            s: parse_timestamp(cell(&row, 2, PAIR_COLUMNS[2])?)?,
            t: parse_timestamp(cell(&row, 3, PAIR_COLUMNS[3])?)?,
            x_s: numeric_cell(&row, 4, PAIR_COLUMNS[4])?,
            y_t: numeric_cell(&row, 5, PAIR_COLUMNS[5])?,
            z_t: numeric_cell(&row, 6, PAIR_COLUMNS[6])?,
            code_x: cell(&row, 7, PAIR_COLUMNS[7])?.trim().to_string(),
            code_y: cell(&row, 8, PAIR_COLUMNS[8])?.trim().to_string(),
            code_z: cell(&row, 9, PAIR_COLUMNS[9])?.trim().to_string(),
            rate_ys_xs: numeric_cell(&row, 10, PAIR_COLUMNS[10])?,
            rate_zt_yt: numeric_cell(&row, 11, PAIR_COLUMNS[11])?,
            rate_zt_xs: numeric_cell(&row, 12, PAIR_COLUMNS[12])?,
        });
    }
    Ok(records)
}

impl TradeStorePort for CsvStore {
    fn append_trades(&mut self, records: &[TradeRecord]) -> Result<(), LedgerError> {
        let mut all = if self.trades_path.exists() {
            read_trades(&self.trades_path)?
        } else {
            Vec::new()
        };
        all.extend_from_slice(records);

        let dir = self.trades_path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        write_trade_table(&mut tmp, &all)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.trades_path).map_err(|e| {
            LedgerError::storage(format!("{}: {}", self.trades_path.display(), e.error))
        })?;
        debug!(
            "appended {} trades to {}",
            records.len(),
            self.trades_path.display()
        );
        Ok(())
    }

    fn load_trades(&self) -> Result<Vec<TradeRecord>, LedgerError> {
        read_trades(&self.trades_path)
    }
}

impl PairStorePort for CsvStore {
    fn append_pairs(&mut self, records: &[TradePairRecord]) -> Result<(), LedgerError> {
        let path = self.pairs_path()?;
        let is_new = !path.exists();
        if !is_new {
            read_pairs(path)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        write_pair_table(file, records, is_new)?;
        debug!("appended {} pairs to {}", records.len(), path.display());
        Ok(())
    }

    fn load_pairs(&self) -> Result<Vec<TradePairRecord>, LedgerError> {
        let path = self.pairs_path()?;
        if !path.exists() {
            warn!("pairs file {} does not exist yet", path.display());
            return Ok(Vec::new());
        }
        read_pairs(path)
    }
}
