//! Flat, serializable forms of trades and trade pairs.
//!
//! Records store the rates next to the quantities. Loading a record always
//! recomputes every rate from the quantities and rejects the record when a
//! stored rate disagrees, using exact rational equality.

use chrono::NaiveDateTime;

use super::asset::Asset;
use super::error::LedgerError;
use super::numeric::Numeric;
use super::trade::{Info, Trade};
use super::trade_pair::TradePair;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub const TRADE_COLUMNS: [&str; 7] = ["t", "id", "from", "X(t)", "to", "Y(t+dt)", "R(yt/xt)"];

pub const PAIR_COLUMNS: [&str; 13] = [
    "before_id",
    "after_id",
    "s",
    "t",
    "X(s)",
    "Y(s+ds)=Y(t)",
    "Z(t+dt)",
    "code_X",
    "code_Y",
    "code_Z",
    "R(ys/xs)",
    "R(zt/yt)",
    "R(zt/xs)",
];

pub fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts the record format and its ISO `T`-separated variant.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, LedgerError> {
    let input = input.trim();
    NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| LedgerError::Parse {
            input: input.to_string(),
            reason: format!("invalid timestamp: {e}"),
        })
}

fn check_rate(field: &str, stored: &Numeric, computed: &Numeric) -> Result<(), LedgerError> {
    if stored != computed {
        return Err(LedgerError::validation(
            field,
            format!("stored {stored} but computed {computed}"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRecord {
    pub t: NaiveDateTime,
    pub id: Option<String>,
    pub from: String,
    pub from_quantity: Numeric,
    pub to: String,
    pub to_quantity: Numeric,
    pub rate: Numeric,
    pub info: Info,
}

impl TradeRecord {
    pub fn from_trade(trade: &Trade) -> Self {
        TradeRecord {
            t: trade.t(),
            id: trade.id().map(str::to_string),
            from: trade.x().code().to_string(),
            from_quantity: trade.x().quantity().clone(),
            to: trade.y().code().to_string(),
            to_quantity: trade.y().quantity().clone(),
            rate: trade.rate().ratio().clone(),
            info: trade.info().clone(),
        }
    }

    /// Rebuilds the trade, failing with `Validation` if `R(yt/xt)` is stale.
    pub fn to_trade(&self) -> Result<Trade, LedgerError> {
        let x = Asset::new(&self.from, self.from_quantity.clone())?;
        let y = Asset::new(&self.to, self.to_quantity.clone())?;
        let mut trade = Trade::new(x, y, self.t)?.with_info_map(self.info.clone());
        if let Some(id) = &self.id {
            trade = trade.with_id(id);
        }
        check_rate(TRADE_COLUMNS[6], &self.rate, trade.rate().ratio())?;
        Ok(trade)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradePairRecord {
    pub before_id: Option<String>,
    pub after_id: Option<String>,
    pub s: NaiveDateTime,
    pub t: NaiveDateTime,
    pub x_s: Numeric,
    pub y_t: Numeric,
    pub z_t: Numeric,
    pub code_x: String,
    pub code_y: String,
    pub code_z: String,
    pub rate_ys_xs: Numeric,
    pub rate_zt_yt: Numeric,
    pub rate_zt_xs: Numeric,
}

impl TradePairRecord {
    pub fn from_pair(pair: &TradePair) -> Self {
        let (code_x, code_y, code_z) = pair.codes();
        TradePairRecord {
            before_id: pair.before().id().map(str::to_string),
            after_id: pair.after().id().map(str::to_string),
            s: pair.s(),
            t: pair.t(),
            x_s: pair.before().x().quantity().clone(),
            y_t: pair.before().y().quantity().clone(),
            z_t: pair.after().y().quantity().clone(),
            code_x: code_x.to_string(),
            code_y: code_y.to_string(),
            code_z: code_z.to_string(),
            rate_ys_xs: pair.before().rate().ratio().clone(),
            rate_zt_yt: pair.after().rate().ratio().clone(),
            rate_zt_xs: pair.rate().ratio().clone(),
        }
    }

    /// Rebuilds both trades and checks all three stored rates.
    pub fn to_pair(&self) -> Result<TradePair, LedgerError> {
        let x = Asset::new(&self.code_x, self.x_s.clone())?;
        let y = Asset::new(&self.code_y, self.y_t.clone())?;
        let z = Asset::new(&self.code_z, self.z_t.clone())?;

        let mut before = Trade::new(x, y.clone(), self.s)?;
        if let Some(id) = &self.before_id {
            before = before.with_id(id);
        }
        let mut after = Trade::new(y, z, self.t)?;
        if let Some(id) = &self.after_id {
            after = after.with_id(id);
        }

        check_rate(PAIR_COLUMNS[10], &self.rate_ys_xs, before.rate().ratio())?;
        check_rate(PAIR_COLUMNS[11], &self.rate_zt_yt, after.rate().ratio())?;
        let pair = TradePair::new(before, after)?;
        check_rate(PAIR_COLUMNS[12], &self.rate_zt_xs, pair.rate().ratio())?;
        Ok(pair)
    }
}

impl Trade {
    pub fn to_record(&self) -> TradeRecord {
        TradeRecord::from_trade(self)
    }

    pub fn from_record(record: &TradeRecord) -> Result<Trade, LedgerError> {
        record.to_trade()
    }
}

impl TradePair {
    pub fn to_record(&self) -> TradePairRecord {
        TradePairRecord::from_pair(self)
    }

    pub fn from_record(record: &TradePairRecord) -> Result<TradePair, LedgerError> {
        record.to_pair()
    }
}
