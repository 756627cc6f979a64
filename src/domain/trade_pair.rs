//! Realized round trips: a trade and the later trade that closed it.

use chrono::NaiveDateTime;
use std::fmt;

use super::asset::Asset;
use super::error::LedgerError;
use super::rate::Rate;
use super::trade::Trade;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradePair {
    before: Trade,
    after: Trade,
    rate: Rate,
}

impl TradePair {
    /// `before.y` must be exactly `after.x` and `before` must not be later
    /// than `after`.
    pub fn new(before: Trade, after: Trade) -> Result<Self, LedgerError> {
        if before.t() > after.t() {
            return Err(LedgerError::ordering(format!(
                "before.t {} is later than after.t {}",
                before.t(),
                after.t()
            )));
        }
        if before.y().code() != after.x().code() {
            return Err(LedgerError::type_mismatch(
                before.y().code(),
                after.x().code(),
            ));
        }
        if before.y() != after.x() {
            return Err(LedgerError::validation(
                "Y(s+ds)=Y(t)",
                format!("before.y {} differs from after.x {}", before.y(), after.x()),
            ));
        }
        let rate = before.rate().then(after.rate())?;
        Ok(TradePair {
            before,
            after,
            rate,
        })
    }

    pub fn before(&self) -> &Trade {
        &self.before
    }

    pub fn after(&self) -> &Trade {
        &self.after
    }

    pub fn s(&self) -> NaiveDateTime {
        self.before.t()
    }

    pub fn t(&self) -> NaiveDateTime {
        self.after.t()
    }

    /// `R(zt/xs)`: what one unit of `X` turned into.
    pub fn rate(&self) -> &Rate {
        &self.rate
    }

    /// `(code_X, code_Y, code_Z)`.
    pub fn codes(&self) -> (&str, &str, &str) {
        (
            self.before.x().code(),
            self.before.y().code(),
            self.after.y().code(),
        )
    }

    /// Realized gain in `X` when the pair returns to its starting code.
    pub fn gain(&self) -> Option<Asset> {
        self.after.y().try_sub(self.before.x()).ok()
    }
}

impl fmt::Display for TradePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TradePair({} -> {} -> {})",
            self.before.x(),
            self.before.y(),
            self.after.y()
        )
    }
}
