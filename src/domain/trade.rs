//! Single conversions of one asset into another.
//!
//! A [`Trade`] holds the asset given up (`x`) and the asset received (`y`).
//! Its rate is always derived from the two legs, so every transformation
//! rebuilds the trade from new legs and keeps `t`, `id` and `info`.

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::asset::Asset;
use super::error::LedgerError;
use super::numeric::Numeric;
use super::rate::Rate;
use super::trade_pair::TradePair;
use crate::ports::clock_port::ClockPort;

/// Rounding digit for the "from" leg.
pub const DEFAULT_FROM_DIGITS: u32 = 0;
/// Rounding digit for the "to" leg.
pub const DEFAULT_TO_DIGITS: u32 = 6;

/// Extra named fields carried unchanged through every transformation.
pub type Info = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    x: Asset,
    y: Asset,
    rate: Rate,
    t: NaiveDateTime,
    id: Option<String>,
    info: Info,
}

impl Trade {
    /// Fails with `DivisionUndefined` when `x` is zero and with `Validation`
    /// when either leg is otherwise not positive.
    pub fn new(x: Asset, y: Asset, t: NaiveDateTime) -> Result<Self, LedgerError> {
        let rate = Self::checked_rate(&x, &y)?;
        Ok(Trade {
            x,
            y,
            rate,
            t,
            id: None,
            info: Info::new(),
        })
    }

    /// Timestamp taken from the injected clock.
    pub fn now(x: Asset, y: Asset, clock: &dyn ClockPort) -> Result<Self, LedgerError> {
        Trade::new(x, y, clock.now())
    }

    pub fn from_asset_and_rate(
        asset: Asset,
        rate: &Rate,
        t: NaiveDateTime,
    ) -> Result<Self, LedgerError> {
        let y = rate.convert(&asset)?;
        Trade::new(asset, y, t)
    }

    /// An empty id is no id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.id = (!id.is_empty()).then_some(id);
        self
    }

    /// An empty value removes `key`.
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        if value.is_empty() {
            self.info.remove(&key);
        } else {
            self.info.insert(key, value);
        }
        self
    }

    /// Replaces the info map; entries with empty values are dropped.
    pub fn with_info_map(mut self, mut info: Info) -> Self {
        info.retain(|_, value| !value.is_empty());
        self.info = info;
        self
    }

    pub fn x(&self) -> &Asset {
        &self.x
    }

    pub fn y(&self) -> &Asset {
        &self.y
    }

    pub fn t(&self) -> NaiveDateTime {
        self.t
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    /// `R(yt/xt)`, derived from the legs at construction.
    pub fn rate(&self) -> &Rate {
        &self.rate
    }

    /// True when `self` converts in the opposite direction of `other`.
    pub fn reversed_direction_of(&self, other: &Trade) -> bool {
        self.x.code() == other.y.code() && self.y.code() == other.x.code()
    }

    fn checked_rate(x: &Asset, y: &Asset) -> Result<Rate, LedgerError> {
        let rate = Rate::from_assets(x, y)?;
        for (field, leg) in [("x", x), ("y", y)] {
            if !leg.quantity().is_positive() {
                return Err(LedgerError::validation(
                    field,
                    format!("{leg} must be positive"),
                ));
            }
        }
        Ok(rate)
    }

    /// Same t/id/info, new legs.
    fn rebuild(&self, x: Asset, y: Asset) -> Result<Trade, LedgerError> {
        let rate = Self::checked_rate(&x, &y)?;
        Ok(Trade {
            x,
            y,
            rate,
            t: self.t,
            id: self.id.clone(),
            info: self.info.clone(),
        })
    }

    fn ensure_splittable(leg: &Asset, splitter: &Asset) -> Result<(), LedgerError> {
        if splitter.code() != leg.code() {
            return Err(LedgerError::type_mismatch(leg.code(), splitter.code()));
        }
        if !splitter.quantity().is_positive() {
            return Err(LedgerError::ordering(format!(
                "splitter {splitter} must be positive"
            )));
        }
        if splitter.try_cmp(leg)? != Ordering::Less {
            return Err(LedgerError::ordering(format!(
                "splitter {splitter} must be smaller than {leg}"
            )));
        }
        Ok(())
    }

    /// Splits on the pre-trade leg: the first part gives up exactly `x`.
    pub fn split_x(&self, x: &Asset) -> Result<(Trade, Trade), LedgerError> {
        Self::ensure_splittable(&self.x, x)?;
        let y1 = self.y.with_quantity(x.quantity() * self.rate.ratio());
        let x2 = self.x.try_sub(x)?;
        let y2 = self.y.try_sub(&y1)?;
        Ok((self.rebuild(x.clone(), y1)?, self.rebuild(x2, y2)?))
    }

    /// Splits on the post-trade leg: the first part receives exactly `y`.
    pub fn split_y(&self, y: &Asset) -> Result<(Trade, Trade), LedgerError> {
        Self::ensure_splittable(&self.y, y)?;
        let share = y.quantity().checked_div(self.y.quantity())?;
        let x1 = self.x.scale(&share);
        let x2 = self.x.try_sub(&x1)?;
        let y2 = self.y.try_sub(y)?;
        Ok((self.rebuild(x1, y.clone())?, self.rebuild(x2, y2)?))
    }

    /// Dispatches on the code of `z`; the pre-trade leg wins when both match.
    pub fn split(&self, z: &Asset) -> Result<(Trade, Trade), LedgerError> {
        if z.code() == self.x.code() {
            self.split_x(z)
        } else if z.code() == self.y.code() {
            self.split_y(z)
        } else {
            Err(LedgerError::type_mismatch(
                format!("{} or {}", self.x.code(), self.y.code()),
                z.code(),
            ))
        }
    }

    /// Realizes as much of `self` as `later` can close.
    ///
    /// Returns the realized pair and, unless the legs matched exactly, the
    /// unsettled part of whichever trade was larger.
    pub fn settle(&self, later: &Trade) -> Result<(TradePair, Option<Trade>), LedgerError> {
        if self.t > later.t {
            return Err(LedgerError::ordering(format!(
                "cannot settle {} against earlier trade at {}",
                self.t, later.t
            )));
        }
        match self.y.try_cmp(&later.x)? {
            Ordering::Equal => Ok((TradePair::new(self.clone(), later.clone())?, None)),
            Ordering::Less => {
                let (settled, unsettled) = later.split_x(&self.y)?;
                Ok((TradePair::new(self.clone(), settled)?, Some(unsettled)))
            }
            Ordering::Greater => {
                let (settled, unsettled) = self.split_y(&later.x)?;
                Ok((TradePair::new(settled, later.clone())?, Some(unsettled)))
            }
        }
    }

    pub fn xfloor(&self, digits: u32) -> Result<Trade, LedgerError> {
        let x = self.x.floor(digits);
        let y = self.rate.convert(&x)?;
        self.rebuild(x, y)
    }

    pub fn xceil(&self, digits: u32) -> Result<Trade, LedgerError> {
        let x = self.x.ceil(digits);
        let y = self.rate.convert(&x)?;
        self.rebuild(x, y)
    }

    pub fn yfloor(&self, digits: u32) -> Result<Trade, LedgerError> {
        let y = self.y.floor(digits);
        let x = self.rate.invert()?.convert(&y)?;
        self.rebuild(x, y)
    }

    pub fn yceil(&self, digits: u32) -> Result<Trade, LedgerError> {
        let y = self.y.ceil(digits);
        let x = self.rate.invert()?.convert(&y)?;
        self.rebuild(x, y)
    }

    /// Rounds the post-trade leg down.
    pub fn floor(&self, digits: u32) -> Result<Trade, LedgerError> {
        self.yfloor(digits)
    }

    /// Rounds the post-trade leg up.
    pub fn ceil(&self, digits: u32) -> Result<Trade, LedgerError> {
        self.yceil(digits)
    }

    pub fn scale(&self, factor: &Numeric) -> Result<Trade, LedgerError> {
        self.rebuild(self.x.scale(factor), self.y.scale(factor))
    }

    pub fn divide(&self, divisor: &Numeric) -> Result<Trade, LedgerError> {
        self.rebuild(self.x.checked_div(divisor)?, self.y.checked_div(divisor)?)
    }

    pub fn divide_and_floor(&self, divisor: &Numeric, digits: u32) -> Result<Trade, LedgerError> {
        self.divide(divisor)?.floor(digits)
    }

    pub fn divide_and_ceil(&self, divisor: &Numeric, digits: u32) -> Result<Trade, LedgerError> {
        self.divide(divisor)?.ceil(digits)
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trade(")?;
        if let Some(id) = &self.id {
            write!(f, "{id} | ")?;
        }
        write!(
            f,
            "{} | R(yt/xt): {} | {} -> {})",
            self.t,
            self.rate.ratio(),
            self.x,
            self.y
        )
    }
}
