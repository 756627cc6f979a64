//! Directional conversion factors between two asset codes.

use std::fmt;

use super::asset::Asset;
use super::error::LedgerError;
use super::numeric::Numeric;

/// `1 from = ratio to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rate {
    from: String,
    to: String,
    ratio: Numeric,
}

impl Rate {
    pub fn new(from: impl Into<String>, to: impl Into<String>, ratio: Numeric) -> Self {
        Rate {
            from: from.into(),
            to: to.into(),
            ratio,
        }
    }

    /// Rate that turns `x` into `y`: `y.quantity / x.quantity`.
    pub fn from_assets(x: &Asset, y: &Asset) -> Result<Self, LedgerError> {
        if x.is_zero() {
            return Err(LedgerError::division(format!(
                "rate from zero {} to {}",
                x.code(),
                y.code()
            )));
        }
        Ok(Rate::new(
            x.code(),
            y.code(),
            y.quantity().checked_div(x.quantity())?,
        ))
    }

    pub fn from_code(&self) -> &str {
        &self.from
    }

    pub fn to_code(&self) -> &str {
        &self.to
    }

    pub fn ratio(&self) -> &Numeric {
        &self.ratio
    }

    pub fn invert(&self) -> Result<Rate, LedgerError> {
        Ok(Rate::new(&self.to, &self.from, self.ratio.recip()?))
    }

    /// Chains `self` (A→B) with `next` (B→C) into A→C.
    pub fn then(&self, next: &Rate) -> Result<Rate, LedgerError> {
        if self.to != next.from {
            return Err(LedgerError::type_mismatch(&self.to, &next.from));
        }
        Ok(Rate::new(&self.from, &next.to, &self.ratio * &next.ratio))
    }

    /// A→C divided by B→C gives A→B.
    pub fn checked_div_rate(&self, other: &Rate) -> Result<Rate, LedgerError> {
        self.then(&other.invert()?)
    }

    pub fn convert(&self, asset: &Asset) -> Result<Asset, LedgerError> {
        if asset.code() != self.from {
            return Err(LedgerError::type_mismatch(&self.from, asset.code()));
        }
        Asset::new(&self.to, asset.quantity() * &self.ratio)
    }

    pub fn scale(&self, factor: &Numeric) -> Rate {
        Rate::new(&self.from, &self.to, &self.ratio * factor)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.ratio, self.to, self.from)
    }
}
