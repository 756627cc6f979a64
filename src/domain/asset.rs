//! Named quantities of a currency or instrument.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use super::error::LedgerError;
use super::numeric::Numeric;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    code: String,
    quantity: Numeric,
}

pub fn jpy(quantity: &str) -> Result<Asset, LedgerError> {
    Asset::parse("JPY", quantity)
}

pub fn btc(quantity: &str) -> Result<Asset, LedgerError> {
    Asset::parse("BTC", quantity)
}

pub fn usd(quantity: &str) -> Result<Asset, LedgerError> {
    Asset::parse("USD", quantity)
}

pub fn eth(quantity: &str) -> Result<Asset, LedgerError> {
    Asset::parse("ETH", quantity)
}

impl Asset {
    pub fn new(code: impl Into<String>, quantity: Numeric) -> Result<Self, LedgerError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(LedgerError::Parse {
                input: code,
                reason: "asset code must not be empty".into(),
            });
        }
        Ok(Asset { code, quantity })
    }

    pub fn parse(code: impl Into<String>, quantity: &str) -> Result<Self, LedgerError> {
        Asset::new(code, quantity.parse()?)
    }

    pub fn zero(code: impl Into<String>) -> Result<Self, LedgerError> {
        Asset::new(code, Numeric::zero())
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn quantity(&self) -> &Numeric {
        &self.quantity
    }

    pub fn is_zero(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Same code, new quantity.
    pub(crate) fn with_quantity(&self, quantity: Numeric) -> Asset {
        Asset {
            code: self.code.clone(),
            quantity,
        }
    }

    fn ensure_same_code(&self, other: &Asset) -> Result<(), LedgerError> {
        if self.code != other.code {
            return Err(LedgerError::type_mismatch(&self.code, &other.code));
        }
        Ok(())
    }

    pub fn try_add(&self, other: &Asset) -> Result<Asset, LedgerError> {
        self.ensure_same_code(other)?;
        Ok(self.with_quantity(&self.quantity + &other.quantity))
    }

    pub fn try_sub(&self, other: &Asset) -> Result<Asset, LedgerError> {
        self.ensure_same_code(other)?;
        Ok(self.with_quantity(&self.quantity - &other.quantity))
    }

    /// Orders two assets of the same code; different codes do not compare.
    pub fn try_cmp(&self, other: &Asset) -> Result<Ordering, LedgerError> {
        self.ensure_same_code(other)?;
        Ok(self.quantity.cmp(&other.quantity))
    }

    pub fn cmp_quantity(&self, value: &Numeric) -> Ordering {
        self.quantity.cmp(value)
    }

    pub fn add_scalar(&self, value: &Numeric) -> Asset {
        self.with_quantity(&self.quantity + value)
    }

    pub fn sub_scalar(&self, value: &Numeric) -> Asset {
        self.with_quantity(&self.quantity - value)
    }

    pub fn scale(&self, factor: &Numeric) -> Asset {
        self.with_quantity(&self.quantity * factor)
    }

    pub fn checked_div(&self, divisor: &Numeric) -> Result<Asset, LedgerError> {
        Ok(self.with_quantity(self.quantity.checked_div(divisor)?))
    }

    pub fn divide_and_floor(&self, divisor: &Numeric, digits: u32) -> Result<Asset, LedgerError> {
        Ok(self.checked_div(divisor)?.floor(digits))
    }

    pub fn divide_and_ceil(&self, divisor: &Numeric, digits: u32) -> Result<Asset, LedgerError> {
        Ok(self.checked_div(divisor)?.ceil(digits))
    }

    pub fn floor(&self, digits: u32) -> Asset {
        self.with_quantity(self.quantity.floor(digits))
    }

    pub fn ceil(&self, digits: u32) -> Asset {
        self.with_quantity(self.quantity.ceil(digits))
    }

    pub fn abs(&self) -> Asset {
        self.with_quantity(self.quantity.abs())
    }
}

impl Neg for Asset {
    type Output = Asset;
    fn neg(self) -> Asset {
        Asset {
            code: self.code,
            quantity: -self.quantity,
        }
    }
}

impl Neg for &Asset {
    type Output = Asset;
    fn neg(self) -> Asset {
        self.with_quantity(-&self.quantity)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.code)
    }
}
