//! Exact rational scalar used for every quantity and ratio in the ledger.
//!
//! All arithmetic is carried out on arbitrary-precision rationals so that
//! chained conversions never drift. Floats are only produced on request for
//! display.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use super::error::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Numeric(BigRational);

fn ten_pow(digits: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u32), digits as usize)
}

impl Numeric {
    pub fn zero() -> Self {
        Numeric(BigRational::zero())
    }

    pub fn one() -> Self {
        Numeric(BigRational::one())
    }

    /// Builds `numer / denom`, rejecting a zero denominator.
    pub fn from_ratio(numer: i64, denom: i64) -> Result<Self, LedgerError> {
        if denom == 0 {
            return Err(LedgerError::division(format!("{numer}/0")));
        }
        Ok(Numeric(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn abs(&self) -> Self {
        Numeric(self.0.abs())
    }

    pub fn checked_div(&self, divisor: &Numeric) -> Result<Self, LedgerError> {
        if divisor.is_zero() {
            return Err(LedgerError::division(format!("{self} / 0")));
        }
        Ok(Numeric(&self.0 / &divisor.0))
    }

    pub fn recip(&self) -> Result<Self, LedgerError> {
        Numeric::one().checked_div(self)
    }

    /// Rounds toward negative infinity at the given decimal digit.
    pub fn floor(&self, digits: u32) -> Self {
        let scale = BigRational::from_integer(ten_pow(digits));
        Numeric((&self.0 * &scale).floor() / scale)
    }

    /// Rounds toward positive infinity at the given decimal digit.
    pub fn ceil(&self, digits: u32) -> Self {
        let scale = BigRational::from_integer(ten_pow(digits));
        Numeric((&self.0 * &scale).ceil() / scale)
    }

    /// Lossy conversion for display and logging only.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Number of decimal digits needed to print the value exactly, or `None`
    /// when the expansion does not terminate.
    fn decimal_digits(&self) -> Option<u32> {
        let two = BigInt::from(2u32);
        let five = BigInt::from(5u32);
        let mut denom = self.0.denom().clone();
        let mut twos = 0u32;
        let mut fives = 0u32;
        while (&denom % &two).is_zero() {
            denom /= &two;
            twos += 1;
        }
        while (&denom % &five).is_zero() {
            denom /= &five;
            fives += 1;
        }
        if denom.is_one() {
            Some(twos.max(fives))
        } else {
            None
        }
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Numeric::zero()
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric(BigRational::from_integer(BigInt::from(value)))
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Numeric::from(value as i64)
    }
}

impl From<u64> for Numeric {
    fn from(value: u64) -> Self {
        Numeric(BigRational::from_integer(BigInt::from(value)))
    }
}

fn parse_error(input: &str, reason: &str) -> LedgerError {
    LedgerError::Parse {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_integer(input: &str, digits: &str) -> Result<BigInt, LedgerError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(parse_error(input, "expected decimal digits"));
    }
    digits
        .parse::<BigInt>()
        .map_err(|e| parse_error(input, &e.to_string()))
}

impl FromStr for Numeric {
    type Err = LedgerError;

    /// Accepts `15`, `-0.005`, `.5` and `1/6`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(parse_error(s, "empty number"));
        }

        let (negative, body) = match input.as_bytes()[0] {
            b'-' => (true, &input[1..]),
            b'+' => (false, &input[1..]),
            _ => (false, input),
        };

        let value = if let Some((numer, denom)) = body.split_once('/') {
            let numer = parse_integer(s, numer.trim())?;
            let denom = parse_integer(s, denom.trim())?;
            if denom.is_zero() {
                return Err(LedgerError::division(format!("parsing {input:?}")));
            }
            BigRational::new(numer, denom)
        } else if let Some((int_part, frac_part)) = body.split_once('.') {
            if int_part.is_empty() && frac_part.is_empty() {
                return Err(parse_error(s, "expected decimal digits"));
            }
            let int_value = if int_part.is_empty() {
                BigInt::zero()
            } else {
                parse_integer(s, int_part)?
            };
            let frac_value = if frac_part.is_empty() {
                BigInt::zero()
            } else {
                parse_integer(s, frac_part)?
            };
            let scale = ten_pow(frac_part.len() as u32);
            BigRational::new(int_value * &scale + frac_value, scale)
        } else {
            BigRational::from_integer(parse_integer(s, body)?)
        };

        Ok(Numeric(if negative { -value } else { value }))
    }
}

impl fmt::Display for Numeric {
    /// Terminating values print as plain decimals, others as `n/d`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(digits) = self.decimal_digits() else {
            return write!(f, "{}/{}", self.0.numer(), self.0.denom());
        };
        let scaled = (self.0.abs() * BigRational::from_integer(ten_pow(digits))).to_integer();
        let sign = if self.0.is_negative() { "-" } else { "" };
        if digits == 0 {
            return write!(f, "{sign}{scaled}");
        }
        let text = format!("{:0>width$}", scaled.to_string(), width = digits as usize + 1);
        let (int_part, frac_part) = text.split_at(text.len() - digits as usize);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

impl Add for Numeric {
    type Output = Numeric;
    fn add(self, rhs: Numeric) -> Numeric {
        Numeric(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Numeric> for &'a Numeric {
    type Output = Numeric;
    fn add(self, rhs: &'a Numeric) -> Numeric {
        Numeric(&self.0 + &rhs.0)
    }
}

impl Sub for Numeric {
    type Output = Numeric;
    fn sub(self, rhs: Numeric) -> Numeric {
        Numeric(self.0 - rhs.0)
    }
}

impl<'a> Sub<&'a Numeric> for &'a Numeric {
    type Output = Numeric;
    fn sub(self, rhs: &'a Numeric) -> Numeric {
        Numeric(&self.0 - &rhs.0)
    }
}

impl Mul for Numeric {
    type Output = Numeric;
    fn mul(self, rhs: Numeric) -> Numeric {
        Numeric(self.0 * rhs.0)
    }
}

impl<'a> Mul<&'a Numeric> for &'a Numeric {
    type Output = Numeric;
    fn mul(self, rhs: &'a Numeric) -> Numeric {
        Numeric(&self.0 * &rhs.0)
    }
}

impl Neg for Numeric {
    type Output = Numeric;
    fn neg(self) -> Numeric {
        Numeric(-self.0)
    }
}

impl Neg for &Numeric {
    type Output = Numeric;
    fn neg(self) -> Numeric {
        Numeric(-self.0.clone())
    }
}

impl Sum for Numeric {
    fn sum<I: Iterator<Item = Numeric>>(iter: I) -> Self {
        iter.fold(Numeric::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Numeric> for Numeric {
    fn sum<I: Iterator<Item = &'a Numeric>>(iter: I) -> Self {
        iter.fold(Numeric::zero(), |acc, x| Numeric(acc.0 + &x.0))
    }
}
