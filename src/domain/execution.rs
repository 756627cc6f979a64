//! Building executable trades from market quotes.
//!
//! This is construction glue between the wallet, a rate source and the
//! exchange's order limits. It never decides whether to trade.

use log::info;
use std::collections::BTreeMap;

use super::asset::Asset;
use super::config::LedgerConfig;
use super::error::LedgerError;
use super::numeric::Numeric;
use super::rate::Rate;
use super::trade::Trade;
use super::wallet::Wallet;
use crate::ports::clock_port::ClockPort;
use crate::ports::rate_port::RatePort;

/// Smallest and largest order quantity accepted for one code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLimit {
    pub min: Numeric,
    pub max: Numeric,
}

/// Per-code order limits. Codes without an entry are unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLimits {
    by_code: BTreeMap<String, OrderLimit>,
}

impl OrderLimits {
    pub fn new() -> Self {
        OrderLimits::default()
    }

    pub fn with(
        mut self,
        code: impl Into<String>,
        min: Numeric,
        max: Numeric,
    ) -> Result<Self, LedgerError> {
        let code = code.into();
        if min > max {
            return Err(LedgerError::OrderLimit {
                code,
                reason: format!("minimum {min} exceeds maximum {max}"),
            });
        }
        self.by_code.insert(code, OrderLimit { min, max });
        Ok(self)
    }

    pub fn get(&self, code: &str) -> Option<&OrderLimit> {
        self.by_code.get(code)
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    pub fn check(&self, asset: &Asset) -> Result<(), LedgerError> {
        let Some(limit) = self.by_code.get(asset.code()) else {
            return Ok(());
        };
        if asset.quantity() < &limit.min {
            return Err(LedgerError::OrderLimit {
                code: asset.code().to_string(),
                reason: format!("{} is under minimum {}", asset.quantity(), limit.min),
            });
        }
        if asset.quantity() > &limit.max {
            return Err(LedgerError::OrderLimit {
                code: asset.code().to_string(),
                reason: format!("{} is over maximum {}", asset.quantity(), limit.max),
            });
        }
        Ok(())
    }
}

/// The rate a taker gets converting `from` into `to`: the worse of the two
/// sides of the book.
pub fn taker_rate(rates: &dyn RatePort, from: &str, to: &str) -> Result<Rate, LedgerError> {
    let bid = rates.best_bid(from, to)?;
    let ask = rates.best_ask(from, to)?;
    Ok(if ask.ratio() < bid.ratio() { ask } else { bid })
}

/// Converts `spend` into `to_code` at the taker rate.
///
/// Steps:
/// 1. Reject if the wallet does not cover `spend`
/// 2. Convert at the taker rate for `spend.code -> to_code`
/// 3. Round the spent leg down at `from_digits`, then the received leg down
///    at `to_digits`; the spent leg shrinks with it
/// 4. Check both legs against the configured order limits
pub fn market_trade(
    wallet: &Wallet,
    spend: &Asset,
    to_code: &str,
    config: &LedgerConfig,
    rates: &dyn RatePort,
    clock: &dyn ClockPort,
) -> Result<Trade, LedgerError> {
    if !wallet.covers(spend) {
        return Err(LedgerError::InsufficientBalance {
            code: spend.code().to_string(),
            required: spend.quantity().to_string(),
            available: wallet.get(spend.code())?.quantity().to_string(),
        });
    }

    let rate = taker_rate(rates, spend.code(), to_code)?;
    let received = rate.convert(spend)?;
    let trade = Trade::now(spend.clone(), received, clock)?
        .xfloor(config.from_digits)?
        .yfloor(config.to_digits)?;

    config.limits.check(trade.y())?;
    config.limits.check(trade.x())?;

    info!("market trade {trade}");
    Ok(trade)
}

/// What the received leg of `trade` is worth back in its pre-trade code at
/// the taker rate.
pub fn liquidation_value(trade: &Trade, rates: &dyn RatePort) -> Result<Asset, LedgerError> {
    let rate = taker_rate(rates, trade.y().code(), trade.x().code())?;
    rate.convert(trade.y())
}

/// Unrealized gain of an open trade: liquidation value minus what it cost.
pub fn unrealized_gain(trade: &Trade, rates: &dyn RatePort) -> Result<Asset, LedgerError> {
    liquidation_value(trade, rates)?.try_sub(trade.x())
}
