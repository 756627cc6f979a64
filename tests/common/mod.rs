#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fxledger::domain::asset::{btc, jpy};
use fxledger::domain::error::LedgerError;
use fxledger::domain::ledger::Ledger;
use fxledger::domain::numeric::Numeric;
use fxledger::domain::rate::Rate;
use fxledger::domain::trade::Trade;
use fxledger::ports::rate_port::RatePort;
use std::collections::HashMap;

pub fn num(s: &str) -> Numeric {
    s.parse().unwrap()
}

/// 2022-04-01 00:00 plus `hours`.
pub fn ts(hours: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 4, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::hours(hours)
}

pub fn buy(id: u32, yen: &str, coin: &str) -> Trade {
    Trade::new(jpy(yen).unwrap(), btc(coin).unwrap(), ts(id as i64))
        .unwrap()
        .with_id(id.to_string())
}

pub fn sell(id: u32, coin: &str, yen: &str) -> Trade {
    Trade::new(btc(coin).unwrap(), jpy(yen).unwrap(), ts(id as i64))
        .unwrap()
        .with_id(id.to_string())
}

/// Five buys and five sells of BTC against JPY, one hour apart.
pub fn fixture_trades() -> Vec<Trade> {
    vec![
        buy(1, "20000", "0.005"),
        buy(2, "21000", "0.007"),
        sell(3, "0.003", "12000"),
        sell(4, "0.005", "25000"),
        sell(5, "0.007", "28000"),
        sell(6, "0.008", "32000"),
        buy(7, "25000", "0.005"),
        buy(8, "24000", "0.006"),
        sell(9, "0.007", "21000"),
        sell(10, "0.006", "24000"),
    ]
}

pub fn fixture_ledger() -> Ledger {
    fixture_trades().into_iter().collect()
}

/// Quotes keyed by `(from, to)`; missing pairs are unavailable.
pub struct MockRatePort {
    pub bids: HashMap<(String, String), Numeric>,
    pub asks: HashMap<(String, String), Numeric>,
}

impl MockRatePort {
    pub fn new() -> Self {
        Self {
            bids: HashMap::new(),
            asks: HashMap::new(),
        }
    }

    pub fn with_bid(mut self, from: &str, to: &str, ratio: &str) -> Self {
        self.bids.insert((from.to_string(), to.to_string()), num(ratio));
        self
    }

    pub fn with_ask(mut self, from: &str, to: &str, ratio: &str) -> Self {
        self.asks.insert((from.to_string(), to.to_string()), num(ratio));
        self
    }

    fn quote(
        book: &HashMap<(String, String), Numeric>,
        from: &str,
        to: &str,
    ) -> Result<Rate, LedgerError> {
        book.get(&(from.to_string(), to.to_string()))
            .map(|ratio| Rate::new(from, to, ratio.clone()))
            .ok_or_else(|| LedgerError::RateUnavailable {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}

impl RatePort for MockRatePort {
    fn best_bid(&self, from: &str, to: &str) -> Result<Rate, LedgerError> {
        Self::quote(&self.bids, from, to)
    }

    fn best_ask(&self, from: &str, to: &str) -> Result<Rate, LedgerError> {
        Self::quote(&self.asks, from, to)
    }
}
