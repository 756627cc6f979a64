//! Balances per asset code.

use std::collections::BTreeMap;

use super::asset::Asset;
use super::error::LedgerError;
use super::numeric::Numeric;
use super::trade::Trade;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wallet {
    balances: BTreeMap<String, Numeric>,
}

impl Wallet {
    pub fn new() -> Self {
        Wallet::default()
    }

    pub fn add(&mut self, asset: &Asset) {
        let balance = self.balances.entry(asset.code().to_string()).or_default();
        *balance = &*balance + asset.quantity();
    }

    /// A code that was never funded starts at zero and goes negative.
    pub fn sub(&mut self, asset: &Asset) {
        let balance = self.balances.entry(asset.code().to_string()).or_default();
        *balance = &*balance - asset.quantity();
    }

    pub fn get(&self, code: &str) -> Result<Asset, LedgerError> {
        Asset::new(code, self.balances.get(code).cloned().unwrap_or_default())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.balances.keys().map(String::as_str)
    }

    pub fn covers(&self, asset: &Asset) -> bool {
        self.balances
            .get(asset.code())
            .is_some_and(|balance| balance >= asset.quantity())
    }

    /// Gives up `trade.x` and receives `trade.y`.
    pub fn apply(&mut self, trade: &Trade) {
        self.sub(trade.x());
        self.add(trade.y());
    }

    pub fn merge(&mut self, other: &Wallet) {
        for (code, quantity) in &other.balances {
            let balance = self.balances.entry(code.clone()).or_default();
            *balance = &*balance + quantity;
        }
    }

    /// Keeps only the listed codes.
    pub fn retain_codes(&mut self, codes: &[&str]) {
        self.balances.retain(|code, _| codes.contains(&code.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::{btc, jpy, usd};
    use chrono::NaiveDate;

    fn num(s: &str) -> Numeric {
        s.parse().unwrap()
    }

    #[test]
    fn new_wallet_reports_zero() {
        let wallet = Wallet::new();
        assert_eq!(wallet.get("JPY").unwrap(), jpy("0").unwrap());
        assert_eq!(wallet.codes().count(), 0);
        assert!(wallet.get("").is_err());
    }

    #[test]
    fn add_and_sub_accumulate() {
        let mut wallet = Wallet::new();
        wallet.add(&jpy("1000").unwrap());
        wallet.add(&jpy("500").unwrap());
        wallet.sub(&jpy("300").unwrap());
        assert_eq!(wallet.get("JPY").unwrap().quantity(), &num("1200"));
    }

    #[test]
    fn sub_of_unknown_code_goes_negative() {
        let mut wallet = Wallet::new();
        wallet.sub(&btc("0.01").unwrap());
        assert_eq!(wallet.get("BTC").unwrap(), btc("-0.01").unwrap());
    }

    #[test]
    fn covers_checks_balance() {
        let mut wallet = Wallet::new();
        wallet.add(&jpy("1000").unwrap());
        assert!(wallet.covers(&jpy("1000").unwrap()));
        assert!(!wallet.covers(&jpy("1000.5").unwrap()));
        assert!(!wallet.covers(&btc("0.001").unwrap()));
    }

    #[test]
    fn apply_moves_both_legs() {
        let mut wallet = Wallet::new();
        wallet.add(&jpy("30000").unwrap());
        let t = NaiveDate::from_ymd_opt(2022, 4, 1)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap();
        let trade = Trade::new(jpy("20000").unwrap(), btc("0.005").unwrap(), t).unwrap();
        wallet.apply(&trade);
        assert_eq!(wallet.get("JPY").unwrap(), jpy("10000").unwrap());
        assert_eq!(wallet.get("BTC").unwrap(), btc("0.005").unwrap());
    }

    #[test]
    fn merge_and_retain() {
        let mut a = Wallet::new();
        a.add(&jpy("100").unwrap());
        let mut b = Wallet::new();
        b.add(&jpy("50").unwrap());
        b.add(&usd("5").unwrap());
        a.merge(&b);
        assert_eq!(a.get("JPY").unwrap(), jpy("150").unwrap());
        assert_eq!(a.codes().collect::<Vec<_>>(), vec!["JPY", "USD"]);
        a.retain_codes(&["USD"]);
        assert_eq!(a.codes().collect::<Vec<_>>(), vec!["USD"]);
    }
}
