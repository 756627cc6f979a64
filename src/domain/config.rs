//! Ledger configuration, read through [`ConfigPort`] and validated before use.

use std::path::PathBuf;

use super::error::LedgerError;
use super::execution::OrderLimits;
use super::ledger::MatchOrder;
use super::numeric::Numeric;
use super::trade::{DEFAULT_FROM_DIGITS, DEFAULT_TO_DIGITS};
use crate::ports::config_port::ConfigPort;

const MAX_DIGITS: i64 = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub match_order: MatchOrder,
    pub origin: Option<String>,
    pub from_digits: u32,
    pub to_digits: u32,
    pub trades_path: Option<PathBuf>,
    pub pairs_path: Option<PathBuf>,
    pub persist_pairs: bool,
    pub limits: OrderLimits,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            match_order: MatchOrder::default(),
            origin: None,
            from_digits: DEFAULT_FROM_DIGITS,
            to_digits: DEFAULT_TO_DIGITS,
            trades_path: None,
            pairs_path: None,
            persist_pairs: false,
            limits: OrderLimits::new(),
        }
    }
}

impl LedgerConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, LedgerError> {
        let parsed = LedgerConfig {
            match_order: parse_match_order(config)?,
            origin: non_empty(config.get_string("ledger", "origin")),
            from_digits: parse_digits(config, "from_digits", DEFAULT_FROM_DIGITS)?,
            to_digits: parse_digits(config, "to_digits", DEFAULT_TO_DIGITS)?,
            trades_path: non_empty(config.get_string("storage", "trades_path")).map(PathBuf::from),
            pairs_path: non_empty(config.get_string("storage", "pairs_path")).map(PathBuf::from),
            persist_pairs: config.get_bool("storage", "persist_pairs", false),
            limits: parse_limits(config)?,
        };
        if parsed.persist_pairs {
            parsed.pairs_path()?;
        }
        Ok(parsed)
    }

    pub fn trades_path(&self) -> Result<&PathBuf, LedgerError> {
        self.trades_path.as_ref().ok_or_else(|| LedgerError::ConfigMissing {
            section: "storage".to_string(),
            key: "trades_path".to_string(),
        })
    }

    pub fn pairs_path(&self) -> Result<&PathBuf, LedgerError> {
        self.pairs_path.as_ref().ok_or_else(|| LedgerError::ConfigMissing {
            section: "storage".to_string(),
            key: "pairs_path".to_string(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> LedgerError {
    LedgerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_match_order(config: &dyn ConfigPort) -> Result<MatchOrder, LedgerError> {
    match non_empty(config.get_string("ledger", "match_order")) {
        None => Ok(MatchOrder::default()),
        Some(value) => value.parse().map_err(|_| {
            invalid(
                "ledger",
                "match_order",
                format!("{value:?} must be ascending or descending"),
            )
        }),
    }
}

fn parse_digits(config: &dyn ConfigPort, key: &str, default: u32) -> Result<u32, LedgerError> {
    if let Some(raw) = non_empty(config.get_string("rounding", key)) {
        if raw.parse::<i64>().is_err() {
            return Err(invalid("rounding", key, format!("{raw:?} is not an integer")));
        }
    }
    let value = config.get_int("rounding", key, default as i64);
    if !(0..=MAX_DIGITS).contains(&value) {
        return Err(invalid(
            "rounding",
            key,
            format!("{key} must be between 0 and {MAX_DIGITS}"),
        ));
    }
    Ok(value as u32)
}

/// `[limits] codes = BTC,ETH` followed by `BTC.min` / `BTC.max` per code.
fn parse_limits(config: &dyn ConfigPort) -> Result<OrderLimits, LedgerError> {
    let Some(codes) = non_empty(config.get_string("limits", "codes")) else {
        return Ok(OrderLimits::new());
    };
    let mut limits = OrderLimits::new();
    for code in codes.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let min = parse_limit_value(config, &format!("{code}.min"))?;
        let max = parse_limit_value(config, &format!("{code}.max"))?;
        limits = limits
            .with(code, min, max)
            .map_err(|e| invalid("limits", code, e.to_string()))?;
    }
    Ok(limits)
}

fn parse_limit_value(config: &dyn ConfigPort, key: &str) -> Result<Numeric, LedgerError> {
    let raw = non_empty(config.get_string("limits", key)).ok_or_else(|| {
        LedgerError::ConfigMissing {
            section: "limits".to_string(),
            key: key.to_string(),
        }
    })?;
    let value: Numeric = raw
        .parse()
        .map_err(|_| invalid("limits", key, format!("{raw:?} is not a number")))?;
    if value.is_negative() {
        return Err(invalid("limits", key, "must be non-negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use crate::domain::asset::btc;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn full_config_parses() {
        let config = make_config(
            r#"
[ledger]
match_order = descending
origin = JPY

[rounding]
from_digits = 0
to_digits = 8

[storage]
trades_path = /data/trades.csv
pairs_path = /data/pairs.csv
persist_pairs = true

[limits]
codes = BTC
BTC.min = 0.001
BTC.max = 1000
"#,
        );
        let parsed = LedgerConfig::from_port(&config).unwrap();
        assert_eq!(parsed.match_order, MatchOrder::Descending);
        assert_eq!(parsed.origin.as_deref(), Some("JPY"));
        assert_eq!(parsed.to_digits, 8);
        assert_eq!(
            parsed.trades_path().unwrap(),
            &PathBuf::from("/data/trades.csv")
        );
        assert!(parsed.persist_pairs);
        assert!(parsed.limits.check(&btc("0.0001").unwrap()).is_err());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let parsed = LedgerConfig::from_port(&make_config("[ledger]\n")).unwrap();
        assert_eq!(parsed, LedgerConfig::default());
        assert!(matches!(
            parsed.trades_path(),
            Err(LedgerError::ConfigMissing { key, .. }) if key == "trades_path"
        ));
    }

    #[test]
    fn persist_pairs_requires_pairs_path() {
        let config = make_config("[storage]\npersist_pairs = yes\n");
        let err = LedgerConfig::from_port(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigMissing { key, .. } if key == "pairs_path"));
    }

    #[test]
    fn bad_match_order_fails() {
        let config = make_config("[ledger]\nmatch_order = fifo\n");
        let err = LedgerConfig::from_port(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "match_order"));
    }

    #[test]
    fn digits_out_of_range_fail() {
        let config = make_config("[rounding]\nto_digits = 19\n");
        let err = LedgerConfig::from_port(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "to_digits"));

        let config = make_config("[rounding]\nfrom_digits = -1\n");
        let err = LedgerConfig::from_port(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "from_digits"));
    }

    #[test]
    fn non_numeric_digits_fail() {
        let config = make_config("[rounding]\nto_digits = six\n");
        let err = LedgerConfig::from_port(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "to_digits"));
    }

    #[test]
    fn missing_limit_value_fails() {
        let config = make_config("[limits]\ncodes = BTC\nBTC.min = 0.001\n");
        let err = LedgerConfig::from_port(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigMissing { key, .. } if key == "BTC.max"));
    }

    #[test]
    fn inverted_limit_fails() {
        let config = make_config("[limits]\ncodes = BTC\nBTC.min = 5\nBTC.max = 1\n");
        let err = LedgerConfig::from_port(&config).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigInvalid { key, .. } if key == "BTC"));
    }
}
