//! INI file configuration adapter.

use crate::domain::error::LedgerError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| LedgerError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, LedgerError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| LedgerError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[ledger]
match_order = ascending
origin = JPY

[storage]
trades_path = /var/lib/fxledger/trades.csv
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("ledger", "origin"),
            Some("JPY".to_string())
        );
        assert_eq!(
            adapter.get_string("storage", "trades_path"),
            Some("/var/lib/fxledger/trades.csv".to_string())
        );
    }

    #[test]
    fn keys_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[limits]\nBTC.min = 0.001\n").unwrap();
        assert_eq!(
            adapter.get_string("limits", "BTC.min"),
            Some("0.001".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[ledger]\norigin = JPY\n").unwrap();
        assert_eq!(adapter.get_string("ledger", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[rounding]\nto_digits = 8\n").unwrap();
        assert_eq!(adapter.get_int("rounding", "to_digits", 6), 8);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[rounding]\n").unwrap();
        assert_eq!(adapter.get_int("rounding", "to_digits", 6), 6);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[rounding]\nto_digits = abc\n").unwrap();
        assert_eq!(adapter.get_int("rounding", "to_digits", 6), 6);
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[storage]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("storage", "a", false));
        assert!(adapter.get_bool("storage", "b", false));
        assert!(adapter.get_bool("storage", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[storage]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("storage", "a", true));
        assert!(!adapter.get_bool("storage", "b", true));
        assert!(!adapter.get_bool("storage", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[storage]\n").unwrap();
        assert!(adapter.get_bool("storage", "missing", true));
        assert!(!adapter.get_bool("storage", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let content = "[storage]\npairs_path = /tmp/pairs.csv\n";
        let file = create_temp_config(content);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("storage", "pairs_path"),
            Some("/tmp/pairs.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/fxledger.ini");
        assert!(matches!(result, Err(LedgerError::ConfigParse { .. })));
    }
}
