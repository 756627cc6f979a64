//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{write_pair_table, write_summary_table, write_trade_table, CsvStore};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config::LedgerConfig;
use crate::domain::error::LedgerError;
use crate::domain::ledger::{Ledger, MatchOrder};
use crate::domain::report::Report;
use crate::ports::pair_store_port::PairStorePort;
use crate::ports::trade_store_port::TradeStorePort;

#[derive(Parser, Debug)]
#[command(name = "fxledger", about = "FX trade ledger: match, realize and summarize trades")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Match every trade and print the realized pairs
    Close {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        trades: Option<PathBuf>,
        /// Override the configured match order (ascending or descending)
        #[arg(long)]
        order: Option<MatchOrder>,
        /// Print the remaining open positions instead of the pairs
        #[arg(long)]
        open: bool,
    },
    /// Print one row per trading direction
    Summarize {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        trades: Option<PathBuf>,
        /// Code whose rows are listed first
        #[arg(long)]
        origin: Option<String>,
    },
    /// Describe the open positions converting FROM into TO
    Describe {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        trades: Option<PathBuf>,
        from: String,
        to: String,
    },
    /// Check the configuration and every stored trade
    Validate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        trades: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Close {
            config,
            trades,
            order,
            open,
        } => run_close(config.as_deref(), trades, order, open),
        Command::Summarize {
            config,
            trades,
            origin,
        } => run_summarize(config.as_deref(), trades, origin),
        Command::Describe {
            config,
            trades,
            from,
            to,
        } => run_describe(config.as_deref(), trades, &from, &to),
        Command::Validate { config, trades } => run_validate(config.as_deref(), trades),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

/// Reads and validates the config file, or the defaults when none is given.
/// A `--trades` path overrides `[storage] trades_path`.
pub fn load_config(
    path: Option<&Path>,
    trades_override: Option<PathBuf>,
) -> Result<LedgerConfig, LedgerError> {
    let mut config = match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            LedgerConfig::from_port(&FileConfigAdapter::from_file(path)?)?
        }
        None => LedgerConfig::default(),
    };
    if trades_override.is_some() {
        config.trades_path = trades_override;
    }
    Ok(config)
}

pub fn load_ledger(config: &LedgerConfig) -> Result<Ledger, LedgerError> {
    let store = CsvStore::new(config.trades_path()?.clone());
    let records = store.load_trades()?;
    let ledger = Ledger::from_records(&records)?.with_order(config.match_order);
    info!("loaded {} trades", ledger.len());
    Ok(ledger)
}

fn run_close(
    config_path: Option<&Path>,
    trades: Option<PathBuf>,
    order: Option<MatchOrder>,
    open_only: bool,
) -> Result<(), LedgerError> {
    let config = load_config(config_path, trades)?;
    let ledger = load_ledger(&config)?;
    let (open, report) = ledger.close_with(order.unwrap_or(config.match_order))?;
    eprintln!(
        "{} trades closed into {} open positions and {} pairs",
        ledger.len(),
        open.len(),
        report.len()
    );

    if config.persist_pairs && !report.is_empty() {
        let mut store =
            CsvStore::new(config.trades_path()?.clone()).with_pairs(config.pairs_path()?.clone());
        store.append_pairs(&report.records())?;
        eprintln!("Appended {} pairs to {}", report.len(), config.pairs_path()?.display());
    }

    if open_only {
        write_trade_table(io::stdout().lock(), &open.records())
    } else {
        write_pair_table(io::stdout().lock(), &report.records(), true)
    }
}

fn run_summarize(
    config_path: Option<&Path>,
    trades: Option<PathBuf>,
    origin: Option<String>,
) -> Result<(), LedgerError> {
    let config = load_config(config_path, trades)?;
    let ledger = load_ledger(&config)?;
    let origin = origin.or_else(|| config.origin.clone());
    let rows = ledger.summarize(origin.as_deref())?;
    write_summary_table(io::stdout().lock(), &rows)
}

fn run_describe(
    config_path: Option<&Path>,
    trades: Option<PathBuf>,
    from: &str,
    to: &str,
) -> Result<(), LedgerError> {
    let config = load_config(config_path, trades)?;
    let (open, _) = load_ledger(&config)?.close()?;
    write_summary_table(io::stdout().lock(), &[open.describe(from, to)])
}

fn run_validate(config_path: Option<&Path>, trades: Option<PathBuf>) -> Result<(), LedgerError> {
    let config = load_config(config_path, trades)?;
    eprintln!("Config OK (match order {})", config.match_order);
    if config.trades_path.is_none() {
        return Ok(());
    }

    let ledger = load_ledger(&config)?;
    eprintln!("{} trades OK", ledger.len());
    if let (Some(first), Some(last)) = (ledger.first_timestamp(), ledger.last_timestamp()) {
        eprintln!("  from {first} to {last}");
    }
    for (code, total) in ledger.position_by_code() {
        eprintln!("  {code}: {total} given up");
    }

    if config.persist_pairs {
        let store =
            CsvStore::new(config.trades_path()?.clone()).with_pairs(config.pairs_path()?.clone());
        let pairs = Report::from_records(&store.load_pairs()?)?;
        eprintln!("{} stored pairs OK", pairs.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parse_close_with_order() {
        let cli = Cli::try_parse_from([
            "fxledger", "close", "--trades", "t.csv", "--order", "descending",
        ])
        .unwrap();
        match cli.command {
            Command::Close {
                trades,
                order,
                open,
                ..
            } => {
                assert_eq!(trades, Some(PathBuf::from("t.csv")));
                assert_eq!(order, Some(MatchOrder::Descending));
                assert!(!open);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_unknown_order() {
        assert!(Cli::try_parse_from(["fxledger", "close", "--order", "fifo"]).is_err());
    }

    #[test]
    fn parse_describe_positionals() {
        let cli = Cli::try_parse_from(["fxledger", "describe", "BTC", "JPY"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Describe { ref from, ref to, .. } if from == "BTC" && to == "JPY"
        ));
    }

    #[test]
    fn load_config_without_file_needs_trades() {
        let config = load_config(None, None).unwrap();
        assert!(matches!(
            load_ledger(&config),
            Err(LedgerError::ConfigMissing { key, .. }) if key == "trades_path"
        ));
    }

    #[test]
    fn trades_flag_overrides_config() {
        let dir = TempDir::new().unwrap();
        let ini = dir.path().join("fxledger.ini");
        fs::write(&ini, "[storage]\ntrades_path = configured.csv\n").unwrap();
        let config = load_config(Some(ini.as_path()), Some(PathBuf::from("flag.csv"))).unwrap();
        assert_eq!(config.trades_path, Some(PathBuf::from("flag.csv")));
    }

    #[test]
    fn missing_config_file_is_parse_error() {
        let err = load_config(Some(Path::new("/nonexistent/fxledger.ini")), None).unwrap_err();
        assert!(matches!(err, LedgerError::ConfigParse { .. }));
    }
}
