//! Aggregate rows produced by `Ledger::describe` and `Ledger::summarize`.

use super::numeric::Numeric;
use super::trade::Trade;

/// One row per `(capital, via)` direction.
///
/// `None` marks an undefined rate: `rate_mean` when the total position is
/// zero, `rate_min`/`rate_max` when there were no open entries at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeSummary {
    pub capital: String,
    pub via: String,
    pub used: Numeric,
    pub earned: Numeric,
    pub position: Numeric,
    pub hold: Numeric,
    pub rate_mean: Option<Numeric>,
    pub position_min: Numeric,
    pub hold_min: Numeric,
    pub rate_min: Option<Numeric>,
    pub position_max: Numeric,
    pub hold_max: Numeric,
    pub rate_max: Option<Numeric>,
}

pub const SUMMARY_COLUMNS: [&str; 13] = [
    "capital",
    "via",
    "used",
    "earned",
    "position",
    "hold",
    "rate_mean",
    "position_min",
    "hold_min",
    "rate_min",
    "position_max",
    "hold_max",
    "rate_max",
];

fn totals<'a>(trades: impl Iterator<Item = &'a Trade>) -> (Numeric, Numeric) {
    trades.fold((Numeric::zero(), Numeric::zero()), |(x, y), trade| {
        (x + trade.x().quantity().clone(), y + trade.y().quantity().clone())
    })
}

impl TradeSummary {
    /// Describes `trades`, which must all convert `capital` into `via`.
    pub fn from_trades(capital: &str, via: &str, trades: &[&Trade]) -> Self {
        let (position, hold) = totals(trades.iter().copied());
        let rate_mean = hold.checked_div(&position).ok();

        let rate_min = trades.iter().map(|t| t.rate().ratio()).min().cloned();
        let rate_max = trades.iter().map(|t| t.rate().ratio()).max().cloned();

        let at_rate = |rate: &Option<Numeric>| match rate {
            Some(rate) => totals(
                trades
                    .iter()
                    .copied()
                    .filter(|t| t.rate().ratio() == rate),
            ),
            None => (Numeric::zero(), Numeric::zero()),
        };
        let (position_min, hold_min) = at_rate(&rate_min);
        let (position_max, hold_max) = at_rate(&rate_max);

        TradeSummary {
            capital: capital.to_string(),
            via: via.to_string(),
            used: Numeric::zero(),
            earned: Numeric::zero(),
            position,
            hold,
            rate_mean,
            position_min,
            hold_min,
            rate_min,
            position_max,
            hold_max,
            rate_max,
        }
    }

    pub fn with_realized(mut self, used: Numeric, earned: Numeric) -> Self {
        self.used = used;
        self.earned = earned;
        self
    }

    /// Cells in `SUMMARY_COLUMNS` order; undefined rates render as `-`.
    pub fn cells(&self) -> Vec<String> {
        let rate = |r: &Option<Numeric>| {
            r.as_ref()
                .map_or_else(|| "-".to_string(), Numeric::to_string)
        };
        vec![
            self.capital.clone(),
            self.via.clone(),
            self.used.to_string(),
            self.earned.to_string(),
            self.position.to_string(),
            self.hold.to_string(),
            rate(&self.rate_mean),
            self.position_min.to_string(),
            self.hold_min.to_string(),
            rate(&self.rate_min),
            self.position_max.to_string(),
            self.hold_max.to_string(),
            rate(&self.rate_max),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::{btc, jpy};
    use chrono::NaiveDate;

    fn sell(btc_q: &str, jpy_q: &str) -> Trade {
        let t = NaiveDate::from_ymd_opt(2022, 4, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Trade::new(btc(btc_q).unwrap(), jpy(jpy_q).unwrap(), t).unwrap()
    }

    fn num(s: &str) -> Numeric {
        s.parse().unwrap()
    }

    #[test]
    fn empty_slice_has_undefined_rates() {
        let row = TradeSummary::from_trades("JPY", "BTC", &[]);
        assert_eq!(row.position, Numeric::zero());
        assert_eq!(row.hold, Numeric::zero());
        assert_eq!(row.rate_mean, None);
        assert_eq!(row.rate_min, None);
        assert_eq!(row.rate_max, None);
        assert_eq!(row.position_min, Numeric::zero());
    }

    #[test]
    fn totals_and_extremes() {
        let a = sell("0.001", "3000");
        let b = sell("0.002", "8000");
        let c = sell("0.003", "9000");
        let row = TradeSummary::from_trades("BTC", "JPY", &[&a, &b, &c]);
        assert_eq!(row.position, num("0.006"));
        assert_eq!(row.hold, num("20000"));
        assert_eq!(row.rate_mean, Some(num("20000").checked_div(&num("0.006")).unwrap()));
        assert_eq!(row.rate_min, Some(num("3000000")));
        assert_eq!(row.position_min, num("0.004"));
        assert_eq!(row.hold_min, num("12000"));
        assert_eq!(row.rate_max, Some(num("4000000")));
        assert_eq!(row.position_max, num("0.002"));
        assert_eq!(row.hold_max, num("8000"));
    }

    #[test]
    fn realized_totals_are_attached() {
        let row = TradeSummary::from_trades("JPY", "BTC", &[])
            .with_realized(num("46000"), num("56750"));
        assert_eq!(row.used, num("46000"));
        assert_eq!(row.earned, num("56750"));
    }

    #[test]
    fn cells_follow_column_order() {
        let a = sell("0.002", "8000");
        let cells = TradeSummary::from_trades("BTC", "JPY", &[&a]).cells();
        assert_eq!(cells.len(), SUMMARY_COLUMNS.len());
        assert_eq!(cells[0], "BTC");
        assert_eq!(cells[6], "4000000");
        let empty = TradeSummary::from_trades("JPY", "BTC", &[]).cells();
        assert_eq!(empty[6], "-");
    }
}
