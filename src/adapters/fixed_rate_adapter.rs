//! Static quote table implementing [`RatePort`].

use std::collections::BTreeMap;

use crate::domain::error::LedgerError;
use crate::domain::numeric::Numeric;
use crate::domain::rate::Rate;
use crate::ports::rate_port::RatePort;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Quote {
    bid: Numeric,
    ask: Numeric,
}

/// Markets keyed by `(base, quote)`, each priced in units of `quote` per
/// `base`. Asking for the reverse direction inverts the same side.
#[derive(Debug, Clone, Default)]
pub struct FixedRateAdapter {
    markets: BTreeMap<(String, String), Quote>,
}

impl FixedRateAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(
        mut self,
        base: &str,
        quote: &str,
        bid: Numeric,
        ask: Numeric,
    ) -> Result<Self, LedgerError> {
        let market = format!("{base}/{quote}");
        if !bid.is_positive() || !ask.is_positive() {
            return Err(LedgerError::validation(market, "quotes must be positive"));
        }
        if bid > ask {
            return Err(LedgerError::validation(
                market,
                format!("bid {bid} is above ask {ask}"),
            ));
        }
        self.markets
            .insert((base.to_string(), quote.to_string()), Quote { bid, ask });
        Ok(self)
    }

    fn side(
        &self,
        from: &str,
        to: &str,
        price: impl Fn(&Quote) -> &Numeric,
    ) -> Result<Rate, LedgerError> {
        if let Some(market) = self.markets.get(&(from.to_string(), to.to_string())) {
            return Ok(Rate::new(from, to, price(market).clone()));
        }
        if let Some(market) = self.markets.get(&(to.to_string(), from.to_string())) {
            return Rate::new(to, from, price(market).clone()).invert();
        }
        Err(LedgerError::RateUnavailable {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

impl RatePort for FixedRateAdapter {
    fn best_bid(&self, from: &str, to: &str) -> Result<Rate, LedgerError> {
        self.side(from, to, |quote| &quote.bid)
    }

    fn best_ask(&self, from: &str, to: &str) -> Result<Rate, LedgerError> {
        self.side(from, to, |quote| &quote.ask)
    }
}
