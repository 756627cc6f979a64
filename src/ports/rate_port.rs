//! Market-rate source port.

use crate::domain::error::LedgerError;
use crate::domain::rate::Rate;

/// Current top of book for the market between `from` and `to`.
///
/// Both sides come back as a `from -> to` rate whichever way the market is
/// listed. A taker gets the worse of the two; see
/// [`taker_rate`](crate::domain::execution::taker_rate).
pub trait RatePort {
    /// The market's best bid.
    fn best_bid(&self, from: &str, to: &str) -> Result<Rate, LedgerError>;

    /// The market's best ask.
    fn best_ask(&self, from: &str, to: &str) -> Result<Rate, LedgerError>;
}
