//! Wall-clock port, injected wherever a trade timestamp is not supplied.

use chrono::NaiveDateTime;

pub trait ClockPort {
    fn now(&self) -> NaiveDateTime;
}
