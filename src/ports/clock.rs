//! Clock port - the notion of "now" used by the age gate and timestamps.

use chrono::NaiveDate;

use crate::domain::foundation::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Calendar date (UTC) of `now`.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
