//! Source of "today" for scheduling and streak arithmetic.
//!
//! Dates are calendar days without a time or zone component. The system
//! clock reports the UTC date, matching the ISO `YYYY-MM-DD` strings that
//! end up in storage.

use std::cell::Cell;

use chrono::{NaiveDate, Utc};

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock pinned to one date, advanced by hand. Used by tests and by
/// hosts replaying events.
/// Not `Clone`: share it by reference so every component reads the same day.
#[derive(Debug)]
pub struct FixedClock {
    date: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date: Cell::new(date) }
    }

    pub fn advance_days(&self, days: u64) {
        let next = self
            .date
            .get()
            .checked_add_days(chrono::Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        self.date.set(next);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
