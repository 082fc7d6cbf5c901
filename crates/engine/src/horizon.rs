//! The projection window: whole calendar months starting at a month boundary.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::{
    ResultEngine,
    util::{add_months, first_of_month, months_between},
};

/// Number of months projected when the caller does not choose.
pub const DEFAULT_MONTHS: u32 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Horizon {
    start: NaiveDate,
    end: NaiveDate,
    months: u32,
}

impl Horizon {
    /// Builds a horizon of `months` months starting at the month containing
    /// `start`. Zero months is a valid, empty horizon.
    pub fn new(start: NaiveDate, months: u32) -> ResultEngine<Self> {
        let start = first_of_month(start);
        let end = add_months(start, months)?;
        Ok(Self { start, end, months })
    }

    /// Horizon starting at the current month (UTC).
    pub fn from_current_month(months: u32) -> ResultEngine<Self> {
        Self::new(Utc::now().date_naive(), months)
    }

    /// First day of the first month.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day after the last month (exclusive bound).
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn months(&self) -> u32 {
        self.months
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months == 0
    }

    /// First day of every month, in order.
    pub fn month_starts(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.months).map_while(|i| add_months(self.start, i).ok())
    }

    /// Index of the month containing `date`, if it is inside the horizon.
    #[must_use]
    pub fn month_index(&self, date: NaiveDate) -> Option<usize> {
        let index = months_between(self.start, date);
        if (0..i64::from(self.months)).contains(&index) {
            usize::try_from(index).ok()
        } else {
            None
        }
    }
}
