//! Day-count conventions.
//!
//! Converts a pair of calendar dates into a year fraction. Only the
//! actual-day conventions used for FX option expiries are provided.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day-count convention used to measure time to expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCount {
    /// Actual days over a 360-day year.
    Act360,
    /// Actual days over a fixed 365-day year.
    Act365F,
    /// Actual days over a 365.25-day year.
    Act36525,
}

impl DayCount {
    /// Year fraction between two dates.
    ///
    /// Antisymmetric: if `end` precedes `start` the result is negative.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use fxsmile::daycount::DayCount;
    ///
    /// let start = NaiveDate::from_ymd_opt(2015, 2, 17).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2016, 2, 17).unwrap();
    /// assert_eq!(DayCount::Act365F.year_fraction(start, end), 365.0 / 365.0);
    /// assert_eq!(DayCount::Act360.year_fraction(end, start), -365.0 / 360.0);
    /// ```
    pub fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = (end - start).num_days() as f64;
        days / self.days_per_year()
    }

    fn days_per_year(&self) -> f64 {
        match self {
            DayCount::Act360 => 360.0,
            DayCount::Act365F => 365.0,
            DayCount::Act36525 => 365.25,
        }
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayCount::Act360 => "Act/360",
            DayCount::Act365F => "Act/365F",
            DayCount::Act36525 => "Act/365.25",
        };
        f.write_str(name)
    }
}
