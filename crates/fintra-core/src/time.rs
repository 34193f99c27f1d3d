//! Clock abstraction and calendar-month arithmetic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Clock abstracts access to the current timestamp so services remain
/// deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock implementation used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(DateTime::from_naive_utc_and_offset(
            date.and_hms_opt(12, 0, 0).unwrap(),
            Utc,
        ))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// First calendar day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap()
}

/// Shifts `date` by whole calendar months, clamping the day to the
/// target month's length (May 31 minus 3 months is Feb 28/29).
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_start_truncates_to_first_day() {
        assert_eq!(month_start(date(2025, 7, 19)), date(2025, 7, 1));
        assert_eq!(month_start(date(2025, 7, 1)), date(2025, 7, 1));
    }

    #[test]
    fn shift_months_clamps_short_months() {
        assert_eq!(shift_months(date(2025, 5, 31), -3), date(2025, 2, 28));
        assert_eq!(shift_months(date(2024, 5, 31), -3), date(2024, 2, 29));
        assert_eq!(shift_months(date(2025, 1, 15), -3), date(2024, 10, 15));
        assert_eq!(shift_months(date(2025, 11, 30), 3), date(2026, 2, 28));
    }

    #[test]
    fn fixed_clock_reports_pinned_date() {
        let clock = FixedClock::from_date(date(2025, 3, 9));
        assert_eq!(clock.today(), date(2025, 3, 9));
    }
}
