use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}

/// A (month, year) pair scoping every dashboard read and derived aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

/// Colombian Spanish short month names, as the charts label their axes
const SHORT_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The immediately preceding period; January wraps to December
    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        // month is validated at construction, so this cannot fail
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or_else(|| self.first_day())
    }

    pub fn days_in_month(self) -> u32 {
        self.last_day().day()
    }

    /// First instant of the period, UTC
    pub fn start(self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.first_day().and_time(NaiveTime::MIN))
    }

    /// First instant of the following period (exclusive upper bound)
    pub fn end(self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.next().first_day().and_time(NaiveTime::MIN))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }

    /// `YYYY-MM` key matching the month column of the aggregate views
    pub fn month_key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Chart label for a calendar day, e.g. `5 nov`
pub fn day_label(date: NaiveDate) -> String {
    let month_index = (date.month() - 1) as usize;
    format!("{} {}", date.day(), SHORT_MONTHS[month_index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_month() {
        assert_eq!(Period::new(2026, 0), Err(PeriodError::InvalidMonth(0)));
        assert_eq!(Period::new(2026, 13), Err(PeriodError::InvalidMonth(13)));
        assert!(Period::new(2026, 12).is_ok());
    }

    #[test]
    fn test_previous_wraps_january() {
        let january = Period::new(2026, 1).unwrap();
        let previous = january.previous();
        assert_eq!(previous.year(), 2025);
        assert_eq!(previous.month(), 12);

        let august = Period::new(2026, 8).unwrap();
        assert_eq!(august.previous().month(), 7);
        assert_eq!(august.previous().year(), 2026);
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        assert_eq!(Period::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(Period::new(2026, 2).unwrap().days_in_month(), 28);
        assert_eq!(Period::new(2026, 8).unwrap().days_in_month(), 31);
    }

    #[test]
    fn test_bounds_are_half_open() {
        let period = Period::new(2026, 8).unwrap();
        assert_eq!(period.start().to_rfc3339(), "2026-08-01T00:00:00+00:00");
        assert_eq!(period.end().to_rfc3339(), "2026-09-01T00:00:00+00:00");
    }

    #[test]
    fn test_month_key() {
        assert_eq!(Period::new(2026, 3).unwrap().month_key(), "2026-03");
    }

    #[test]
    fn test_day_label_uses_spanish_short_months() {
        let date = NaiveDate::from_ymd_opt(2026, 11, 5).unwrap();
        assert_eq!(day_label(date), "5 nov");

        let date = NaiveDate::from_ymd_opt(2026, 1, 28).unwrap();
        assert_eq!(day_label(date), "28 ene");
    }
}
