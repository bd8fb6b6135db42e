use crate::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ohno::bail;
use serde::Serialize;

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateInterval {
    /// Create an interval, rejecting an end day that precedes the start day.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            bail!("interval end {end} precedes its start {start}");
        }

        Ok(Self { start, end })
    }

    /// Create a single-day interval.
    #[must_use]
    pub const fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// First instant of the interval (00:00:00 on the start day).
    #[must_use]
    pub const fn start_of_range(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last whole second of the interval (23:59:59 on the end day).
    #[must_use]
    pub fn end_of_range(&self) -> NaiveDateTime {
        // 23:59:59 is always a valid time of day
        self.end.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
    }

    /// Whether the instant falls on one of the interval's days.
    #[must_use]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.contains_day(instant.date())
    }

    #[must_use]
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Number of calendar days in the interval, both ends included.
    #[must_use]
    pub fn day_count(&self) -> u64 {
        self.end.signed_duration_since(self.start).num_days().unsigned_abs() + 1
    }

    /// Every day of the interval in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_reversed_bounds() {
        let _ = DateInterval::new(date(2024, 3, 2), date(2024, 3, 1)).unwrap_err();
    }

    #[test]
    fn test_single_day() {
        let interval = DateInterval::single_day(date(2024, 2, 29));
        assert_eq!(interval.day_count(), 1);
        assert_eq!(interval.days().collect::<Vec<_>>(), vec![date(2024, 2, 29)]);
    }

    #[test]
    fn test_range_boundaries_are_day_aligned() {
        let interval = DateInterval::new(date(2024, 3, 2), date(2024, 3, 31)).unwrap();
        assert_eq!(interval.start_of_range().to_string(), "2024-03-02 00:00:00");
        assert_eq!(interval.end_of_range().to_string(), "2024-03-31 23:59:59");
    }

    #[test]
    fn test_contains_is_inclusive_of_whole_end_day() {
        let interval = DateInterval::new(date(2024, 3, 2), date(2024, 3, 31)).unwrap();
        assert!(interval.contains(date(2024, 3, 2).and_hms_opt(0, 0, 0).unwrap()));
        assert!(interval.contains(date(2024, 3, 31).and_hms_milli_opt(23, 59, 59, 999).unwrap()));
        assert!(!interval.contains(date(2024, 4, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(!interval.contains(date(2024, 3, 1).and_hms_opt(23, 59, 59).unwrap()));
    }

    #[test]
    fn test_days_cross_month_and_leap_day() {
        let interval = DateInterval::new(date(2024, 2, 27), date(2024, 3, 2)).unwrap();
        let days: Vec<_> = interval.days().collect();
        assert_eq!(
            days,
            vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1), date(2024, 3, 2)]
        );
        assert_eq!(interval.day_count(), 5);
    }

    #[test]
    fn test_serializes_as_plain_dates() {
        let interval = DateInterval::new(date(2024, 3, 2), date(2024, 3, 31)).unwrap();
        let json = serde_json::to_string(&interval).unwrap();
        assert_eq!(json, r#"{"start":"2024-03-02","end":"2024-03-31"}"#);
    }
}
