use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar day as seen by a [`Calendar`]. Keys order chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Maps instants onto calendar days.
pub trait Calendar: Send + Sync {
    /// The day whose end bounds `timestamp`.
    fn end_of_day(&self, timestamp: DateTime<Utc>) -> DayKey;

    /// The strict successor of `day`, or `None` past the last representable day.
    fn next_day(&self, day: DayKey) -> Option<DayKey>;
}

/// Calendar whose days start at local midnight for a fixed UTC offset.
#[derive(Clone, Copy, Debug)]
pub struct FixedOffsetCalendar {
    offset: FixedOffset,
}

impl FixedOffsetCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Calendar shifted by a whole number of hours east of UTC.
    /// Returns `None` when `hours` is outside `-23..=23`.
    pub fn from_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(Self::new)
    }
}

impl Default for FixedOffsetCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar for FixedOffsetCalendar {
    fn end_of_day(&self, timestamp: DateTime<Utc>) -> DayKey {
        DayKey(timestamp.with_timezone(&self.offset).date_naive())
    }

    fn next_day(&self, day: DayKey) -> Option<DayKey> {
        day.0.succ_opt().map(DayKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DayKey {
        DayKey::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_same_day_maps_to_one_key() {
        let calendar = FixedOffsetCalendar::utc();
        let morning = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();

        assert_eq!(calendar.end_of_day(morning), date(2024, 3, 10));
        assert_eq!(calendar.end_of_day(night), date(2024, 3, 10));
    }

    #[test]
    fn test_offset_shifts_day_boundary() {
        let calendar = FixedOffsetCalendar::from_hours(-3).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap();

        assert_eq!(calendar.end_of_day(at), date(2024, 3, 9));
    }

    #[test]
    fn test_next_day_crosses_month_and_year() {
        let calendar = FixedOffsetCalendar::utc();

        assert_eq!(calendar.next_day(date(2024, 2, 28)), Some(date(2024, 2, 29)));
        assert_eq!(calendar.next_day(date(2024, 12, 31)), Some(date(2025, 1, 1)));
        assert_eq!(calendar.next_day(DayKey::new(NaiveDate::MAX)), None);
    }

    #[test]
    fn test_rejects_out_of_range_offset() {
        assert!(FixedOffsetCalendar::from_hours(24).is_none());
        assert!(FixedOffsetCalendar::from_hours(-23).is_some());
    }
}
