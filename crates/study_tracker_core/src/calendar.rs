//! crates/study_tracker_core/src/calendar.rs
//!
//! Calendar-day policy.
//!
//! Every practice date is a calendar day in one fixed UTC offset chosen for the
//! deployment, never the server's or the browser's local zone.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};

/// +05:30, the exam-prep target timezone.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Days covered by the "this week" aggregate, counted back from today.
pub const WEEK_SPAN_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyCalendar {
    offset: FixedOffset,
}

impl Default for StudyCalendar {
    fn default() -> Self {
        Self::from_offset_minutes(DEFAULT_UTC_OFFSET_MINUTES)
            .unwrap_or_else(|| Self::new(Utc.fix()))
    }
}

impl StudyCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `None` when the offset is beyond ±24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The calendar date of `now` in this calendar's offset.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }
}

/// The closed lower bound of the weekly window ending on `today`.
pub fn week_floor(today: NaiveDate) -> NaiveDate {
    today - Duration::days(WEEK_SPAN_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn today_uses_configured_offset() {
        // 20:00 UTC is already the next day at +05:30.
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap();
        let ist = StudyCalendar::default();
        let utc = StudyCalendar::from_offset_minutes(0).unwrap();

        assert_eq!(ist.today(now), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(utc.today(now), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn week_floor_is_seven_days_back() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(week_floor(today), NaiveDate::from_ymd_opt(2024, 2, 23).unwrap());
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        assert!(StudyCalendar::from_offset_minutes(24 * 60).is_none());
        assert!(StudyCalendar::from_offset_minutes(-330).is_some());
    }
}
