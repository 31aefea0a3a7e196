//! Reference clock and refresh schedule

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};

/// Wall clock in the reference timezone
///
/// Tests pin the date so "merged today" filtering is reproducible.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceClock {
    offset: FixedOffset,
    pinned: Option<NaiveDate>,
}

impl ReferenceClock {
    /// Clock following the system time in `offset`
    pub const fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            pinned: None,
        }
    }

    /// Clock whose `today()` is always `date`
    pub const fn pinned(offset: FixedOffset, date: NaiveDate) -> Self {
        Self {
            offset,
            pinned: Some(date),
        }
    }

    /// The reference timezone
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Current time in the reference timezone
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Current date in the reference timezone
    pub fn today(&self) -> NaiveDate {
        self.pinned.unwrap_or_else(|| self.now().date_naive())
    }
}

/// When the plan is posted and refreshed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Time of day of the daily post
    pub post_at: NaiveTime,
    /// Weekdays on which the daily post happens
    pub post_days: Vec<Weekday>,
    /// Interval between in-place updates
    pub refresh_every: std::time::Duration,
}

impl Schedule {
    /// The first daily post strictly after `now`, or `None` when no weekday
    /// is configured.
    pub fn next_post_after(&self, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        let offset = *now.offset();
        (0..=7)
            .filter_map(|days| now.date_naive().checked_add_signed(Duration::days(days)))
            .filter(|date| self.post_days.contains(&date.weekday()))
            .filter_map(|date| date.and_time(self.post_at).and_local_timezone(offset).single())
            .find(|at| *at > now)
    }
}
