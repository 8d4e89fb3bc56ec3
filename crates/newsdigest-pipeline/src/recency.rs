//! "Published today" in a fixed reference timezone.

use chrono::{DateTime, FixedOffset, NaiveDateTime, NaiveTime, TimeDelta, Utc};

/// The half-open civil day `[start, start + 24h)` in a reference zone.
///
/// Captured once per run so every item of the run is classified against the
/// same day, even if the run crosses midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl DayWindow {
    /// The current day in `zone`, from the wall clock.
    #[must_use]
    pub fn today(zone: FixedOffset) -> Self {
        Self::containing(Utc::now(), zone)
    }

    /// The day in `zone` that contains `instant`.
    #[must_use]
    pub fn containing(instant: DateTime<Utc>, zone: FixedOffset) -> Self {
        let local = instant.with_timezone(&zone);
        let start = local - (local.time() - NaiveTime::MIN);
        let end = start + TimeDelta::hours(24);
        Self { start, end }
    }

    #[must_use]
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    /// `true` if `ts` falls inside the window. Any offset is accepted.
    #[must_use]
    pub fn contains(&self, ts: &DateTime<FixedOffset>) -> bool {
        *ts >= self.start && *ts < self.end
    }

    /// Like [`DayWindow::contains`] for a timestamp without zone information,
    /// which is read as UTC.
    #[must_use]
    pub fn contains_naive(&self, ts: NaiveDateTime) -> bool {
        self.contains(&ts.and_utc().fixed_offset())
    }
}

/// `true` if `ts` was published today in `zone`, evaluated against the wall clock now.
#[must_use]
pub fn is_today(ts: &DateTime<FixedOffset>, zone: FixedOffset) -> bool {
    DayWindow::today(zone).contains(ts)
}
