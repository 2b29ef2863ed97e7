//! Period arithmetic for habit recurrence windows.
//!
//! Every comparison the habit engine makes ("was this completed today?",
//! "was yesterday's period satisfied?") reduces to equality of [`PeriodKey`]
//! values. Keys are computed from timestamps that already carry the grace
//! shift; raw wall-clock time never reaches this module.

use chrono::{DateTime, Datelike, Duration, Utc};

use super::HabitFrequency;

/// Hours subtracted from wall-clock time before any period computation,
/// so activity between midnight and 03:00 counts toward the previous day.
pub const GRACE_HOURS: i64 = 3;

/// Shift a wall-clock instant backward by the grace offset.
pub fn grace_shifted(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(GRACE_HOURS)
}

/// Opaque identifier of the recurrence window containing a timestamp.
///
/// Two timestamps fall in the same window iff their keys compare equal.
/// Weekly windows use the zero-based day-of-year divided by 7, qualified by
/// year. This is not ISO week numbering: week boundaries are anchored to
/// January 1st, the last window of a year is short, and windows never span
/// a year edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKey {
    Day { year: i32, ordinal: u32 },
    Week { year: i32, index: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    /// Key of the window containing `at` for the given frequency.
    ///
    /// `at` must already carry the grace shift; this function does no
    /// shifting of its own.
    pub fn of(at: DateTime<Utc>, frequency: HabitFrequency) -> Self {
        let date = at.date_naive();
        match frequency {
            HabitFrequency::Daily => PeriodKey::Day {
                year: date.year(),
                ordinal: date.ordinal(),
            },
            HabitFrequency::Weekly => PeriodKey::Week {
                year: date.year(),
                index: date.ordinal0() / 7,
            },
            HabitFrequency::Monthly => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }
}
