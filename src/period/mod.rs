//! Reporting period resolution
//!
//! Maps a symbolic [`PeriodToken`] onto a concrete [`DateInterval`] of calendar days,
//! anchored to the instant supplied by a [`Clock`]. Nothing is memoized: every call reads
//! the clock again so that a long-lived process keeps producing current windows.
//!
//! "Today" is the calendar day of that instant in the [`ReportingZone`], not in UTC.

mod clock;
mod interval;
mod token;
mod zone;

pub use clock::{Clock, FixedClock, SystemClock};
pub use interval::DateInterval;
pub use token::PeriodToken;
pub use zone::ReportingZone;

use chrono::{DateTime, Days, NaiveDate, TimeZone};

/// Resolve a period against the given instant, using the calendar day it falls on in its own zone.
#[must_use]
pub fn resolve<Tz: TimeZone>(token: PeriodToken, now: &DateTime<Tz>) -> DateInterval {
    resolve_on(token, now.date_naive())
}

/// Resolve a period against the current instant of `clock`, as seen in `zone`.
#[must_use]
pub fn resolve_with(token: PeriodToken, clock: &impl Clock, zone: ReportingZone) -> DateInterval {
    resolve(token, &zone.localize(clock.now()))
}

fn resolve_on(token: PeriodToken, today: NaiveDate) -> DateInterval {
    let (start_back, end_back) = token.day_offsets();
    let start = today.checked_sub_days(Days::new(start_back)).unwrap_or(NaiveDate::MIN);
    let end = today.checked_sub_days(Days::new(end_back)).unwrap_or(NaiveDate::MIN);

    // offsets are ordered so start <= end always holds
    DateInterval::new(start, end).unwrap_or_else(|_| DateInterval::single_day(end))
}
