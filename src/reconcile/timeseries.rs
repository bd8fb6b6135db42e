use crate::period::{DateInterval, ReportingZone};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

const LOG_TARGET: &str = " timeseries";

/// Timestamp layouts accepted when the upstream omits a UTC offset.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// A single occurrence, as wall-clock time in the reporting zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RawEvent {
    pub timestamp: NaiveDateTime,
}

impl RawEvent {
    #[must_use]
    pub const fn new(timestamp: NaiveDateTime) -> Self {
        Self { timestamp }
    }

    /// Parse an upstream timestamp, returning `None` for anything unrecognizable.
    #[must_use]
    pub fn parse(text: &str, zone: ReportingZone) -> Option<Self> {
        parse_timestamp(text, zone).map(Self::new)
    }
}

/// The count for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub count: u64,
}

/// Bucket events per calendar day and pad the result to cover every day of `interval`.
///
/// Events outside the interval are dropped even when the upstream returned them, since
/// some upstream filters only bound the start. The output has exactly one bucket per day,
/// in ascending order, with zero for days that saw no events.
#[must_use]
pub fn reconcile(events: impl IntoIterator<Item = RawEvent>, interval: &DateInterval) -> Vec<DayBucket> {
    pad_daily(events.into_iter().map(|event| (event.timestamp.date(), 1)), interval)
}

/// Pad pre-counted per-day values to cover every day of `interval`.
///
/// Values for the same day are summed and values for days outside the interval are dropped.
#[must_use]
pub fn pad_daily(points: impl IntoIterator<Item = (NaiveDate, u64)>, interval: &DateInterval) -> Vec<DayBucket> {
    let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
    let mut dropped = 0_usize;

    for (date, count) in points {
        if interval.contains_day(date) {
            let total = counts.entry(date).or_insert(0);
            *total = total.saturating_add(count);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        log::debug!(target: LOG_TARGET, "Dropped {dropped} point(s) outside {} ..= {}", interval.start(), interval.end());
    }

    interval
        .days()
        .map(|date| DayBucket {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Parse an upstream timestamp into wall-clock time in `zone`.
///
/// Offset-bearing timestamps are converted into the zone, timestamps without an offset are
/// taken to already be zone-local, and a bare date means its midnight.
#[must_use]
pub fn parse_timestamp(text: &str, zone: ReportingZone) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Some(zone.wall_clock(with_offset.with_timezone(&Utc)));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
