use crate::Result;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, Utc};
use core::fmt;
use core::str::FromStr;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};

/// The time zone whose calendar days reports are cut on.
///
/// Written in configuration as `local`, `utc`, or a fixed offset such as `+02:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReportingZone {
    /// The host's zone, with its offset looked up per instant so DST transitions apply
    #[default]
    Local,

    Utc,

    Fixed(FixedOffset),
}

impl ReportingZone {
    /// The zone's UTC offset at `instant`.
    #[must_use]
    pub fn offset_at(self, instant: DateTime<Utc>) -> FixedOffset {
        match self {
            Self::Local => instant.with_timezone(&Local).offset().fix(),
            Self::Utc => Utc.fix(),
            Self::Fixed(offset) => offset,
        }
    }

    /// `instant` as seen on a wall clock in this zone.
    #[must_use]
    pub fn localize(self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset_at(instant))
    }

    #[must_use]
    pub fn wall_clock(self, instant: DateTime<Utc>) -> NaiveDateTime {
        self.localize(instant).naive_local()
    }
}

impl FromStr for ReportingZone {
    type Err = ohno::AppError;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }

        if text.eq_ignore_ascii_case("utc") || text == "Z" {
            return Ok(Self::Utc);
        }

        text.parse::<FixedOffset>()
            .map(Self::Fixed)
            .into_app_err_with(|| format!("invalid time zone '{text}': expected 'local', 'utc', or an offset such as '+02:00'"))
    }
}

impl TryFrom<String> for ReportingZone {
    type Error = ohno::AppError;

    fn try_from(text: String) -> Result<Self> {
        text.parse()
    }
}

impl From<ReportingZone> for String {
    fn from(zone: ReportingZone) -> Self {
        zone.to_string()
    }
}

impl fmt::Display for ReportingZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Utc => write!(f, "utc"),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}
