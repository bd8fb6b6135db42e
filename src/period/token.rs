use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

const LOG_TARGET: &str = "    period";

/// A symbolic reporting window selected by the caller.
///
/// Every window ends on "today" except [`PeriodToken::Yesterday`], and every window is
/// measured in whole calendar days.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
pub enum PeriodToken {
    #[strum(serialize = "today")]
    #[serde(rename = "today")]
    Today,

    #[strum(serialize = "yesterday")]
    #[serde(rename = "yesterday")]
    Yesterday,

    #[default]
    #[strum(serialize = "7d")]
    #[serde(rename = "7d")]
    SevenDays,

    #[strum(serialize = "14d")]
    #[serde(rename = "14d")]
    FourteenDays,

    #[strum(serialize = "30d")]
    #[serde(rename = "30d")]
    ThirtyDays,

    #[strum(serialize = "90d")]
    #[serde(rename = "90d")]
    NinetyDays,

    #[strum(serialize = "1y")]
    #[serde(rename = "1y")]
    OneYear,
}

impl PeriodToken {
    /// Parse a token, falling back to the 7-day window for anything unrecognized.
    ///
    /// Unknown tokens are not an error for callers of the view API. The fallback is
    /// logged so that a misbehaving caller still shows up in diagnostics.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        text.trim().parse().unwrap_or_else(|_| {
            log::warn!(target: LOG_TARGET, "Unrecognized period '{text}', using the default 7-day window");
            Self::default()
        })
    }

    /// Number of days between the window's first day and "today", and between its last day and "today".
    #[must_use]
    pub const fn day_offsets(self) -> (u64, u64) {
        match self {
            Self::Today => (0, 0),
            Self::Yesterday => (1, 1),
            Self::SevenDays => (6, 0),
            Self::FourteenDays => (13, 0),
            Self::ThirtyDays => (29, 0),
            Self::NinetyDays => (89, 0),
            Self::OneYear => (364, 0),
        }
    }

    /// Number of calendar days covered by the window.
    #[must_use]
    pub const fn day_count(self) -> u64 {
        let (start, end) = self.day_offsets();
        start - end + 1
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_known_tokens() {
        assert_eq!("today".parse::<PeriodToken>().unwrap(), PeriodToken::Today);
        assert_eq!("yesterday".parse::<PeriodToken>().unwrap(), PeriodToken::Yesterday);
        assert_eq!("7d".parse::<PeriodToken>().unwrap(), PeriodToken::SevenDays);
        assert_eq!("14d".parse::<PeriodToken>().unwrap(), PeriodToken::FourteenDays);
        assert_eq!("30d".parse::<PeriodToken>().unwrap(), PeriodToken::ThirtyDays);
        assert_eq!("90d".parse::<PeriodToken>().unwrap(), PeriodToken::NinetyDays);
        assert_eq!("1y".parse::<PeriodToken>().unwrap(), PeriodToken::OneYear);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert!("3d".parse::<PeriodToken>().is_err());
        assert!("all".parse::<PeriodToken>().is_err());
        assert!("".parse::<PeriodToken>().is_err());
    }

    #[test]
    fn test_parse_lenient_defaults_to_seven_days() {
        assert_eq!(PeriodToken::parse_lenient("3d"), PeriodToken::SevenDays);
        assert_eq!(PeriodToken::parse_lenient("all"), PeriodToken::SevenDays);
        assert_eq!(PeriodToken::parse_lenient(""), PeriodToken::SevenDays);
    }

    #[test]
    fn test_parse_lenient_accepts_known_with_whitespace() {
        assert_eq!(PeriodToken::parse_lenient(" 30d "), PeriodToken::ThirtyDays);
    }

    #[test]
    fn test_display_round_trips() {
        for token in PeriodToken::iter() {
            assert_eq!(token.to_string().parse::<PeriodToken>().unwrap(), token);
            assert_eq!(token.as_str(), token.to_string());
        }
    }

    #[test]
    fn test_day_counts() {
        assert_eq!(PeriodToken::Today.day_count(), 1);
        assert_eq!(PeriodToken::Yesterday.day_count(), 1);
        assert_eq!(PeriodToken::SevenDays.day_count(), 7);
        assert_eq!(PeriodToken::FourteenDays.day_count(), 14);
        assert_eq!(PeriodToken::ThirtyDays.day_count(), 30);
        assert_eq!(PeriodToken::NinetyDays.day_count(), 90);
        assert_eq!(PeriodToken::OneYear.day_count(), 365);
    }

    #[test]
    fn test_serde_uses_short_names() {
        let json = serde_json::to_string(&PeriodToken::ThirtyDays).unwrap();
        assert_eq!(json, "\"30d\"");
        let token: PeriodToken = serde_json::from_str("\"1y\"").unwrap();
        assert_eq!(token, PeriodToken::OneYear);
    }
}
