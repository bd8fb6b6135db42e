use crate::period::DateInterval;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Window lengths the analytics provider understands as named periods.
///
/// A named period covers its `date` and the days before it: `7d` on `date` is
/// `date-6 ..= date` and `30d` is `date-29 ..= date`, so it is only sent when the
/// interval has exactly that shape. Any other length goes out as `custom`.
const NATIVE_PERIODS: &[(u64, &str)] = &[(7, "7d"), (30, "30d")];

/// Translate an interval into the analytics provider's `period` and `date` parameters.
///
/// Single days use the `day` period, a few fixed window lengths use their symbolic name
/// anchored on the interval's last day, and everything else becomes an explicit
/// `custom` range of `start,end`.
pub fn period_params(interval: &DateInterval) -> Vec<(String, String)> {
    let end = interval.end().format(DATE_FORMAT).to_string();
    let day_count = interval.day_count();

    if day_count == 1 {
        return vec![("period".into(), "day".into()), ("date".into(), end)];
    }

    if let Some((_, name)) = NATIVE_PERIODS.iter().find(|(days, _)| *days == day_count) {
        return vec![("period".into(), (*name).into()), ("date".into(), end)];
    }

    let start = interval.start().format(DATE_FORMAT);
    vec![("period".into(), "custom".into()), ("date".into(), format!("{start},{end}"))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{FixedClock, PeriodToken, ReportingZone, resolve_with};
    use chrono::{Days, NaiveDate};
    use strum::IntoEnumIterator;

    fn interval(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateInterval {
        DateInterval::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
        .unwrap()
    }

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_single_day_uses_day_period() {
        let params = period_params(&interval((2024, 3, 30), (2024, 3, 30)));
        assert_eq!(pairs(&params), vec![("period", "day"), ("date", "2024-03-30")]);
    }

    #[test]
    fn test_seven_days_is_native() {
        let params = period_params(&interval((2024, 3, 25), (2024, 3, 31)));
        assert_eq!(pairs(&params), vec![("period", "7d"), ("date", "2024-03-31")]);
    }

    #[test]
    fn test_thirty_days_is_native() {
        let params = period_params(&interval((2024, 3, 2), (2024, 3, 31)));
        assert_eq!(pairs(&params), vec![("period", "30d"), ("date", "2024-03-31")]);
    }

    #[test]
    fn test_fourteen_days_falls_back_to_custom_range() {
        let params = period_params(&interval((2024, 3, 18), (2024, 3, 31)));
        assert_eq!(pairs(&params), vec![("period", "custom"), ("date", "2024-03-18,2024-03-31")]);
    }

    #[test]
    fn test_year_falls_back_to_custom_range() {
        let params = period_params(&interval((2023, 4, 2), (2024, 3, 31)));
        assert_eq!(pairs(&params), vec![("period", "custom"), ("date", "2023-04-02,2024-03-31")]);
    }

    #[test]
    fn test_named_periods_cover_the_exact_resolved_window() {
        let clock = FixedClock::on_day(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());

        for token in PeriodToken::iter() {
            let interval = resolve_with(token, &clock, ReportingZone::Utc);
            let params = period_params(&interval);
            let (period, date) = (params[0].1.as_str(), params[1].1.as_str());

            let window = match period {
                "day" => 1,
                "7d" => 7,
                "30d" => 30,
                "custom" => {
                    assert_eq!(date, format!("{},{}", interval.start(), interval.end()), "{token}");
                    continue;
                }
                other => panic!("unexpected period '{other}' for {token}"),
            };

            let end = NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap();
            assert_eq!(end, interval.end(), "{token}");
            assert_eq!(end - Days::new(window - 1), interval.start(), "{token}");
        }
    }
}
