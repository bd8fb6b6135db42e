use crate::fetch::Payload;
use crate::period::DateInterval;
use crate::reconcile::{DayBucket, RankedEntry, pad_daily, rank_counts};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter};

/// Metrics requested from the aggregate endpoint.
pub(super) const AGGREGATE_METRICS: &str = "pageviews,visitors,bounce_rate,visit_duration";

/// Metrics requested from the timeseries endpoint.
pub(super) const TIMESERIES_METRICS: &str = "visitors,pageviews";

/// Metric counted by the breakdown endpoint.
pub(super) const BREAKDOWN_METRIC: &str = "visitors";

/// Site-wide totals for a reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsMetrics {
    pub pageviews: u64,
    pub visitors: u64,

    /// Percentage of single-page visits
    pub bounce_rate: f64,

    /// Mean visit length in seconds
    pub visit_duration: f64,
}

/// Gapless per-day visitor and pageview counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficSeries {
    pub visitors: Vec<DayBucket>,
    pub pageviews: Vec<DayBucket>,
}

impl TrafficSeries {
    /// An all-zero series covering `interval`.
    #[must_use]
    pub fn zeroed(interval: &DateInterval) -> Self {
        Self {
            visitors: pad_daily([], interval),
            pageviews: pad_daily([], interval),
        }
    }
}

/// Visit property a breakdown is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize, ValueEnum)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BreakdownProperty {
    /// Desktop, mobile, tablet, ...
    Device,

    /// Browser family
    Browser,
}

impl BreakdownProperty {
    /// Name of the property in the analytics query language.
    #[must_use]
    pub const fn query_name(self) -> &'static str {
        match self {
            Self::Device => "visit:device",
            Self::Browser => "visit:browser",
        }
    }

    /// Field carrying the group name in breakdown rows.
    #[must_use]
    pub const fn result_field(self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Browser => "browser",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct MetricValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct AggregateResults {
    pageviews: MetricValue<u64>,
    visitors: MetricValue<u64>,
    bounce_rate: MetricValue<f64>,
    visit_duration: MetricValue<f64>,
}

/// `{results: {pageviews: {value}, ...}}`
#[derive(Debug, Deserialize)]
pub(super) struct AggregateEnvelope {
    results: AggregateResults,
}

impl Payload for AggregateEnvelope {
    fn is_empty(&self) -> bool {
        false
    }
}

impl From<AggregateEnvelope> for AnalyticsMetrics {
    fn from(envelope: AggregateEnvelope) -> Self {
        let results = envelope.results;
        Self {
            pageviews: results.pageviews.value,
            visitors: results.visitors.value,
            bounce_rate: results.bounce_rate.value,
            visit_duration: results.visit_duration.value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TimeseriesPoint {
    date: NaiveDate,
    #[serde(default)]
    visitors: Option<u64>,
    #[serde(default)]
    pageviews: Option<u64>,
}

/// `{results: [{date, visitors, pageviews}]}`
#[derive(Debug, Deserialize)]
pub(super) struct TimeseriesEnvelope {
    results: Vec<TimeseriesPoint>,
}

impl Payload for TimeseriesEnvelope {
    fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl TimeseriesEnvelope {
    pub(super) fn into_series(self, interval: &DateInterval) -> TrafficSeries {
        let visitors = self.results.iter().map(|p| (p.date, p.visitors.unwrap_or(0)));
        let pageviews = self.results.iter().map(|p| (p.date, p.pageviews.unwrap_or(0)));

        TrafficSeries {
            visitors: pad_daily(visitors, interval),
            pageviews: pad_daily(pageviews, interval),
        }
    }
}

/// `{results: [{<property>: name, visitors: n}]}`
#[derive(Debug, Deserialize)]
pub(super) struct BreakdownEnvelope {
    results: Vec<Map<String, Value>>,
}

impl Payload for BreakdownEnvelope {
    fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl BreakdownEnvelope {
    pub(super) fn rank(&self, property: BreakdownProperty, limit: usize) -> Vec<RankedEntry> {
        let rows = self.results.iter().filter_map(|row| {
            let name = row.get(property.result_field()).and_then(Value::as_str)?;
            let count = row.get(BREAKDOWN_METRIC).and_then(Value::as_u64).unwrap_or(0);
            Some((name, count))
        });

        rank_counts(rows, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_aggregate_envelope_decodes() {
        let json = r#"{"results":{"pageviews":{"value":1200},"visitors":{"value":310},"bounce_rate":{"value":42.5},"visit_duration":{"value":95}}}"#;
        let envelope: AggregateEnvelope = serde_json::from_str(json).unwrap();
        let metrics = AnalyticsMetrics::from(envelope);
        assert_eq!(metrics.pageviews, 1200);
        assert_eq!(metrics.visitors, 310);
        assert!((metrics.bounce_rate - 42.5).abs() < f64::EPSILON);
        assert!((metrics.visit_duration - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_envelope_requires_every_metric() {
        let json = r#"{"results":{"pageviews":{"value":1}}}"#;
        assert!(serde_json::from_str::<AggregateEnvelope>(json).is_err());
    }

    #[test]
    fn test_timeseries_is_padded_and_clipped() {
        let json = r#"{"results":[
            {"date":"2024-03-01","visitors":99,"pageviews":99},
            {"date":"2024-03-03","visitors":4,"pageviews":9},
            {"date":"2024-03-04","visitors":null,"pageviews":2}
        ]}"#;
        let envelope: TimeseriesEnvelope = serde_json::from_str(json).unwrap();
        let interval = DateInterval::new(date(2024, 3, 2), date(2024, 3, 5)).unwrap();

        let series = envelope.into_series(&interval);
        let visitors: Vec<u64> = series.visitors.iter().map(|b| b.count).collect();
        let pageviews: Vec<u64> = series.pageviews.iter().map(|b| b.count).collect();
        assert_eq!(visitors, vec![0, 4, 0, 0]);
        assert_eq!(pageviews, vec![0, 9, 2, 0]);
    }

    #[test]
    fn test_zeroed_series_covers_interval() {
        let interval = DateInterval::new(date(2024, 2, 28), date(2024, 3, 1)).unwrap();
        let series = TrafficSeries::zeroed(&interval);
        assert_eq!(series.visitors.len(), 3);
        assert_eq!(series.pageviews.len(), 3);
        assert!(series.visitors.iter().chain(&series.pageviews).all(|b| b.count == 0));
    }

    #[test]
    fn test_breakdown_ranks_by_visitors() {
        let json = r#"{"results":[
            {"device":"Tablet","visitors":3},
            {"device":"Desktop","visitors":40},
            {"device":"Mobile","visitors":40},
            {"browser":"Chrome","visitors":500},
            {"device":"Laptop","visitors":1}
        ]}"#;
        let envelope: BreakdownEnvelope = serde_json::from_str(json).unwrap();

        let ranked = envelope.rank(BreakdownProperty::Device, 3);
        assert_eq!(
            ranked,
            vec![
                RankedEntry::new("Desktop", 40),
                RankedEntry::new("Mobile", 40),
                RankedEntry::new("Tablet", 3)
            ]
        );

        let browsers = envelope.rank(BreakdownProperty::Browser, 3);
        assert_eq!(browsers, vec![RankedEntry::new("Chrome", 500)]);
    }

    #[test]
    fn test_breakdown_property_names() {
        assert_eq!(BreakdownProperty::Device.query_name(), "visit:device");
        assert_eq!(BreakdownProperty::Browser.result_field(), "browser");
        assert_eq!(BreakdownProperty::Browser.to_string(), "browser");
    }
}
