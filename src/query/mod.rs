//! Provider-specific query shaping
//!
//! The two upstream providers disagree on how a reporting window is expressed. The
//! analytics provider takes a named period (or an explicit `start,end` range when it has
//! no name for the window), while the records provider takes a lower-bound filter on a
//! timestamp field in one of two syntaxes. [`build`] hides all of that so that callers
//! only deal in [`DateInterval`]s.

mod analytics;
mod records;

pub use records::{FILTER_TIMESTAMP_FORMAT, FilterStyle, RangeFilter};

use crate::period::DateInterval;

/// The upstream a request is shaped for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    /// Aggregate web analytics.
    Analytics,

    /// The records store, filtered on the given timestamp field.
    Records { timestamp_field: String },
}

/// A provider-native set of query parameters for one reporting window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    params: Vec<(String, String)>,
    range_filter: Option<RangeFilter>,
}

impl ProviderRequest {
    /// Append a provider parameter unrelated to the reporting window.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// The lower-bound filter, for providers that take one.
    #[must_use]
    pub const fn range_filter(&self) -> Option<&RangeFilter> {
        self.range_filter.as_ref()
    }

    /// Render the complete query string parameters for an endpoint using the given filter style.
    ///
    /// The style only matters for requests carrying a range filter.
    #[must_use]
    pub fn query(&self, style: FilterStyle) -> Vec<(String, String)> {
        let mut query = self.params.clone();
        if let Some(filter) = &self.range_filter {
            query.push(filter.to_param(style));
        }
        query
    }
}

/// Shape a request for `interval` in the vocabulary of the given provider.
#[must_use]
pub fn build(interval: &DateInterval, provider: &ProviderKind) -> ProviderRequest {
    match provider {
        ProviderKind::Analytics => ProviderRequest {
            params: analytics::period_params(interval),
            range_filter: None,
        },
        ProviderKind::Records { timestamp_field } => {
            let since = interval.start_of_range().format(FILTER_TIMESTAMP_FORMAT).to_string();
            ProviderRequest {
                params: Vec::new(),
                range_filter: Some(RangeFilter::new(timestamp_field.as_str(), since)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn thirty_days() -> DateInterval {
        DateInterval::new(
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap()
    }

    fn records() -> ProviderKind {
        ProviderKind::Records {
            timestamp_field: "created_at".into(),
        }
    }

    #[test]
    fn test_records_request_filters_on_start_of_first_day() {
        let request = build(&thirty_days(), &records());
        let filter = request.range_filter().unwrap();
        assert_eq!(filter.field(), "created_at");
        assert_eq!(filter.since(), "2024-03-02T00:00:00");
    }

    #[test]
    fn test_records_query_in_both_styles() {
        let request = build(&thirty_days(), &records()).with_param("fields", "id,nautical");

        let bracketed = request.query(FilterStyle::Bracketed);
        assert_eq!(bracketed[0], ("fields".to_string(), "id,nautical".to_string()));
        assert_eq!(
            bracketed[1],
            ("filter[created_at][_gte]".to_string(), "2024-03-02T00:00:00".to_string())
        );

        let json = request.query(FilterStyle::Json);
        assert_eq!(json[1].0, "filter");
        assert!(json[1].1.contains("\"_gte\":\"2024-03-02T00:00:00\""));
    }

    #[test]
    fn test_analytics_request_ignores_filter_style() {
        let request = build(&thirty_days(), &ProviderKind::Analytics).with_param("site_id", "example.com");
        assert!(request.range_filter().is_none());
        assert_eq!(request.query(FilterStyle::Bracketed), request.query(FilterStyle::Json));
        assert!(request.query(FilterStyle::Json).contains(&("period".to_string(), "30d".to_string())));
    }
}
