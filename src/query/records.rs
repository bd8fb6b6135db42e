use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Timestamp layout the records provider expects in range filters.
pub const FILTER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// How a records endpoint wants its filter expressed.
///
/// The upstream has historically accepted both shapes, and different routes prefer
/// different ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FilterStyle {
    /// `filter[field][_gte]=value`
    #[default]
    Bracketed,

    /// `filter={"field":{"_gte":"value"}}`
    Json,
}

/// A lower-bound filter on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFilter {
    field: String,
    since: String,
}

impl RangeFilter {
    pub(super) fn new(field: impl Into<String>, since: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            since: since.into(),
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn since(&self) -> &str {
        &self.since
    }

    /// Render the filter as a query parameter in the given style.
    #[must_use]
    pub fn to_param(&self, style: FilterStyle) -> (String, String) {
        match style {
            FilterStyle::Bracketed => (format!("filter[{}][_gte]", self.field), self.since.clone()),
            FilterStyle::Json => {
                let mut bound = serde_json::Map::new();
                let _ = bound.insert("_gte".into(), serde_json::Value::String(self.since.clone()));

                let mut filter = serde_json::Map::new();
                let _ = filter.insert(self.field.clone(), serde_json::Value::Object(bound));

                ("filter".into(), serde_json::Value::Object(filter).to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_param() {
        let filter = RangeFilter::new("created_at", "2024-03-02T00:00:00");
        let (key, value) = filter.to_param(FilterStyle::Bracketed);
        assert_eq!(key, "filter[created_at][_gte]");
        assert_eq!(value, "2024-03-02T00:00:00");
    }

    #[test]
    fn test_json_param() {
        let filter = RangeFilter::new("created_at", "2024-03-02T00:00:00");
        let (key, value) = filter.to_param(FilterStyle::Json);
        assert_eq!(key, "filter");

        let parsed: serde_json::Value = serde_json::from_str(&value).unwrap();
        assert_eq!(parsed["created_at"]["_gte"], "2024-03-02T00:00:00");
    }

    #[test]
    fn test_filter_style_names() {
        assert_eq!("json".parse::<FilterStyle>().unwrap(), FilterStyle::Json);
        assert_eq!(FilterStyle::Bracketed.to_string(), "bracketed");

        let style: FilterStyle = serde_yaml::from_str("json").unwrap();
        assert_eq!(style, FilterStyle::Json);
    }
}
