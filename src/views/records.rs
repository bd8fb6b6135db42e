use crate::fetch::Payload;
use crate::period::{DateInterval, ReportingZone};
use crate::reconcile::{FlagExtractor, parse_timestamp};
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A records-store item with whatever fields were selected.
pub type RawRecord = Map<String, Value>;

/// `{data: [...]}`
#[derive(Debug, Deserialize)]
pub struct RecordsEnvelope<T> {
    pub data: Vec<T>,
}

impl<T: DeserializeOwned + Send> Payload for RecordsEnvelope<T> {
    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A customer registration as shown in the recent registrations list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub created_at: Option<NaiveDateTime>,

    /// The normalized yes/no flag
    pub flagged: bool,

    pub financing: Option<String>,

    /// Keys of the units the customer pinned
    pub favourites: Vec<String>,
}

impl Registration {
    /// Pick the known fields out of a raw record, tolerating missing and mistyped ones.
    #[must_use]
    pub fn from_record(record: &RawRecord, timestamp_field: &str, zone: ReportingZone, flag: &FlagExtractor) -> Self {
        let text = |field: &str| record.get(field).and_then(Value::as_str).map(str::to_string);

        Self {
            id: record.get("id").and_then(key_string),
            first_name: text("first_name"),
            last_name: text("last_name"),
            email: text("email"),
            phone_number: text("phone_number"),
            created_at: record_timestamp(record, timestamp_field, zone),
            flagged: flag.extract(record),
            financing: text("financing"),
            favourites: record
                .get("favourites")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(key_string).collect())
                .unwrap_or_default(),
        }
    }
}

/// Render an identifier-like value as a string key.
///
/// Text is used as-is and numbers are formatted; empty text and any other shape yield `None`.
#[must_use]
pub fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// The record's timestamp as wall-clock time in `zone`, if present and parseable.
#[must_use]
pub fn record_timestamp(record: &RawRecord, field: &str, zone: ReportingZone) -> Option<NaiveDateTime> {
    record
        .get(field)
        .and_then(Value::as_str)
        .and_then(|text| parse_timestamp(text, zone))
}

/// Whether a record may be counted for `interval`.
///
/// Upstream filters only bound the start of the window, so a record whose timestamp falls
/// outside the interval is rejected here. Records without a readable timestamp are kept.
#[must_use]
pub fn within_interval(record: &RawRecord, field: &str, zone: ReportingZone, interval: &DateInterval) -> bool {
    record_timestamp(record, field, zone).is_none_or(|ts| interval.contains(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        map
    }

    #[test]
    fn test_envelope_emptiness() {
        let empty: RecordsEnvelope<RawRecord> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(empty.is_empty());

        let full: RecordsEnvelope<RawRecord> = serde_json::from_str(r#"{"data":[{"unit_id":1}]}"#).unwrap();
        assert!(!full.is_empty());
    }

    #[test]
    fn test_envelope_without_data_is_malformed() {
        assert!(serde_json::from_str::<RecordsEnvelope<RawRecord>>(r#"{"errors":[]}"#).is_err());
    }

    #[test]
    fn test_key_string() {
        assert_eq!(key_string(&json!("172")), Some("172".to_string()));
        assert_eq!(key_string(&json!(172)), Some("172".to_string()));
        assert_eq!(key_string(&json!("")), None);
        assert_eq!(key_string(&json!(null)), None);
        assert_eq!(key_string(&json!([1])), None);
    }

    #[test]
    fn test_registration_from_record() {
        let flag = FlagExtractor::new("nautical", "ja");
        let raw = record(json!({
            "id": 17,
            "first_name": "Anne",
            "last_name": "de Vries",
            "email": "anne@example.com",
            "phone_number": "0612345678",
            "created_at": "2024-03-14T09:30:00Z",
            "nautical": "JA",
            "financing": "own",
            "favourites": [172, "10", null],
            "newsletter": true
        }));

        let registration = Registration::from_record(&raw, "created_at", ReportingZone::Utc, &flag);
        assert_eq!(registration.id.as_deref(), Some("17"));
        assert_eq!(registration.last_name.as_deref(), Some("de Vries"));
        assert!(registration.flagged);
        assert_eq!(
            registration.created_at,
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(9, 30, 0)
        );
        assert_eq!(registration.favourites, vec!["172".to_string(), "10".to_string()]);
    }

    #[test]
    fn test_registration_tolerates_sparse_record() {
        let flag = FlagExtractor::new("nautical", "ja");
        let registration = Registration::from_record(&record(json!({"email": 5})), "created_at", ReportingZone::Utc, &flag);
        assert_eq!(registration.id, None);
        assert_eq!(registration.email, None);
        assert_eq!(registration.created_at, None);
        assert!(!registration.flagged);
        assert!(registration.favourites.is_empty());
    }

    #[test]
    fn test_within_interval() {
        let interval = DateInterval::new(
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap();

        assert!(within_interval(&record(json!({"created_at": "2024-03-31T23:59:59"})), "created_at", ReportingZone::Utc, &interval));
        assert!(!within_interval(&record(json!({"created_at": "2024-04-01T00:00:00"})), "created_at", ReportingZone::Utc, &interval));
        assert!(within_interval(&record(json!({"unit_id": 3})), "created_at", ReportingZone::Utc, &interval));
    }

    #[test]
    fn test_within_interval_uses_zone_day() {
        let interval = DateInterval::single_day(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        let late_utc = record(json!({"created_at": "2024-03-31T23:30:00Z"}));
        let zone = ReportingZone::Fixed(chrono::FixedOffset::east_opt(2 * 3600).unwrap());

        assert!(within_interval(&late_utc, "created_at", zone, &interval));
        assert!(!within_interval(&late_utc, "created_at", ReportingZone::Utc, &interval));
    }
}
