use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Affirmative token used by the records store for yes/no text fields.
pub const DEFAULT_AFFIRMATIVE_TOKEN: &str = "ja";

/// Total record count and how many of those records carry the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrationSummary {
    pub total: u64,
    pub flagged_count: u64,
}

/// Normalizes a yes/no field that may arrive as a boolean or as free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagExtractor {
    field: String,
    affirmative: String,
}

impl FlagExtractor {
    #[must_use]
    pub fn new(field: impl Into<String>, affirmative: &str) -> Self {
        Self {
            field: field.into(),
            affirmative: affirmative.to_lowercase(),
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Whether a raw value means "flagged".
    ///
    /// Booleans pass through, strings match the affirmative token case-insensitively, and
    /// anything else (absent, null, numbers, objects) is not flagged.
    #[must_use]
    pub fn is_flagged(&self, value: Option<&Value>) -> bool {
        match value {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => text.to_lowercase() == self.affirmative,
            _ => false,
        }
    }

    /// Look up the extractor's field in a raw record and normalize it.
    #[must_use]
    pub fn extract(&self, record: &serde_json::Map<String, Value>) -> bool {
        self.is_flagged(record.get(&self.field))
    }
}

/// Count records and the subset for which `is_flagged` holds.
#[must_use]
pub fn summarize<R>(records: impl IntoIterator<Item = R>, is_flagged: impl Fn(&R) -> bool) -> RegistrationSummary {
    records.into_iter().fold(RegistrationSummary::default(), |mut summary, record| {
        summary.total += 1;
        if is_flagged(&record) {
            summary.flagged_count += 1;
        }
        summary
    })
}
