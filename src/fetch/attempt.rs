use core::fmt;
use core::time::Duration;
use serde::Serialize;

/// Why a single candidate did not produce a usable payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AttemptFailure {
    /// The request never produced a response (connection, TLS, body read).
    Transport(String),

    /// The candidate did not answer within the per-candidate timeout (milliseconds).
    TimedOut(u64),

    /// The upstream answered with a non-success status code.
    Status(u16),

    /// The body could not be decoded into the expected shape.
    Malformed(String),

    /// The body decoded but carried no data where data is required.
    Empty,
}

impl AttemptFailure {
    pub(super) fn timed_out(after: Duration) -> Self {
        Self::TimedOut(u64::try_from(after.as_millis()).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(reason) => write!(f, "transport error: {reason}"),
            Self::TimedOut(ms) => write!(f, "timed out after {ms}ms"),
            Self::Status(code) => write!(f, "unexpected HTTP status {code}"),
            Self::Malformed(reason) => write!(f, "malformed response: {reason}"),
            Self::Empty => write!(f, "empty response"),
        }
    }
}

/// Diagnostic record of one candidate being tried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchAttempt {
    pub strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<AttemptFailure>,
}

impl FetchAttempt {
    pub(crate) fn succeeded(strategy: &str) -> Self {
        Self {
            strategy: strategy.to_string(),
            failure: None,
        }
    }

    pub(crate) fn failed(strategy: &str, failure: AttemptFailure) -> Self {
        Self {
            strategy: strategy.to_string(),
            failure: Some(failure),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for FetchAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => write!(f, "{}: ok", self.strategy),
            Some(failure) => write!(f, "{}: {failure}", self.strategy),
        }
    }
}

/// Every candidate for a query failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllFailed {
    pub query: String,
    pub attempts: Vec<FetchAttempt>,
}

impl fmt::Display for AllFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attempts.is_empty() {
            return write!(f, "no candidates configured for '{}'", self.query);
        }

        write!(f, "all {} candidate(s) for '{}' failed", self.attempts.len(), self.query)?;
        for attempt in &self.attempts {
            write!(f, "; {attempt}")?;
        }
        Ok(())
    }
}

impl core::error::Error for AllFailed {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_out_records_milliseconds() {
        assert_eq!(AttemptFailure::timed_out(Duration::from_secs(2)), AttemptFailure::TimedOut(2000));
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(AttemptFailure::Status(503).to_string(), "unexpected HTTP status 503");
        assert_eq!(AttemptFailure::Empty.to_string(), "empty response");
    }

    #[test]
    fn test_all_failed_lists_every_attempt() {
        let err = AllFailed {
            query: "top_units".into(),
            attempts: vec![
                FetchAttempt::failed("items", AttemptFailure::Status(404)),
                FetchAttempt::failed("collections", AttemptFailure::Empty),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("all 2 candidate(s) for 'top_units' failed"));
        assert!(text.contains("items: unexpected HTTP status 404"));
        assert!(text.contains("collections: empty response"));
    }

    #[test]
    fn test_all_failed_without_candidates() {
        let err = AllFailed {
            query: "metrics".into(),
            attempts: Vec::new(),
        };
        assert_eq!(err.to_string(), "no candidates configured for 'metrics'");
    }

    #[test]
    fn test_attempt_serialization() {
        let attempt = FetchAttempt::failed("primary", AttemptFailure::Status(500));
        let json = serde_json::to_value(&attempt).unwrap();
        assert_eq!(json["strategy"], "primary");
        assert_eq!(json["failure"]["kind"], "status");
        assert_eq!(json["failure"]["detail"], 500);

        let ok = serde_json::to_value(FetchAttempt::succeeded("primary")).unwrap();
        assert!(ok.get("failure").is_none());
    }
}
