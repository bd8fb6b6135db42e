use super::FetchAttempt;
use serde::Serialize;

/// Where the data in a [`Report`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportSource {
    /// A live upstream answer from the named strategy.
    Live {
        strategy: String,

        /// Candidates that failed before `strategy` answered
        #[serde(skip_serializing_if = "Vec::is_empty")]
        attempts: Vec<FetchAttempt>,
    },

    /// Every strategy failed and the declared fallback payload was substituted.
    Degraded { attempts: Vec<FetchAttempt> },
}

/// A view result that is always renderable, with a marker for degraded data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<T> {
    pub data: T,
    pub source: ReportSource,
}

impl<T> Report<T> {
    #[must_use]
    pub fn live(data: T, strategy: impl Into<String>) -> Self {
        Self {
            data,
            source: ReportSource::Live {
                strategy: strategy.into(),
                attempts: Vec::new(),
            },
        }
    }

    /// A live answer that was only reached after the `failed` candidates.
    #[must_use]
    pub fn live_after(data: T, strategy: impl Into<String>, failed: Vec<FetchAttempt>) -> Self {
        Self {
            data,
            source: ReportSource::Live {
                strategy: strategy.into(),
                attempts: failed,
            },
        }
    }

    #[must_use]
    pub const fn degraded(data: T, attempts: Vec<FetchAttempt>) -> Self {
        Self {
            data,
            source: ReportSource::Degraded { attempts },
        }
    }

    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.source, ReportSource::Degraded { .. })
    }

    /// Transform the data while keeping the source marker.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Report<U> {
        Report {
            data: f(self.data),
            source: self.source,
        }
    }
}
