use super::{AllFailed, AttemptFailure, Candidate, FetchAttempt, Report};
use crate::Result;
use core::time::Duration;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = "     fetch";

/// Default per-candidate timeout.
pub const DEFAULT_CANDIDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// A decoded upstream response body.
pub trait Payload: DeserializeOwned + Send {
    /// Whether the payload carries no data at all.
    fn is_empty(&self) -> bool;
}

/// Whether a well-formed but empty payload counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPayload {
    Accept,
    Reject,
}

/// A logical query: its ordered candidates and the result to substitute if they all fail.
#[derive(Debug, Clone)]
pub struct FetchPlan<T> {
    pub name: &'static str,
    pub candidates: Vec<Candidate>,
    pub empty: EmptyPayload,
    pub fallback: T,
}

/// The payload of the first candidate that succeeded.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub payload: T,
    pub strategy: String,
    pub attempts: Vec<FetchAttempt>,
}

/// Tries candidates one at a time until one yields a usable payload.
///
/// Candidates are awaited strictly in order; the first success ends the walk and
/// only the failure reasons of earlier candidates are kept. Each candidate is bounded by the
/// fetcher's timeout. Dropping the returned future aborts the in-flight candidate and
/// skips the rest, so cancellation never yields a partial result.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher whose requests carry the given bearer token.
    pub fn new(token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("Bearer {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("dashfeed/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, timeout })
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Walk the candidates and return the first usable payload.
    ///
    /// # Errors
    ///
    /// Returns [`AllFailed`] with every attempt's failure reason when no candidate succeeds.
    pub async fn try_candidates<T: Payload>(
        &self,
        query: &str,
        candidates: &[Candidate],
        empty: EmptyPayload,
    ) -> core::result::Result<Fetched<T>, AllFailed> {
        let mut attempts = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            log::debug!(target: LOG_TARGET, "Trying '{}' for '{query}' at {}", candidate.strategy(), candidate.url());

            match self.attempt::<T>(candidate, empty).await {
                Ok(payload) => {
                    log::debug!(target: LOG_TARGET, "'{query}' served by '{}'", candidate.strategy());
                    attempts.push(FetchAttempt::succeeded(candidate.strategy()));
                    return Ok(Fetched {
                        payload,
                        strategy: candidate.strategy().to_string(),
                        attempts,
                    });
                }
                Err(failure) => {
                    log::debug!(target: LOG_TARGET, "'{}' failed for '{query}': {failure}", candidate.strategy());
                    attempts.push(FetchAttempt::failed(candidate.strategy(), failure));
                }
            }
        }

        Err(AllFailed {
            query: query.to_string(),
            attempts,
        })
    }

    /// Run a plan, substituting its fallback payload when every candidate fails.
    ///
    /// Never fails: exhaustion is reported through [`Report::is_degraded`] and a warning log.
    pub async fn fetch<T: Payload>(&self, plan: FetchPlan<T>) -> Report<T> {
        self.fetch_shaped(plan, core::convert::identity).await
    }

    /// Run a plan whose wire payload `P` is reshaped into the plan's result type.
    ///
    /// `shape` only runs on a live payload; the fallback is already in result form.
    pub async fn fetch_shaped<P: Payload, T>(&self, plan: FetchPlan<T>, shape: impl FnOnce(P) -> T) -> Report<T> {
        match self.try_candidates::<P>(plan.name, &plan.candidates, plan.empty).await {
            Ok(fetched) => {
                let failed: Vec<FetchAttempt> = fetched.attempts.into_iter().filter(|attempt| !attempt.is_success()).collect();
                if !failed.is_empty() {
                    log::info!(
                        target: LOG_TARGET,
                        "'{}' served by fallback candidate '{}' after {} failed candidate(s)",
                        plan.name,
                        fetched.strategy,
                        failed.len()
                    );
                }

                Report::live_after(shape(fetched.payload), fetched.strategy, failed)
            }
            Err(all_failed) => {
                log::warn!(target: LOG_TARGET, "Serving fallback data: {all_failed}");
                Report::degraded(plan.fallback, all_failed.attempts)
            }
        }
    }

    async fn attempt<T: Payload>(&self, candidate: &Candidate, empty: EmptyPayload) -> core::result::Result<T, AttemptFailure> {
        let request = self.client.get(candidate.url().clone()).query(candidate.query());

        let exchange = async {
            let response = request.send().await.map_err(|e| AttemptFailure::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(AttemptFailure::Status(status.as_u16()));
            }

            response.bytes().await.map_err(|e| AttemptFailure::Transport(e.to_string()))
        };

        let body = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_elapsed| AttemptFailure::timed_out(self.timeout))??;

        let payload: T = serde_json::from_slice(&body).map_err(|e| AttemptFailure::Malformed(e.to_string()))?;

        if empty == EmptyPayload::Reject && payload.is_empty() {
            return Err(AttemptFailure::Empty);
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_token() {
        let fetcher = Fetcher::new(None, DEFAULT_CANDIDATE_TIMEOUT).unwrap();
        assert_eq!(fetcher.timeout(), DEFAULT_CANDIDATE_TIMEOUT);
    }

    #[test]
    fn test_new_with_token() {
        let fetcher = Fetcher::new(Some("secret"), Duration::from_secs(1)).unwrap();
        assert_eq!(fetcher.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_new_rejects_token_with_control_characters() {
        let _ = Fetcher::new(Some("bad\ntoken"), DEFAULT_CANDIDATE_TIMEOUT).unwrap_err();
    }

    #[derive(Debug, serde::Deserialize)]
    struct Items {
        data: Vec<u32>,
    }

    impl Payload for Items {
        fn is_empty(&self) -> bool {
            self.data.is_empty()
        }
    }

    #[tokio::test]
    async fn test_no_candidates_is_all_failed() {
        let fetcher = Fetcher::new(None, DEFAULT_CANDIDATE_TIMEOUT).unwrap();
        let err = fetcher.try_candidates::<Items>("nothing", &[], EmptyPayload::Accept).await.unwrap_err();
        assert!(err.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_without_candidates_degrades_to_fallback() {
        let fetcher = Fetcher::new(None, DEFAULT_CANDIDATE_TIMEOUT).unwrap();
        let report = fetcher
            .fetch(FetchPlan {
                name: "nothing",
                candidates: Vec::new(),
                empty: EmptyPayload::Accept,
                fallback: Items { data: vec![7] },
            })
            .await;
        assert!(report.is_degraded());
        assert_eq!(report.data.data, vec![7]);
    }

    #[tokio::test]
    async fn test_fetch_shaped_degrades_to_result_typed_fallback() {
        let fetcher = Fetcher::new(None, DEFAULT_CANDIDATE_TIMEOUT).unwrap();
        let report = fetcher
            .fetch_shaped(
                FetchPlan {
                    name: "count",
                    candidates: Vec::new(),
                    empty: EmptyPayload::Reject,
                    fallback: 42_usize,
                },
                |items: Items| items.data.len(),
            )
            .await;
        assert!(report.is_degraded());
        assert_eq!(report.data, 42);
    }
}
