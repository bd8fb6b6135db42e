//! Multi-tier fetching with a declared fallback
//!
//! A logical query (say, "top pinned units for the last 30 days") can usually be answered
//! by more than one upstream endpoint or request shape. The [`Fetcher`] walks an ordered
//! list of [`Candidate`]s, one at a time, and returns the first well-formed answer. When
//! every candidate fails, [`Fetcher::fetch`] substitutes the plan's fallback payload and
//! marks the [`Report`] as degraded instead of returning an error, so callers always get a
//! shaped result. Individual failures are kept as [`FetchAttempt`]s for diagnostics.

mod attempt;
mod candidate;
mod fetcher;
mod report;

pub use attempt::{AllFailed, AttemptFailure, FetchAttempt};
pub use candidate::Candidate;
pub use fetcher::{DEFAULT_CANDIDATE_TIMEOUT, EmptyPayload, FetchPlan, Fetched, Fetcher, Payload};
pub use report::{Report, ReportSource};
