//! Reshaping raw upstream records into dashboard series
//!
//! - [`timeseries`]: gapless per-day counts over a resolved interval
//! - [`ranking`]: top-N keys by occurrence count with stable tie-breaking
//! - [`registrations`]: totals and flagged subsets over heterogeneous yes/no fields

pub mod ranking;
pub mod registrations;
pub mod timeseries;

pub use ranking::{RankedEntry, aggregate, rank_counts};
pub use registrations::{DEFAULT_AFFIRMATIVE_TOKEN, FlagExtractor, RegistrationSummary, summarize};
pub use timeseries::{DayBucket, RawEvent, pad_daily, parse_timestamp, reconcile};
