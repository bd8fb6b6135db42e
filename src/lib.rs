//! dashfeed crate
//!
//! Reporting backend for an operational dashboard. A symbolic reporting period is resolved
//! into calendar-day boundaries, requests are shaped for an analytics provider and a records
//! store, each request is tried against an ordered list of candidate endpoints with a
//! declared fallback, and the raw responses are reconciled into gapless day series, top-N
//! rankings, and flag summaries.
//!
//! # Module Organization
//!
//! - [`period`]: period tokens, date intervals, and the injectable clock
//! - [`query`]: provider-specific request shaping
//! - [`fetch`]: sequential multi-candidate fetching with fallback
//! - [`reconcile`]: day padding, ranking, and registration counting
//! - [`views`]: one async operation per dashboard view
//!
//! The `config` and `reports` modules are implementation details of the `dashfeed` tool and
//! may change without warning.

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[doc(hidden)]
pub mod config;

pub mod fetch;

pub mod period;

pub mod query;

pub mod reconcile;

#[doc(hidden)]
pub mod reports;

pub mod views;
