//! Dashboard views
//!
//! Each view ties the pieces together for one screen element: the period is resolved,
//! the provider request is shaped, candidates are fetched with fallback, and the raw
//! records are reconciled into a UI-ready series. [`Reporter`] exposes one async operation
//! per view plus [`Reporter::refresh`], which resolves all of them concurrently.

mod analytics;
mod records;
mod reporter;

pub use analytics::{AnalyticsMetrics, BreakdownProperty, TrafficSeries};
pub use records::{RawRecord, RecordsEnvelope, Registration, key_string, record_timestamp, within_interval};
pub use reporter::{DashboardSnapshot, Reporter};
