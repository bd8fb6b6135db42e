use super::analytics::{
    AGGREGATE_METRICS, AggregateEnvelope, AnalyticsMetrics, BREAKDOWN_METRIC, BreakdownEnvelope, BreakdownProperty, TIMESERIES_METRICS,
    TimeseriesEnvelope, TrafficSeries,
};
use super::records::{RawRecord, RecordsEnvelope, Registration, key_string, record_timestamp, within_interval};
use crate::Result;
use crate::config::Config;
use crate::fetch::{Candidate, EmptyPayload, FetchPlan, Fetcher, Report};
use crate::period::{self, Clock, DateInterval, PeriodToken, SystemClock};
use crate::query::{self, FilterStyle, ProviderKind, ProviderRequest};
use crate::reconcile::{self, DayBucket, FlagExtractor, RankedEntry, RawEvent, RegistrationSummary};
use core::time::Duration;
use serde::Serialize;
use url::Url;

const LOG_TARGET: &str = "  reporter";

/// Every view for one period, all resolved against the same interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub period: PeriodToken,
    pub interval: DateInterval,
    pub metrics: Report<AnalyticsMetrics>,
    pub traffic: Report<TrafficSeries>,
    pub devices: Report<Vec<RankedEntry>>,
    pub browsers: Report<Vec<RankedEntry>>,
    pub registrations_per_day: Report<Vec<DayBucket>>,
    pub rankings: Report<Vec<RankedEntry>>,
    pub registrations: Report<RegistrationSummary>,
    pub recent_registrations: Report<Vec<Registration>>,
}

impl DashboardSnapshot {
    /// Names of the views that are serving fallback data.
    #[must_use]
    pub fn degraded_views(&self) -> Vec<&'static str> {
        [
            ("metrics", self.metrics.is_degraded()),
            ("traffic", self.traffic.is_degraded()),
            ("devices", self.devices.is_degraded()),
            ("browsers", self.browsers.is_degraded()),
            ("registrations_per_day", self.registrations_per_day.is_degraded()),
            ("rankings", self.rankings.is_degraded()),
            ("registrations", self.registrations.is_degraded()),
            ("recent_registrations", self.recent_registrations.is_degraded()),
        ]
        .into_iter()
        .filter_map(|(name, degraded)| degraded.then_some(name))
        .collect()
    }
}

/// Answers dashboard view queries from the configured upstreams.
///
/// Every operation resolves its period against the clock at call time, shapes one request
/// per candidate endpoint, and returns a [`Report`]. None of them fail: when all candidates
/// are exhausted the configured fallback is served and the report is marked degraded.
#[derive(Debug)]
pub struct Reporter<C = SystemClock> {
    config: Config,
    analytics: Fetcher,
    records: Fetcher,
    clock: C,
}

impl Reporter {
    /// Create a reporter that reads the wall clock.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Reporter<C> {
    /// Create a reporter whose notion of "now" comes from `clock`.
    pub fn with_clock(config: Config, clock: C) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let analytics = Fetcher::new(config.analytics.api_key.as_deref(), timeout)?;
        let records = Fetcher::new(config.records.api_key.as_deref(), timeout)?;

        Ok(Self {
            config,
            analytics,
            records,
            clock,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a period against the current instant.
    #[must_use]
    pub fn interval(&self, period: PeriodToken) -> DateInterval {
        period::resolve_with(period, &self.clock, self.config.timezone)
    }

    pub async fn resolve_metrics(&self, period: PeriodToken) -> Report<AnalyticsMetrics> {
        self.metrics_for(&self.interval(period)).await
    }

    pub async fn resolve_traffic(&self, period: PeriodToken) -> Report<TrafficSeries> {
        self.traffic_for(&self.interval(period)).await
    }

    pub async fn resolve_breakdown(&self, period: PeriodToken, property: BreakdownProperty, limit: usize) -> Report<Vec<RankedEntry>> {
        self.breakdown_for(&self.interval(period), property, limit).await
    }

    /// Registrations per calendar day, one bucket for every day of the period.
    pub async fn resolve_timeseries(&self, period: PeriodToken) -> Report<Vec<DayBucket>> {
        self.registrations_per_day_for(&self.interval(period)).await
    }

    /// The most frequently pinned units.
    pub async fn resolve_rankings(&self, period: PeriodToken, limit: usize) -> Report<Vec<RankedEntry>> {
        self.rankings_for(&self.interval(period), limit).await
    }

    pub async fn resolve_registration_summary(&self, period: PeriodToken) -> Report<RegistrationSummary> {
        self.registration_summary_for(&self.interval(period)).await
    }

    /// Registrations in the period, newest first.
    pub async fn resolve_recent_registrations(&self, period: PeriodToken) -> Report<Vec<Registration>> {
        self.recent_registrations_for(&self.interval(period)).await
    }

    /// Resolve every view concurrently.
    pub async fn refresh(&self, period: PeriodToken, limit: usize) -> DashboardSnapshot {
        let interval = self.interval(period);
        log::info!(target: LOG_TARGET, "Refreshing dashboard for '{period}' ({} ..= {})", interval.start(), interval.end());

        let (metrics, traffic, devices, browsers, registrations_per_day, rankings, registrations, recent_registrations) = tokio::join!(
            self.metrics_for(&interval),
            self.traffic_for(&interval),
            self.breakdown_for(&interval, BreakdownProperty::Device, limit),
            self.breakdown_for(&interval, BreakdownProperty::Browser, limit),
            self.registrations_per_day_for(&interval),
            self.rankings_for(&interval, limit),
            self.registration_summary_for(&interval),
            self.recent_registrations_for(&interval),
        );

        let snapshot = DashboardSnapshot {
            period,
            interval,
            metrics,
            traffic,
            devices,
            browsers,
            registrations_per_day,
            rankings,
            registrations,
            recent_registrations,
        };

        let degraded = snapshot.degraded_views();
        if !degraded.is_empty() {
            log::warn!(target: LOG_TARGET, "Dashboard refresh served fallback data for: {}", degraded.join(", "));
        }

        snapshot
    }

    async fn metrics_for(&self, interval: &DateInterval) -> Report<AnalyticsMetrics> {
        let request = self.analytics_request(interval).with_param("metrics", AGGREGATE_METRICS);
        let plan = FetchPlan {
            name: "metrics",
            candidates: self.analytics_candidates("stats/aggregate", &request),
            empty: EmptyPayload::Accept,
            fallback: self.config.fallbacks.metrics,
        };

        self.analytics.fetch_shaped::<AggregateEnvelope, _>(plan, AnalyticsMetrics::from).await
    }

    async fn traffic_for(&self, interval: &DateInterval) -> Report<TrafficSeries> {
        let request = self.analytics_request(interval).with_param("metrics", TIMESERIES_METRICS);
        let plan = FetchPlan {
            name: "traffic",
            candidates: self.analytics_candidates("stats/timeseries", &request),
            empty: EmptyPayload::Accept,
            fallback: TrafficSeries::zeroed(interval),
        };

        self.analytics
            .fetch_shaped(plan, |envelope: TimeseriesEnvelope| envelope.into_series(interval))
            .await
    }

    async fn breakdown_for(&self, interval: &DateInterval, property: BreakdownProperty, limit: usize) -> Report<Vec<RankedEntry>> {
        let request = self
            .analytics_request(interval)
            .with_param("property", property.query_name())
            .with_param("metrics", BREAKDOWN_METRIC);

        let plan = FetchPlan {
            name: match property {
                BreakdownProperty::Device => "device breakdown",
                BreakdownProperty::Browser => "browser breakdown",
            },
            candidates: self.analytics_candidates("stats/breakdown", &request),
            empty: EmptyPayload::Accept,
            fallback: Vec::new(),
        };

        self.analytics
            .fetch_shaped(plan, |envelope: BreakdownEnvelope| envelope.rank(property, limit))
            .await
    }

    async fn registrations_per_day_for(&self, interval: &DateInterval) -> Report<Vec<DayBucket>> {
        let records = &self.config.records;
        let timestamp_field = records.timestamp_field.as_str();
        let zone = self.config.timezone;
        let request = self.records_request(interval, timestamp_field.to_string(), "-1".to_string());

        let plan = FetchPlan {
            name: "registrations per day",
            candidates: self.records_candidates(&records.registrations_collection, &request),
            empty: EmptyPayload::Accept,
            fallback: reconcile::pad_daily([], interval),
        };

        self.records
            .fetch_shaped(plan, |envelope: RecordsEnvelope<RawRecord>| {
                let events = envelope
                    .data
                    .iter()
                    .filter_map(|record| record_timestamp(record, timestamp_field, zone))
                    .map(RawEvent::new);

                reconcile::reconcile(events, interval)
            })
            .await
    }

    async fn rankings_for(&self, interval: &DateInterval, limit: usize) -> Report<Vec<RankedEntry>> {
        let records = &self.config.records;
        let key_field = records.ranking_key_field.as_str();
        let timestamp_field = records.timestamp_field.as_str();
        let zone = self.config.timezone;
        let request = self.records_request(interval, format!("{key_field},{timestamp_field}"), records.page_limit.to_string());

        let mut fallback = self.config.fallbacks.top_units.clone();
        fallback.truncate(limit);

        // an empty page means the route is not really serving the collection
        let plan = FetchPlan {
            name: "rankings",
            candidates: self.records_candidates(&records.pinned_collection, &request),
            empty: EmptyPayload::Reject,
            fallback,
        };

        self.records
            .fetch_shaped(plan, |envelope: RecordsEnvelope<RawRecord>| {
                let keys = envelope
                    .data
                    .iter()
                    .filter(|record| within_interval(record, timestamp_field, zone, interval))
                    .map(|record| record.get(key_field).and_then(key_string));

                reconcile::aggregate(keys, limit)
            })
            .await
    }

    async fn registration_summary_for(&self, interval: &DateInterval) -> Report<RegistrationSummary> {
        let records = &self.config.records;
        let timestamp_field = records.timestamp_field.as_str();
        let zone = self.config.timezone;
        let flag = FlagExtractor::new(records.flag_field.as_str(), &records.affirmative_token);
        let request = self.records_request(
            interval,
            format!("id,{},{timestamp_field}", flag.field()),
            "-1".to_string(),
        );

        let plan = FetchPlan {
            name: "registration summary",
            candidates: self.records_candidates(&records.registrations_collection, &request),
            empty: EmptyPayload::Accept,
            fallback: self.config.fallbacks.registrations,
        };

        self.records
            .fetch_shaped(plan, |envelope: RecordsEnvelope<RawRecord>| {
                let in_range = envelope
                    .data
                    .iter()
                    .filter(|record| within_interval(record, timestamp_field, zone, interval));

                reconcile::summarize(in_range, |record| flag.extract(record))
            })
            .await
    }

    async fn recent_registrations_for(&self, interval: &DateInterval) -> Report<Vec<Registration>> {
        let records = &self.config.records;
        let timestamp_field = records.timestamp_field.as_str();
        let zone = self.config.timezone;
        let flag = FlagExtractor::new(records.flag_field.as_str(), &records.affirmative_token);
        let request = self
            .records_request(interval, "*".to_string(), records.page_limit.to_string())
            .with_param("sort", format!("-{timestamp_field}"));

        let plan = FetchPlan {
            name: "recent registrations",
            candidates: self.records_candidates(&records.registrations_collection, &request),
            empty: EmptyPayload::Accept,
            fallback: Vec::new(),
        };

        self.records
            .fetch_shaped(plan, |envelope: RecordsEnvelope<RawRecord>| {
                let mut registrations: Vec<Registration> = envelope
                    .data
                    .iter()
                    .filter(|record| within_interval(record, timestamp_field, zone, interval))
                    .map(|record| Registration::from_record(record, timestamp_field, zone, &flag))
                    .collect();

                // newest first, undated last
                registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                registrations
            })
            .await
    }

    fn analytics_request(&self, interval: &DateInterval) -> ProviderRequest {
        query::build(interval, &ProviderKind::Analytics).with_param("site_id", &self.config.analytics.site_id)
    }

    fn records_request(&self, interval: &DateInterval, fields: String, limit: String) -> ProviderRequest {
        let provider = ProviderKind::Records {
            timestamp_field: self.config.records.timestamp_field.clone(),
        };

        query::build(interval, &provider).with_param("fields", fields).with_param("limit", limit)
    }

    fn analytics_candidates(&self, endpoint: &str, request: &ProviderRequest) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for (index, base) in self.config.analytics.base_urls.iter().enumerate() {
            match join_path(base, &[endpoint]) {
                Some(url) => candidates.push(Candidate::from_request(
                    format!("analytics#{index}"),
                    url,
                    request,
                    FilterStyle::default(),
                )),
                None => log::warn!(target: LOG_TARGET, "Skipping analytics base URL '{base}': it cannot carry a path"),
            }
        }

        candidates
    }

    /// Every base URL crossed with every route, base URLs outermost.
    fn records_candidates(&self, collection: &str, request: &ProviderRequest) -> Vec<Candidate> {
        let records = &self.config.records;
        let mut candidates = Vec::with_capacity(records.base_urls.len() * records.routes.len());

        for (index, base) in records.base_urls.iter().enumerate() {
            for route in &records.routes {
                match join_path(base, &[route.prefix.as_str(), collection]) {
                    Some(url) => candidates.push(Candidate::from_request(
                        format!("records#{index}/{}", route.name),
                        url,
                        request,
                        route.style,
                    )),
                    None => log::warn!(target: LOG_TARGET, "Skipping records base URL '{base}': it cannot carry a path"),
                }
            }
        }

        candidates
    }
}

/// Append path segments to `base`, ignoring empty ones. `None` for URLs that cannot have a path.
fn join_path(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().ok()?;
        let _ = path.pop_if_empty();
        let _ = path.extend(segments.iter().flat_map(|segment| segment.split('/')).filter(|part| !part.is_empty()));
    }

    Some(url)
}
