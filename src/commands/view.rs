use super::common::{Common, CommonArgs};
use clap::{Args, Subcommand};
use dashfeed::Result;
use dashfeed::period::PeriodToken;
use dashfeed::views::BreakdownProperty;

#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// Reporting period: today, yesterday, 7d, 14d, 30d, 90d, or 1y (anything else means 7d)
    #[arg(long, short = 'p', value_name = "PERIOD", default_value = "7d")]
    pub period: String,
}

impl PeriodArgs {
    fn token(&self) -> PeriodToken {
        PeriodToken::parse_lenient(&self.period)
    }
}

#[derive(Args, Debug)]
pub struct RankingArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Number of entries to show [default: ranking_limit from the configuration]
    #[arg(long, short = 'n', value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub ranking: RankingArgs,

    /// Visit property to group by
    #[arg(long, value_name = "PROPERTY", default_value = "device")]
    pub property: BreakdownProperty,
}

#[derive(Subcommand, Debug)]
pub enum View {
    /// Show site-wide pageviews, visitors, bounce rate, and visit duration
    Metrics(PeriodArgs),
    /// Show visitors and pageviews per day
    Traffic(PeriodArgs),
    /// Show visitors grouped by device or browser
    Breakdown(BreakdownArgs),
    /// Show registrations per day
    Timeseries(PeriodArgs),
    /// Show the most frequently pinned units
    Rankings(RankingArgs),
    /// Show the registration total and how many are flagged
    Registrations(PeriodArgs),
    /// List registrations in the period, newest first
    Recent(PeriodArgs),
    /// Resolve every view at once
    Refresh(RankingArgs),
}

pub async fn run_view(args: &CommonArgs, view: &View) -> Result<()> {
    let common = Common::new(args)?;
    let reporter = &common.reporter;
    let limit = |requested: Option<usize>| requested.unwrap_or(reporter.config().ranking_limit);

    match view {
        View::Metrics(a) => common.emit("Metrics", &reporter.resolve_metrics(a.token()).await),
        View::Traffic(a) => common.emit("Traffic", &reporter.resolve_traffic(a.token()).await),
        View::Breakdown(a) => {
            let report = reporter
                .resolve_breakdown(a.ranking.period.token(), a.property, limit(a.ranking.limit))
                .await;
            let title = match a.property {
                BreakdownProperty::Device => "Devices",
                BreakdownProperty::Browser => "Browsers",
            };
            common.emit(title, &report)
        }
        View::Timeseries(a) => common.emit("Registrations per day", &reporter.resolve_timeseries(a.token()).await),
        View::Rankings(a) => common.emit(
            "Top pinned units",
            &reporter.resolve_rankings(a.period.token(), limit(a.limit)).await,
        ),
        View::Registrations(a) => common.emit("Registrations", &reporter.resolve_registration_summary(a.token()).await),
        View::Recent(a) => common.emit("Recent registrations", &reporter.resolve_recent_registrations(a.token()).await),
        View::Refresh(a) => common.emit_snapshot(&reporter.refresh(a.period.token(), limit(a.limit)).await),
    }
}
