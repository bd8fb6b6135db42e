//! A dashboard reporting backend for web analytics and customer registrations.
//!
//! # Overview
//!
//! `dashfeed` resolves a reporting period such as `30d` into calendar-day boundaries, asks
//! an analytics provider and a records store for the raw data behind each dashboard view,
//! and prints gapless day series, top-N rankings, and registration summaries. Every query
//! is tried against an ordered list of candidate endpoints; when all of them fail the
//! configured fallback data is shown and marked as degraded instead of failing.
//!
//! # Quick Start
//!
//! ```bash
//! dashfeed init                      # writes dashfeed.yml with the defaults
//! export DASHFEED_ANALYTICS_API_KEY=...
//! export DASHFEED_RECORDS_API_KEY=...
//! dashfeed refresh --period 30d
//! ```
//!
//! # Views
//!
//! ```bash
//! dashfeed metrics --period 7d              # pageviews, visitors, bounce rate, visit duration
//! dashfeed traffic --period 14d             # visitors and pageviews per day
//! dashfeed breakdown --property browser     # visitors per browser (or device)
//! dashfeed timeseries --period 30d          # registrations per day
//! dashfeed rankings --period 90d -n 10      # most pinned units
//! dashfeed registrations --period 1y        # total and flagged registrations
//! dashfeed recent --period today            # newest registrations
//! dashfeed refresh --period 30d             # all of the above, fetched concurrently
//! ```
//!
//! Periods are `today`, `yesterday`, `7d`, `14d`, `30d`, `90d`, and `1y`. Anything else is
//! treated as `7d`. Use `--now 2024-03-31` to resolve periods against a fixed date.
//!
//! # Output
//!
//! `--format console` (the default) prints aligned tables and flags degraded views with
//! the reason each candidate failed. `--format json` prints the full report, including a
//! `source` object that is either `{"kind": "live", "strategy": ...}` or
//! `{"kind": "degraded", "attempts": [...]}`.
//!
//! # Configuration
//!
//! Configuration is read from `--config PATH` or the first of `dashfeed.toml`,
//! `dashfeed.yml`, `dashfeed.yaml`, `dashfeed.json` found in the working directory or the
//! platform configuration directory. `dashfeed validate` checks a file and lists settings
//! that would make views degrade.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use dashfeed::Result;

mod commands;

use crate::commands::{CommonArgs, InitArgs, View, init_config, run_view, validate_config};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "dashfeed", version, about)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: DashfeedSubcommand,
}

#[derive(Subcommand, Debug)]
enum DashfeedSubcommand {
    #[command(flatten)]
    View(View),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        DashfeedSubcommand::View(view) => run_view(&cli.common, view).await,
        DashfeedSubcommand::Init(init_args) => init_config(init_args),
        DashfeedSubcommand::Validate => validate_config(&cli.common),
    }
}
