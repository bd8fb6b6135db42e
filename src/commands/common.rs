//! Options and setup shared by every view command.

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use dashfeed::Result;
use dashfeed::config::Config;
use dashfeed::fetch::Report;
use dashfeed::period::{Clock, FixedClock, SystemClock};
use dashfeed::reports::{ColorMode, ConsoleView, OutputFormat, generate_console, generate_console_snapshot, generate_json};
use dashfeed::views::{DashboardSnapshot, Reporter};
use serde::Serialize;
use std::sync::Arc;

const LOG_TARGET: &str = "    common";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages
    Info,
    /// Debug and above messages
    Debug,
    /// All messages including trace
    Trace,
}

/// Arguments accepted by every subcommand
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to configuration file [default: one of dashfeed.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH", global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Bearer token for the analytics provider
    #[arg(long, value_name = "TOKEN", env = "DASHFEED_ANALYTICS_API_KEY", hide_env_values = true, global = true)]
    pub analytics_api_key: Option<String>,

    /// Bearer token for the records store
    #[arg(long, value_name = "TOKEN", env = "DASHFEED_RECORDS_API_KEY", hide_env_values = true, global = true)]
    pub records_api_key: Option<String>,

    /// Resolve periods as if today were this date (YYYY-MM-DD) instead of reading the clock
    #[arg(long, value_name = "DATE", global = true)]
    pub now: Option<NaiveDate>,

    /// How results are printed
    #[arg(long, value_name = "FORMAT", default_value = "console", global = true)]
    pub format: OutputFormat,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

pub struct Common {
    pub reporter: Reporter<Arc<dyn Clock>>,
    format: OutputFormat,
    color: ColorMode,
}

impl Common {
    /// Initialize logging, load the configuration, and build the reporter
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the HTTP clients cannot be built
    pub fn new(args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let (mut config, warnings) = Config::load(&Utf8PathBuf::from("."), args.config.as_ref())?;
        print_warnings(&warnings);

        if let Some(key) = &args.analytics_api_key {
            config.analytics.api_key = Some(key.clone());
        }

        if let Some(key) = &args.records_api_key {
            config.records.api_key = Some(key.clone());
        }

        let clock: Arc<dyn Clock> = if let Some(day) = args.now {
            log::info!(target: LOG_TARGET, "Resolving periods against fixed date {day}");
            Arc::new(FixedClock::on_day(day))
        } else {
            Arc::new(SystemClock)
        };

        Ok(Self {
            reporter: Reporter::with_clock(config, clock)?,
            format: args.format,
            color: args.color,
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        let level = match log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .init();
    }

    /// Print one report in the selected format
    pub fn emit<T: ConsoleView + Serialize>(&self, title: &str, report: &Report<T>) -> Result<()> {
        let mut output = String::new();
        match self.format {
            OutputFormat::Console => generate_console(title, report, self.color, &mut output)?,
            OutputFormat::Json => generate_json(report, &mut output)?,
        }

        print!("{output}");
        Ok(())
    }

    /// Print a full dashboard snapshot in the selected format
    pub fn emit_snapshot(&self, snapshot: &DashboardSnapshot) -> Result<()> {
        let mut output = String::new();
        match self.format {
            OutputFormat::Console => generate_console_snapshot(snapshot, self.color, &mut output)?,
            OutputFormat::Json => generate_json(snapshot, &mut output)?,
        }

        print!("{output}");
        Ok(())
    }
}

pub fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        eprintln!("\n⚠️  Configuration validation warnings:");
        for warning in warnings {
            eprintln!("   {warning}");
        }
        eprintln!();
    }
}
