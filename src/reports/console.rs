use crate::Result;
use crate::fetch::{FetchAttempt, Report, ReportSource};
use crate::reconcile::{DayBucket, RankedEntry, RegistrationSummary};
use crate::views::{AnalyticsMetrics, DashboardSnapshot, Registration, TrafficSeries};
use clap::ValueEnum;
use core::fmt::{self, Write};
use owo_colors::OwoColorize;
use std::io::{IsTerminal, stdout};

const INDENT: &str = "  ";
const BAR_WIDTH: u64 = 30;
const LABEL_WIDTH: usize = 16;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    #[default]
    Auto,
}

/// Data that knows how to lay itself out as console text.
pub trait ConsoleView {
    fn write_body<W: Write>(&self, colors: ColorScheme, writer: &mut W) -> fmt::Result;
}

/// Whether ANSI styling is applied.
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    enabled: bool,
}

impl ColorScheme {
    #[must_use]
    pub fn new(color_mode: ColorMode) -> Self {
        let enabled = matches!(color_mode, ColorMode::Always) || (matches!(color_mode, ColorMode::Auto) && stdout().is_terminal());
        Self { enabled }
    }

    fn bold<W: Write>(self, writer: &mut W, text: &str) -> fmt::Result {
        if self.enabled {
            write!(writer, "{}", text.bold())
        } else {
            write!(writer, "{text}")
        }
    }

    fn dimmed<W: Write>(self, writer: &mut W, text: &str) -> fmt::Result {
        if self.enabled {
            write!(writer, "{}", text.dimmed())
        } else {
            write!(writer, "{text}")
        }
    }

    fn warning<W: Write>(self, writer: &mut W, text: &str) -> fmt::Result {
        if self.enabled {
            write!(writer, "{}", text.yellow().bold())
        } else {
            write!(writer, "{text}")
        }
    }

    fn good<W: Write>(self, writer: &mut W, text: &str) -> fmt::Result {
        if self.enabled {
            write!(writer, "{}", text.green())
        } else {
            write!(writer, "{text}")
        }
    }
}

/// Write one titled report.
pub fn generate<T: ConsoleView, W: Write>(title: &str, report: &Report<T>, color: ColorMode, writer: &mut W) -> Result<()> {
    write_report(title, report, ColorScheme::new(color), writer)?;
    Ok(())
}

/// Write every view of a dashboard snapshot.
pub fn generate_snapshot<W: Write>(snapshot: &DashboardSnapshot, color: ColorMode, writer: &mut W) -> Result<()> {
    let colors = ColorScheme::new(color);

    colors.bold(
        writer,
        &format!(
            "Dashboard for {} ({} ..= {})",
            snapshot.period,
            snapshot.interval.start_of_range(),
            snapshot.interval.end_of_range()
        ),
    )?;
    writeln!(writer)?;
    writeln!(writer)?;

    write_report("Metrics", &snapshot.metrics, colors, writer)?;
    write_report("Traffic", &snapshot.traffic, colors, writer)?;
    write_report("Devices", &snapshot.devices, colors, writer)?;
    write_report("Browsers", &snapshot.browsers, colors, writer)?;
    write_report("Registrations per day", &snapshot.registrations_per_day, colors, writer)?;
    write_report("Top pinned units", &snapshot.rankings, colors, writer)?;
    write_report("Registrations", &snapshot.registrations, colors, writer)?;
    write_report("Recent registrations", &snapshot.recent_registrations, colors, writer)?;
    Ok(())
}

fn write_report<T: ConsoleView, W: Write>(title: &str, report: &Report<T>, colors: ColorScheme, writer: &mut W) -> fmt::Result {
    colors.bold(writer, title)?;
    write!(writer, " ")?;

    match &report.source {
        ReportSource::Live { strategy, attempts } => {
            colors.dimmed(writer, &format!("[live: {strategy}]"))?;
            write_attempts(attempts, colors, writer)?;
        }
        ReportSource::Degraded { attempts } => {
            colors.warning(writer, "[DEGRADED: fallback data]")?;
            write_attempts(attempts, colors, writer)?;
        }
    }

    writeln!(writer)?;
    report.data.write_body(colors, writer)?;
    writeln!(writer)
}

fn write_attempts<W: Write>(attempts: &[FetchAttempt], colors: ColorScheme, writer: &mut W) -> fmt::Result {
    for attempt in attempts {
        writeln!(writer)?;
        colors.dimmed(writer, &format!("{INDENT}! {attempt}"))?;
    }

    Ok(())
}

fn write_none<W: Write>(colors: ColorScheme, writer: &mut W) -> fmt::Result {
    colors.dimmed(writer, &format!("{INDENT}(none)"))?;
    writeln!(writer)
}

fn bar(count: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }

    let width = usize::try_from(count.saturating_mul(BAR_WIDTH) / max).unwrap_or(0);
    "#".repeat(width)
}

impl ConsoleView for AnalyticsMetrics {
    fn write_body<W: Write>(&self, _colors: ColorScheme, writer: &mut W) -> fmt::Result {
        writeln!(writer, "{INDENT}{:<LABEL_WIDTH$}{}", "Pageviews", self.pageviews)?;
        writeln!(writer, "{INDENT}{:<LABEL_WIDTH$}{}", "Visitors", self.visitors)?;
        writeln!(writer, "{INDENT}{:<LABEL_WIDTH$}{:.1}%", "Bounce rate", self.bounce_rate)?;
        writeln!(writer, "{INDENT}{:<LABEL_WIDTH$}{:.0}s", "Visit duration", self.visit_duration)
    }
}

impl ConsoleView for Vec<DayBucket> {
    fn write_body<W: Write>(&self, colors: ColorScheme, writer: &mut W) -> fmt::Result {
        if self.is_empty() {
            return write_none(colors, writer);
        }

        let max = self.iter().map(|b| b.count).max().unwrap_or(0);
        let width = max.to_string().len();
        for bucket in self {
            write!(writer, "{INDENT}{}  {:>width$}  ", bucket.date, bucket.count)?;
            colors.good(writer, &bar(bucket.count, max))?;
            writeln!(writer)?;
        }

        Ok(())
    }
}

impl ConsoleView for TrafficSeries {
    fn write_body<W: Write>(&self, colors: ColorScheme, writer: &mut W) -> fmt::Result {
        if self.visitors.is_empty() {
            return write_none(colors, writer);
        }

        colors.dimmed(writer, &format!("{INDENT}{:<10}  {:>9}  {:>9}", "date", "visitors", "pageviews"))?;
        writeln!(writer)?;
        for (visitors, pageviews) in self.visitors.iter().zip(&self.pageviews) {
            writeln!(writer, "{INDENT}{}  {:>9}  {:>9}", visitors.date, visitors.count, pageviews.count)?;
        }

        Ok(())
    }
}

impl ConsoleView for Vec<RankedEntry> {
    fn write_body<W: Write>(&self, colors: ColorScheme, writer: &mut W) -> fmt::Result {
        if self.is_empty() {
            return write_none(colors, writer);
        }

        let key_width = self.iter().map(|e| e.key.len()).max().unwrap_or(0);
        for (rank, entry) in self.iter().enumerate() {
            writeln!(writer, "{INDENT}{:>2}. {:<key_width$}  {}", rank + 1, entry.key, entry.count)?;
        }

        Ok(())
    }
}

impl ConsoleView for RegistrationSummary {
    fn write_body<W: Write>(&self, _colors: ColorScheme, writer: &mut W) -> fmt::Result {
        writeln!(writer, "{INDENT}{:<LABEL_WIDTH$}{}", "Total", self.total)?;
        write!(writer, "{INDENT}{:<LABEL_WIDTH$}{}", "Flagged", self.flagged_count)?;
        if self.total > 0 {
            write!(writer, " ({}%)", self.flagged_count * 100 / self.total)?;
        }
        writeln!(writer)
    }
}

impl ConsoleView for Vec<Registration> {
    fn write_body<W: Write>(&self, colors: ColorScheme, writer: &mut W) -> fmt::Result {
        if self.is_empty() {
            return write_none(colors, writer);
        }

        for registration in self {
            let when = registration
                .created_at
                .map_or_else(|| "????-??-?? ??:??".to_string(), |ts| ts.format("%Y-%m-%d %H:%M").to_string());

            let name = [registration.first_name.as_deref(), registration.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");

            write!(writer, "{INDENT}{when}  {name}")?;
            if let Some(email) = &registration.email {
                write!(writer, " <{email}>")?;
            }
            if registration.flagged {
                write!(writer, "  ")?;
                colors.good(writer, "[flagged]")?;
            }
            if !registration.favourites.is_empty() {
                colors.dimmed(writer, &format!("  pinned: {}", registration.favourites.join(", ")))?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}
