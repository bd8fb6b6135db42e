use crate::Result;
use crate::period::ReportingZone;
use crate::query::FilterStyle;
use crate::reconcile::{RankedEntry, RegistrationSummary};
use crate::views::AnalyticsMetrics;
use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration YAML content, embedded from `default_config.yml`
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../default_config.yml");

/// Base names searched, in order, when no explicit configuration path is given
const CONFIG_FILE_NAMES: [&str; 4] = ["dashfeed.toml", "dashfeed.yml", "dashfeed.yaml", "dashfeed.json"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub analytics: AnalyticsConfig,

    pub records: RecordsConfig,

    /// Seconds a single candidate may take before the next one is tried
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of entries kept in rankings and breakdowns
    #[serde(default = "default_ranking_limit")]
    pub ranking_limit: usize,

    /// Zone whose calendar days periods and day buckets follow
    #[serde(default)]
    pub timezone: ReportingZone,

    #[serde(default)]
    pub fallbacks: Fallbacks,
}

/// Aggregate web analytics provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// API roots, tried in order
    pub base_urls: Vec<Url>,

    pub site_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Records store provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecordsConfig {
    /// API roots, tried in order
    pub base_urls: Vec<Url>,

    /// Route layouts, tried in order for each API root
    #[serde(default = "default_routes")]
    pub routes: Vec<RecordsRoute>,

    #[serde(default = "default_registrations_collection")]
    pub registrations_collection: String,

    #[serde(default = "default_pinned_collection")]
    pub pinned_collection: String,

    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,

    #[serde(default = "default_flag_field")]
    pub flag_field: String,

    #[serde(default = "default_affirmative_token")]
    pub affirmative_token: String,

    #[serde(default = "default_ranking_key_field")]
    pub ranking_key_field: String,

    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// One way of addressing a collection on a records store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecordsRoute {
    pub name: String,

    /// Path segment between the API root and the collection name, possibly empty
    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub style: FilterStyle,
}

/// Payloads served when every candidate for a query has failed
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Fallbacks {
    #[serde(default)]
    pub metrics: AnalyticsMetrics,

    #[serde(default = "default_top_units")]
    pub top_units: Vec<RankedEntry>,

    #[serde(default)]
    pub registrations: RegistrationSummary,
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            metrics: AnalyticsMetrics::default(),
            top_units: default_top_units(),
            registrations: RegistrationSummary::default(),
        }
    }
}

const fn default_request_timeout_secs() -> u64 {
    10
}

const fn default_ranking_limit() -> usize {
    5
}

const fn default_page_limit() -> u32 {
    1000
}

fn default_routes() -> Vec<RecordsRoute> {
    vec![
        RecordsRoute {
            name: "items".into(),
            prefix: "items".into(),
            style: FilterStyle::Bracketed,
        },
        RecordsRoute {
            name: "direct".into(),
            prefix: String::new(),
            style: FilterStyle::Json,
        },
        RecordsRoute {
            name: "collections".into(),
            prefix: "collections".into(),
            style: FilterStyle::Json,
        },
    ]
}

fn default_registrations_collection() -> String {
    "customers".into()
}

fn default_pinned_collection() -> String {
    "pinned_units".into()
}

fn default_timestamp_field() -> String {
    "created_at".into()
}

fn default_flag_field() -> String {
    "nautical".into()
}

fn default_affirmative_token() -> String {
    crate::reconcile::DEFAULT_AFFIRMATIVE_TOKEN.into()
}

fn default_ranking_key_field() -> String {
    "unit_id".into()
}

fn default_top_units() -> Vec<RankedEntry> {
    [("172", 4), ("10", 4), ("8", 4), ("165", 2), ("9", 2)]
        .into_iter()
        .map(|(key, count)| RankedEntry::new(key, count))
        .collect()
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `dashfeed.[toml|yml|yaml|json]` is looked up in `base_dir`
    /// and then in the platform configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<(Self, Vec<String>)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading dashfeed configuration from {path}"))?;
            (path.clone(), text)
        } else {
            let mut search_dirs = vec![base_dir.to_path_buf()];
            if let Some(dir) = platform_config_dir() {
                search_dirs.push(dir);
            }

            let mut found = None;
            'search: for dir in &search_dirs {
                for name in CONFIG_FILE_NAMES {
                    let path = dir.join(name);
                    match fs::read_to_string(&path) {
                        Ok(text) => {
                            found = Some((path, text));
                            break 'search;
                        }
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => return Err(e).into_app_err_with(|| format!("reading dashfeed configuration from {path}")),
                    }
                }
            }

            let Some(result) = found else {
                let config = Self::default();
                let warnings = config.validate();
                return Ok((config, warnings));
            };
            result
        };

        let extension = final_path.extension().unwrap_or_default();
        let config: Self = match extension {
            "toml" => toml::from_str(&text).into_app_err_with(|| format!("parsing TOML configuration from {final_path}"))?,
            "yml" | "yaml" => serde_yaml::from_str(&text).into_app_err_with(|| format!("parsing YAML configuration from {final_path}"))?,
            "json" => serde_json::from_str(&text).into_app_err_with(|| format!("parsing JSON configuration from {final_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        let warnings = config.validate();
        Ok((config, warnings))
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => toml::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Write the default configuration, keeping its comments when the target is YAML
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        if matches!(extension, "yml" | "yaml") {
            fs::write(output_path, DEFAULT_CONFIG_YAML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
            Ok(())
        } else {
            Self::default().save(output_path)
        }
    }

    /// Detect settings that are legal but make some queries degrade or misbehave
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.analytics.base_urls.is_empty() {
            warnings.push("analytics.base_urls is empty: analytics views will always serve fallback data".to_string());
        }

        if self.analytics.site_id.trim().is_empty() {
            warnings.push("analytics.site_id is empty".to_string());
        }

        if self.records.base_urls.is_empty() {
            warnings.push("records.base_urls is empty: records views will always serve fallback data".to_string());
        }

        if self.records.routes.is_empty() {
            warnings.push("records.routes is empty: records views will always serve fallback data".to_string());
        }

        let mut seen = Vec::new();
        for route in &self.records.routes {
            if seen.contains(&route.name.as_str()) {
                warnings.push(format!("records.routes contains '{}' more than once", route.name));
            }
            seen.push(route.name.as_str());
        }

        if self.records.affirmative_token.trim().is_empty() {
            warnings.push("records.affirmative_token is empty: text flags will never count as set".to_string());
        }

        if self.records.page_limit == 0 {
            warnings.push("records.page_limit is 0: rankings and recent registrations will be empty".to_string());
        }

        if self.request_timeout_secs == 0 {
            warnings.push("request_timeout_secs is 0: every candidate will time out".to_string());
        }

        if self.ranking_limit == 0 {
            warnings.push("ranking_limit is 0: rankings and breakdowns will be empty".to_string());
        }

        if self.fallbacks.top_units.len() > self.ranking_limit {
            warnings.push(format!(
                "fallbacks.top_units has {} entries but only {} are shown",
                self.fallbacks.top_units.len(),
                self.ranking_limit
            ));
        }

        if self.fallbacks.registrations.flagged_count > self.fallbacks.registrations.total {
            warnings.push("fallbacks.registrations.flagged_count exceeds its total".to_string());
        }

        warnings
    }
}

fn platform_config_dir() -> Option<Utf8PathBuf> {
    let dirs = ProjectDirs::from("", "", "dashfeed")?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok()
}

impl Default for Config {
    fn default() -> Self {
        serde_yaml::from_str(DEFAULT_CONFIG_YAML).expect("default_config.yml should be valid YAML that deserializes to Config")
    }
}
