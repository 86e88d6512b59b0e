//! RON configuration file for the watcher.
//!
//! Every section is optional; missing fields fall back to the same defaults
//! the core and engine crates use.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;
use watch_core::{CombinedBudget, DedupScope, PollConfig, SuitabilityRule, ZeroAmountPolicy};
use watch_engine::{CardSelectors, FetchSettings, PermissionState};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "listing_watch.ron";
pub const DEFAULT_TARGET_URL: &str = "https://divar.ir/s/tehran/rent-apartment";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid log level {0:?}")]
    LogLevel(String),
    #[error("polling.{0} must be at least 1 second")]
    ZeroInterval(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub target_url: String,
    pub polling: PollingSection,
    pub suitability: SuitabilitySection,
    pub selectors: SelectorsSection,
    pub fetch: FetchSection,
    pub notifications: NotificationsSection,
    pub logging: LoggingSection,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            polling: PollingSection::default(),
            suitability: SuitabilitySection::default(),
            selectors: SelectorsSection::default(),
            fetch: FetchSection::default(),
            notifications: NotificationsSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum DedupSetting {
    Session,
    Batch,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingSection {
    pub with_new_items_secs: u64,
    pub idle_secs: u64,
    pub notify_on_first_poll: bool,
    pub dedup_scope: DedupSetting,
    pub failure_backoff_cap_secs: Option<u64>,
}

impl Default for PollingSection {
    fn default() -> Self {
        let defaults = PollConfig::default();
        Self {
            with_new_items_secs: defaults.poll_interval_with_new_items.as_secs(),
            idle_secs: defaults.poll_interval_idle.as_secs(),
            notify_on_first_poll: defaults.notify_on_first_poll,
            dedup_scope: DedupSetting::Session,
            failure_backoff_cap_secs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum ZeroAmountSetting {
    Excludes,
    Includes,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct CombinedSection {
    pub rent_per_million_deposit: u64,
    pub max_monthly: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuitabilitySection {
    pub max_deposit: Option<u64>,
    pub max_rent: Option<u64>,
    pub combined: Option<CombinedSection>,
    pub zero_amounts: ZeroAmountSetting,
    pub excluded_title_markers: Vec<String>,
}

impl Default for SuitabilitySection {
    fn default() -> Self {
        let defaults = SuitabilityRule::default();
        Self {
            max_deposit: defaults.max_deposit,
            max_rent: defaults.max_rent,
            combined: None,
            zero_amounts: ZeroAmountSetting::Includes,
            excluded_title_markers: defaults.excluded_title_markers,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorsSection {
    pub card: String,
    pub token_element: String,
    pub token_attr: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub thumbnail_attr: String,
    pub link: String,
    pub origin: String,
}

impl Default for SelectorsSection {
    fn default() -> Self {
        let defaults = CardSelectors::default();
        Self {
            card: defaults.card,
            token_element: defaults.token_element,
            token_attr: defaults.token_attr,
            title: defaults.title,
            description: defaults.description,
            thumbnail: defaults.thumbnail,
            thumbnail_attr: defaults.thumbnail_attr,
            link: defaults.link,
            origin: defaults.origin,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSection {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            redirect_limit: defaults.redirect_limit,
            max_bytes: defaults.max_bytes,
            user_agent: defaults.user_agent,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum PermissionSetting {
    Granted,
    Denied,
    /// Start undetermined and ask on the first alert.
    Ask,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationsSection {
    pub permission: PermissionSetting,
    /// Answer given when the platform asks for permission.
    pub grant_when_asked: bool,
    /// Ring the terminal bell with each alert.
    pub bell: bool,
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            permission: PermissionSetting::Granted,
            grant_when_asked: true,
            bell: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub destination: LogDestination,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            destination: LogDestination::File,
        }
    }
}

impl LoggingSection {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.level.trim())
            .map_err(|_| ConfigError::LogLevel(self.level.clone()))
    }
}

impl WatchConfig {
    pub fn poll_config(&self) -> Result<PollConfig, ConfigError> {
        if self.polling.with_new_items_secs == 0 {
            return Err(ConfigError::ZeroInterval("with_new_items_secs"));
        }
        if self.polling.idle_secs == 0 {
            return Err(ConfigError::ZeroInterval("idle_secs"));
        }
        Ok(PollConfig {
            poll_interval_with_new_items: Duration::from_secs(self.polling.with_new_items_secs),
            poll_interval_idle: Duration::from_secs(self.polling.idle_secs),
            notify_on_first_poll: self.polling.notify_on_first_poll,
            dedup_scope: match self.polling.dedup_scope {
                DedupSetting::Session => DedupScope::Session,
                DedupSetting::Batch => DedupScope::Batch,
            },
            failure_backoff_cap: self.polling.failure_backoff_cap_secs.map(Duration::from_secs),
        })
    }

    pub fn suitability_rule(&self) -> SuitabilityRule {
        let section = &self.suitability;
        SuitabilityRule {
            max_deposit: section.max_deposit,
            max_rent: section.max_rent,
            combined: section.combined.map(|combined| CombinedBudget {
                rent_per_million_deposit: combined.rent_per_million_deposit,
                max_monthly: combined.max_monthly,
            }),
            zero_amounts: match section.zero_amounts {
                ZeroAmountSetting::Excludes => ZeroAmountPolicy::Excludes,
                ZeroAmountSetting::Includes => ZeroAmountPolicy::Includes,
            },
            excluded_title_markers: section.excluded_title_markers.clone(),
        }
    }

    pub fn card_selectors(&self) -> CardSelectors {
        let section = self.selectors.clone();
        CardSelectors {
            card: section.card,
            token_element: section.token_element,
            token_attr: section.token_attr,
            title: section.title,
            description: section.description,
            thumbnail: section.thumbnail,
            thumbnail_attr: section.thumbnail_attr,
            link: section.link,
            origin: section.origin,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.fetch.request_timeout_secs),
            redirect_limit: self.fetch.redirect_limit,
            max_bytes: self.fetch.max_bytes,
            user_agent: self.fetch.user_agent.clone(),
        }
    }

    pub fn initial_permission(&self) -> PermissionState {
        match self.notifications.permission {
            PermissionSetting::Granted => PermissionState::Granted,
            PermissionSetting::Denied => PermissionState::Denied,
            PermissionSetting::Ask => PermissionState::Undetermined,
        }
    }
}

/// Picks the config path from the first CLI argument.
/// Returns whether the path was given explicitly.
pub fn config_path_from_args(mut args: impl Iterator<Item = String>) -> (PathBuf, bool) {
    match args.nth(1) {
        Some(path) => (PathBuf::from(path), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    }
}

/// Loads the config file. A missing default file means "all defaults"; a
/// missing file that was asked for explicitly is an error.
pub fn load(path: &Path, explicit: bool) -> Result<WatchConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !explicit => {
            return Ok(WatchConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse(&content).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn parse(content: &str) -> Result<WatchConfig, String> {
    ron::from_str(content).map_err(|err| err.to_string())
}
