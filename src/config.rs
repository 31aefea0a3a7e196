//! Configuration loading
//!
//! Settings come from an optional TOML file. Secrets, and a few overrides,
//! come from the environment:
//!
//! | Variable                  | Setting                              |
//! |---------------------------|--------------------------------------|
//! | `TELEGRAM_BOT_TOKEN`      | bot token (required)                 |
//! | `TELEGRAM_CHAT_ID`        | `chat_id`                            |
//! | `GITHUB_TOKEN`/`GH_TOKEN` | GitHub token (required)              |
//! | `MERGE_PIN_REPOSITORIES`  | `repositories`, comma separated      |

use crate::error::{Error, Result};
use crate::schedule::Schedule;
use chrono::{FixedOffset, NaiveTime, Weekday};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Directory name under the user config dir
const CONFIG_DIR: &str = "merge-pin";

/// Config file name
const CONFIG_FILE: &str = "config.toml";

/// Longest allowed refresh interval: one day
const MAX_REFRESH_MINUTES: u64 = 24 * 60;

/// `[schedule]` table
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleSection {
    /// Daily post time, `HH:MM`
    pub post_at: String,
    /// Days of the daily post (`mon`, `Tuesday`, ...)
    pub post_days: Vec<String>,
    /// Minutes between in-place updates
    pub refresh_minutes: u64,
    /// Reference timezone as hours east of UTC
    pub utc_offset_hours: i32,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            post_at: "11:30".to_string(),
            post_days: ["mon", "tue", "wed", "thu", "fri"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            refresh_minutes: 10,
            utc_offset_hours: 3,
        }
    }
}

/// `[telegram]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TelegramSection {
    /// Bot API base URL
    pub api_url: Option<String>,
}

/// `[github]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubSection {
    /// GitHub Enterprise host; github.com when unset
    pub host: Option<String>,
}

/// Contents of the config file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Target repositories, `owner/name` or `name`
    pub repositories: Vec<String>,
    /// Chat the plan is posted to
    pub chat_id: Option<i64>,
    /// Schedule settings
    pub schedule: ScheduleSection,
    /// Telegram settings
    pub telegram: TelegramSection,
    /// GitHub settings
    pub github: GitHubSection,
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Target repositories, `owner/name` or `name`
    pub repositories: Vec<String>,
    /// Chat the plan is posted to
    pub chat_id: i64,
    /// Telegram bot token
    pub bot_token: String,
    /// GitHub token
    pub github_token: String,
    /// Telegram Bot API base URL override
    pub telegram_api_url: Option<String>,
    /// GitHub Enterprise host
    pub github_host: Option<String>,
    /// Post and refresh schedule
    pub schedule: Schedule,
    /// Reference timezone
    pub offset: FixedOffset,
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Read a config file.
///
/// An explicit `path` must exist. Without one, the default location is used
/// if present, otherwise defaults apply.
pub fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

fn parse_schedule(section: &ScheduleSection) -> Result<(Schedule, FixedOffset)> {
    let post_at = NaiveTime::parse_from_str(section.post_at.trim(), "%H:%M")
        .map_err(|e| Error::Config(format!("invalid post_at '{}': {e}", section.post_at)))?;

    let post_days = section
        .post_days
        .iter()
        .map(|day| {
            day.trim()
                .parse::<Weekday>()
                .map_err(|_| Error::Config(format!("invalid weekday '{day}'")))
        })
        .collect::<Result<Vec<_>>>()?;

    if !(1..=MAX_REFRESH_MINUTES).contains(&section.refresh_minutes) {
        return Err(Error::Config(format!(
            "refresh_minutes must be between 1 and {MAX_REFRESH_MINUTES}, got {}",
            section.refresh_minutes
        )));
    }

    // FixedOffset accepts strictly less than a day either way
    let offset = section
        .utc_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            Error::Config(format!(
                "utc_offset_hours must be between -23 and 23, got {}",
                section.utc_offset_hours
            ))
        })?;

    let schedule = Schedule {
        post_at,
        post_days,
        refresh_every: std::time::Duration::from_secs(section.refresh_minutes * 60),
    };
    Ok((schedule, offset))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Resolve a file config against environment lookups.
    ///
    /// `env` is `std::env::var(..).ok()` in production and a map in tests.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = non_empty(env("TELEGRAM_BOT_TOKEN"))
            .ok_or_else(|| Error::Config("TELEGRAM_BOT_TOKEN is not set".to_string()))?;

        let github_token = non_empty(env("GITHUB_TOKEN"))
            .or_else(|| non_empty(env("GH_TOKEN")))
            .ok_or_else(|| Error::Config("GITHUB_TOKEN is not set".to_string()))?;

        let chat_id = match non_empty(env("TELEGRAM_CHAT_ID")) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| Error::Config(format!("invalid TELEGRAM_CHAT_ID '{raw}'")))?,
            None => file
                .chat_id
                .ok_or_else(|| Error::Config("chat_id is not configured".to_string()))?,
        };

        let repositories = non_empty(env("MERGE_PIN_REPOSITORIES")).map_or(file.repositories, |raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(ToString::to_string)
                .collect()
        });

        let (schedule, offset) = parse_schedule(&file.schedule)?;

        if let Some(raw) = &file.telegram.api_url {
            Url::parse(raw)
                .map_err(|e| Error::Config(format!("invalid telegram api_url '{raw}': {e}")))?;
        }

        Ok(Self {
            repositories,
            chat_id,
            bot_token,
            github_token,
            telegram_api_url: file.telegram.api_url,
            github_host: file.github.host,
            schedule,
            offset,
        })
    }

    /// Load the config file and resolve it against the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = load_file_config(path)?;
        Self::resolve(file, |key| std::env::var(key).ok())
    }
}
