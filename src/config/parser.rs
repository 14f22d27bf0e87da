use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub sheet: SheetConfig,
    #[serde(default)]
    pub timetable: TimetableSourceConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimetableSourceConfig {
    #[serde(default = "default_timetable_path")]
    pub path: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for TimetableSourceConfig {
    fn default() -> Self {
        Self {
            path: default_timetable_path(),
            timezone: default_timezone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    #[default]
    Substring,
    Token,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterConfig {
    #[serde(default = "default_roster_path")]
    pub path: String,
    #[serde(default, rename = "match")]
    pub match_policy: MatchPolicy,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: default_roster_path(),
            match_policy: MatchPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    #[serde(default = "default_absent_marker")]
    pub absent_marker: String,
    #[serde(default = "default_on_time_label")]
    pub on_time_label: String,
    #[serde(default = "default_late_label")]
    pub late_label: String,
    #[serde(default = "default_roll_call_label")]
    pub roll_call_label: String,
    #[serde(default = "default_dismissal_label")]
    pub dismissal_label: String,
    #[serde(default)]
    pub mark_absent_on_provision: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            absent_marker: default_absent_marker(),
            on_time_label: default_on_time_label(),
            late_label: default_late_label(),
            roll_call_label: default_roll_call_label(),
            dismissal_label: default_dismissal_label(),
            mark_absent_on_provision: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_yaml::from_str(content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("ATTENDANCE_SHEET_ACCESS_TOKEN") {
            self.sheet.access_token = value;
        }
        if let Ok(value) = std::env::var("ATTENDANCE_SPREADSHEET_ID") {
            self.sheet.spreadsheet_id = value;
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_sheet_name() -> String {
    "메인".to_string()
}

fn default_api_base_url() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_timetable_path() -> String {
    "timetable.json".to_string()
}

fn default_timezone() -> String {
    "Asia/Seoul".to_string()
}

fn default_roster_path() -> String {
    "roster.yaml".to_string()
}

fn default_absent_marker() -> String {
    "미출석".to_string()
}

fn default_on_time_label() -> String {
    "출석".to_string()
}

fn default_late_label() -> String {
    "지각".to_string()
}

fn default_roll_call_label() -> String {
    "조회".to_string()
}

fn default_dismissal_label() -> String {
    "종례".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
