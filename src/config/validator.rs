use chrono_tz::Tz;
use thiserror::Error;

use super::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sheet.spreadsheet_id.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "sheet.spreadsheet_id cannot be empty".to_string(),
            ));
        }

        if self.sheet.sheet_name.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "sheet.sheet_name cannot be empty".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::InvalidConfig(
                "server.port must be between 1 and 65535".to_string(),
            ));
        }

        if self.timetable.timezone.parse::<Tz>().is_err() {
            return Err(ConfigError::InvalidConfig(format!(
                "timetable.timezone is not a known timezone: {}",
                self.timetable.timezone
            )));
        }

        let ledger = &self.ledger;
        if ledger.on_time_label.is_empty() || ledger.late_label.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "ledger status labels cannot be empty".to_string(),
            ));
        }
        if ledger.on_time_label == ledger.absent_marker || ledger.late_label == ledger.absent_marker
        {
            return Err(ConfigError::InvalidConfig(
                "ledger.absent_marker must differ from the status labels".to_string(),
            ));
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigError::InvalidConfig(format!(
                    "logging.format must be pretty or json, got {}",
                    other
                )));
            }
        }

        Ok(())
    }
}
