use std::sync::Arc;

use chrono::{DateTime, Datelike, Timelike};
use chrono_tz::Tz;
use tracing::{debug, info};

use super::identity::resolve_identity;
use super::ledger::{AttendanceLedger, WriteOutcome, period_label, status_cell};
use super::lock::CellLocks;
use super::status::{AttendanceStatus, classify};
use super::window::{Period, resolve_period};
use super::AttendanceError;
use crate::config::{Config, ConfigError, LedgerConfig, MatchPolicy};
use crate::roster::{FileRosterSource, RosterEntry, RosterSource};
use crate::sheet::SheetStore;
use crate::timetable::{FileTimetableSource, TimetableSource};

#[derive(Debug, Clone)]
pub struct JoinEvent {
    pub display_name: String,
    pub join_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub identity: RosterEntry,
    pub period: Period,
    pub status: AttendanceStatus,
    pub cell: String,
    pub write: WriteOutcome,
}

#[derive(Debug, Clone)]
pub struct AttendanceSettings {
    pub sheet_name: String,
    pub timezone: Tz,
    pub match_policy: MatchPolicy,
    pub ledger: LedgerConfig,
}

impl AttendanceSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let timezone = config.timetable.timezone.parse::<Tz>().map_err(|_| {
            ConfigError::InvalidConfig(format!(
                "timetable.timezone is not a known timezone: {}",
                config.timetable.timezone
            ))
        })?;
        Ok(Self {
            sheet_name: config.sheet.sheet_name.clone(),
            timezone,
            match_policy: config.roster.match_policy,
            ledger: config.ledger.clone(),
        })
    }
}

/// Converts a participant join into one ledger cell.
///
/// Timetable and roster are re-read on every join; nothing about them is
/// cached between calls.
pub struct AttendanceService {
    timetable: Arc<dyn TimetableSource>,
    roster: Arc<dyn RosterSource>,
    store: Arc<dyn SheetStore>,
    settings: AttendanceSettings,
    locks: CellLocks,
}

impl AttendanceService {
    pub fn new(
        timetable: Arc<dyn TimetableSource>,
        roster: Arc<dyn RosterSource>,
        store: Arc<dyn SheetStore>,
        settings: AttendanceSettings,
    ) -> Self {
        Self {
            timetable,
            roster,
            store,
            settings,
            locks: CellLocks::new(),
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn SheetStore>) -> Result<Self, ConfigError> {
        Ok(Self::new(
            Arc::new(FileTimetableSource::new(&config.timetable.path)),
            Arc::new(FileRosterSource::new(&config.roster.path)),
            store,
            AttendanceSettings::from_config(config)?,
        ))
    }

    pub fn settings(&self) -> &AttendanceSettings {
        &self.settings
    }

    pub async fn handle(&self, event: &JoinEvent) -> Result<JoinOutcome, AttendanceError> {
        self.handle_join(&event.display_name, &event.join_time).await
    }

    /// `join_time` is an RFC 3339 timestamp in any offset.
    pub async fn handle_join(
        &self,
        display_name: &str,
        join_time: &str,
    ) -> Result<JoinOutcome, AttendanceError> {
        let joined_at = DateTime::parse_from_rfc3339(join_time)
            .map_err(|_| AttendanceError::InvalidTimestamp(join_time.to_string()))?
            .with_timezone(&self.settings.timezone);
        self.handle_join_at(display_name, joined_at).await
    }

    pub async fn handle_join_at(
        &self,
        display_name: &str,
        joined_at: DateTime<Tz>,
    ) -> Result<JoinOutcome, AttendanceError> {
        let timetable = self.timetable.load().await?;
        let roster = self.roster.load().await?;

        let identity = resolve_identity(&roster, display_name, self.settings.match_policy)?.clone();
        debug!("participant {} resolved to {} {}", display_name, identity.id, identity.name);

        let (hour, minute) = (joined_at.hour(), joined_at.minute());
        let minute_of_day = (hour * 60 + minute) as i32;
        let weekday = joined_at.weekday().number_from_monday();
        let period = resolve_period(&timetable, weekday, minute_of_day)?;
        debug!("join at {}:{:02} falls in {:?}", hour, minute, period);

        let status = classify(&timetable, minute_of_day, &period);
        let cell = status_cell(&self.settings.ledger, status, hour, minute);

        let date = joined_at.date_naive();
        let label = period_label(&self.settings.ledger, date, &period);
        let _guard = self.locks.acquire(&label).await;

        let mut ledger = AttendanceLedger::load(
            self.store.as_ref(),
            &self.settings.sheet_name,
            &self.settings.ledger,
        )
        .await?;
        let mut row = ledger.locate_row(&identity)?;
        let column = match ledger.find_column(&label) {
            Some(column) => column,
            None => {
                // All periods of a day append to one header row; provision
                // under the day's lock against a fresh header.
                let day = date.format("%Y-%m-%d").to_string();
                let _provisioning = self.locks.acquire(&day).await;
                ledger.reload().await?;
                row = ledger.locate_row(&identity)?;
                ledger.column_for(date, &period).await?
            }
        };
        let write = ledger.write_if_vacant(row, column, &cell).await?;

        match &write {
            WriteOutcome::Written => {
                info!("recorded {} for {} {} in {:?}", cell, identity.id, identity.name, period)
            }
            WriteOutcome::AlreadyRecorded(existing) => info!(
                "{} {} already recorded as {} in {:?}, ignoring {}",
                identity.id, identity.name, existing, period, cell
            ),
        }

        Ok(JoinOutcome {
            identity,
            period,
            status,
            cell,
            write,
        })
    }
}
