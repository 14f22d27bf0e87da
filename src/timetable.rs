use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WEEKDAYS: usize = 5;

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("failed to read timetable: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse timetable: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid timetable: {0}")]
    Invalid(String),
}

/// Daily schedule. All times are minutes since local midnight.
///
/// `timetable[d][i]` is the subject taught in slot `i` (starting at
/// `times[i]`) on weekday `d + 1`, Monday being 1. An empty label means no
/// class in that slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub start_time: i32,
    pub end_time: i32,
    pub times: Vec<i32>,
    pub timetable: Vec<Vec<String>>,
}

impl Timetable {
    pub fn from_json(content: &str) -> Result<Self, TimetableError> {
        let timetable: Timetable = serde_json::from_str(content)?;
        timetable.validate()?;
        Ok(timetable)
    }

    /// Subject labels for an ISO weekday, `None` on weekends.
    pub fn labels_for(&self, weekday: u32) -> Option<&[String]> {
        if weekday == 0 || weekday as usize > WEEKDAYS {
            return None;
        }
        self.timetable.get(weekday as usize - 1).map(Vec::as_slice)
    }

    pub fn validate(&self) -> Result<(), TimetableError> {
        if self.timetable.len() != WEEKDAYS {
            return Err(TimetableError::Invalid(format!(
                "expected {} weekdays, found {}",
                WEEKDAYS,
                self.timetable.len()
            )));
        }

        for (day, labels) in self.timetable.iter().enumerate() {
            if labels.len() != self.times.len() {
                return Err(TimetableError::Invalid(format!(
                    "weekday {} has {} labels for {} slots",
                    day + 1,
                    labels.len(),
                    self.times.len()
                )));
            }
        }

        let mut previous = self.start_time;
        for &time in self.times.iter().chain(std::iter::once(&self.end_time)) {
            if time <= previous {
                return Err(TimetableError::Invalid(format!(
                    "times must increase from startTime to endTime, {} follows {}",
                    time, previous
                )));
            }
            previous = time;
        }

        if self.end_time >= 24 * 60 {
            return Err(TimetableError::Invalid(format!(
                "endTime {} is past midnight",
                self.end_time
            )));
        }

        Ok(())
    }
}

#[async_trait]
pub trait TimetableSource: Send + Sync {
    async fn load(&self) -> Result<Timetable, TimetableError>;
}

/// Reads the timetable JSON from disk on every call so edits apply without a restart.
pub struct FileTimetableSource {
    path: PathBuf,
}

impl FileTimetableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TimetableSource for FileTimetableSource {
    async fn load(&self) -> Result<Timetable, TimetableError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Timetable::from_json(&content)
    }
}
