use thiserror::Error;

use crate::roster::RosterError;
use crate::sheet::StoreError;
use crate::timetable::TimetableError;

/// Every variant aborts the current join; nothing is retried.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("unimplemented event: {0}")]
    UnimplementedEvent(String),
    #[error("webhook payload is missing {0}")]
    MalformedPayload(&'static str),
    #[error("invalid join timestamp {0}")]
    InvalidTimestamp(String),
    #[error("attendance is not tracked on weekends")]
    WeekendNotTracked,
    #[error("no class period is open at {0}")]
    NoActiveWindow(String),
    #[error("no roster entry matches participant {0}")]
    UnknownParticipant(String),
    #[error("roster entry {id} {name} has no row in the sheet")]
    IdentityNotInSheet { id: String, name: String },
    #[error("sheet refused to write {0}")]
    LedgerWriteFailed(String),
    #[error(transparent)]
    Timetable(#[from] TimetableError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AttendanceError {
    /// Short kind name for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AttendanceError::UnimplementedEvent(_) => "unimplemented_event",
            AttendanceError::MalformedPayload(_) => "malformed_payload",
            AttendanceError::InvalidTimestamp(_) => "invalid_timestamp",
            AttendanceError::WeekendNotTracked => "weekend_not_tracked",
            AttendanceError::NoActiveWindow(_) => "no_active_window",
            AttendanceError::UnknownParticipant(_) => "unknown_participant",
            AttendanceError::IdentityNotInSheet { .. } => "identity_not_in_sheet",
            AttendanceError::LedgerWriteFailed(_) => "ledger_write_failed",
            AttendanceError::Timetable(_) => "timetable",
            AttendanceError::Roster(_) => "roster",
            AttendanceError::Store(_) => "store",
        }
    }
}
