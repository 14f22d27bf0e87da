use chrono::NaiveDate;
use tracing::{debug, info};

use super::{AttendanceError, AttendanceStatus, Period};
use crate::config::LedgerConfig;
use crate::roster::RosterEntry;
use crate::sheet::{CellRange, SheetStore, cell_range};

/// Columns before this index hold the roster id and name of each row.
pub const FIRST_PERIOD_COLUMN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    AlreadyRecorded(String),
}

/// Renders a status cell such as `"출석 9:5"`. Hour and minute are not padded.
pub fn status_cell(config: &LedgerConfig, status: AttendanceStatus, hour: u32, minute: u32) -> String {
    let label = match status {
        AttendanceStatus::OnTime => &config.on_time_label,
        AttendanceStatus::Late => &config.late_label,
    };
    format!("{} {}:{}", label, hour, minute)
}

/// Header label of the column holding `period` on `date`.
pub fn period_label(config: &LedgerConfig, date: NaiveDate, period: &Period) -> String {
    let period = match period {
        Period::RollCall => config.roll_call_label.clone(),
        Period::Dismissal => config.dismissal_label.clone(),
        Period::Slot { index, .. } => format!("{}교시", index + 1),
    };
    format!("{} {}", date.format("%Y-%m-%d"), period)
}

/// Attendance sheet view built from one snapshot of the whole sheet.
///
/// Row 0 is the header. Each later row starts with a roster id and name,
/// followed by one status cell per date and period column.
pub struct AttendanceLedger<'a> {
    store: &'a dyn SheetStore,
    sheet_name: &'a str,
    config: &'a LedgerConfig,
    rows: Vec<Vec<String>>,
}

impl<'a> AttendanceLedger<'a> {
    pub async fn load(
        store: &'a dyn SheetStore,
        sheet_name: &'a str,
        config: &'a LedgerConfig,
    ) -> Result<Self, AttendanceError> {
        let rows = store.get_values(sheet_name).await?;
        debug!("loaded {} ledger rows from {}", rows.len(), sheet_name);
        Ok(Self {
            store,
            sheet_name,
            config,
            rows,
        })
    }

    /// Replaces the snapshot with the current sheet contents.
    pub async fn reload(&mut self) -> Result<(), AttendanceError> {
        self.rows = self.store.get_values(self.sheet_name).await?;
        Ok(())
    }

    fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    fn find_row(&self, column: usize, value: &str) -> Option<usize> {
        if value.is_empty() {
            return None;
        }
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| row.get(column).is_some_and(|cell| cell.trim() == value))
            .map(|(index, _)| index)
    }

    /// 0-based sheet row of `identity`.
    ///
    /// An id match anywhere in the sheet wins; the name column is only
    /// consulted when no row carries the id, since names repeat.
    pub fn locate_row(&self, identity: &RosterEntry) -> Result<usize, AttendanceError> {
        self.find_row(0, identity.id.trim())
            .or_else(|| self.find_row(1, identity.name.trim()))
            .ok_or_else(|| AttendanceError::IdentityNotInSheet {
                id: identity.id.clone(),
                name: identity.name.clone(),
            })
    }

    pub fn find_column(&self, label: &str) -> Option<usize> {
        self.header()
            .iter()
            .enumerate()
            .skip(FIRST_PERIOD_COLUMN)
            .find(|(_, value)| value.trim() == label)
            .map(|(index, _)| index)
    }

    /// Column for `period` on `date`, appending it after the last header
    /// cell the first time the period is seen that day.
    pub async fn column_for(
        &mut self,
        date: NaiveDate,
        period: &Period,
    ) -> Result<usize, AttendanceError> {
        let label = period_label(self.config, date, period);
        if let Some(column) = self.find_column(&label) {
            return Ok(column);
        }

        let column = self
            .header()
            .iter()
            .rposition(|value| !value.trim().is_empty())
            .map_or(FIRST_PERIOD_COLUMN, |last| (last + 1).max(FIRST_PERIOD_COLUMN));

        let (range, values) = if self.config.mark_absent_on_provision && self.rows.len() > 1 {
            let last_row = self.rows.len() - 1;
            let mut values = vec![vec![label.clone()]];
            values.extend(self.rows.iter().skip(1).map(|row| {
                let enrolled = row.iter().take(FIRST_PERIOD_COLUMN).any(|v| !v.trim().is_empty());
                if enrolled {
                    vec![self.config.absent_marker.clone()]
                } else {
                    vec![String::new()]
                }
            }));
            (
                CellRange::column(self.sheet_name, column, 0, last_row).to_string(),
                values,
            )
        } else {
            (
                cell_range(self.sheet_name, column, 0),
                vec![vec![label.clone()]],
            )
        };

        if !self.store.set_values(&range, values.clone()).await? {
            return Err(AttendanceError::LedgerWriteFailed(range));
        }
        info!("provisioned ledger column {} at {}", label, range);

        if self.rows.is_empty() {
            self.rows.push(Vec::new());
        }
        for (row, value) in values.into_iter().enumerate() {
            let cells = &mut self.rows[row];
            if cells.len() <= column {
                cells.resize(column + 1, String::new());
            }
            cells[column] = value.into_iter().next().unwrap_or_default();
        }

        Ok(column)
    }

    /// Current value of a cell read from the store, `None` when empty.
    pub async fn read_cell(
        &self,
        row: usize,
        column: usize,
    ) -> Result<Option<String>, AttendanceError> {
        let values = self
            .store
            .get_values(&cell_range(self.sheet_name, column, row))
            .await?;
        Ok(values
            .into_iter()
            .next()
            .and_then(|cells| cells.into_iter().next())
            .filter(|value| !value.trim().is_empty()))
    }

    pub fn is_vacant(&self, value: Option<&str>) -> bool {
        match value {
            None => true,
            Some(value) => value.trim().is_empty() || value.trim() == self.config.absent_marker,
        }
    }

    /// Writes `value` unless the cell already holds a recorded status.
    pub async fn write_if_vacant(
        &self,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<WriteOutcome, AttendanceError> {
        let current = self.read_cell(row, column).await?;
        if !self.is_vacant(current.as_deref()) {
            return Ok(WriteOutcome::AlreadyRecorded(current.unwrap_or_default()));
        }

        let range = cell_range(self.sheet_name, column, row);
        match self.store.set_values(&range, vec![vec![value.to_string()]]).await {
            Ok(true) => Ok(WriteOutcome::Written),
            Ok(false) => Err(AttendanceError::LedgerWriteFailed(range)),
            Err(e) => Err(AttendanceError::LedgerWriteFailed(format!("{}: {}", range, e))),
        }
    }
}
