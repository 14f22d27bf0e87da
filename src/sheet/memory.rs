use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{CellRange, SheetStore, StoreError};

/// In-process sheet grid used in place of the remote API.
#[derive(Default)]
pub struct MemorySheetStore {
    sheets: RwLock<HashMap<String, Vec<Vec<String>>>>,
    reject_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(name: &str, rows: &[&[&str]]) -> Self {
        let store = Self::new();
        let grid = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        store.sheets.write().insert(name.to_string(), grid);
        store
    }

    /// Makes every subsequent `set_values` report that nothing was written.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn cell(&self, sheet: &str, column: usize, row: usize) -> Option<String> {
        self.sheets
            .read()
            .get(sheet)
            .and_then(|grid| grid.get(row))
            .and_then(|cells| cells.get(column))
            .filter(|value| !value.is_empty())
            .cloned()
    }

    pub fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        self.sheets.read().get(sheet).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let sheets = self.sheets.read();
        if !range.contains('!') {
            return Ok(sheets.get(range).cloned().unwrap_or_default());
        }

        let range = CellRange::parse(range)?;
        let Some(grid) = sheets.get(&range.sheet) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<Vec<String>> = (range.start.1..=range.end.1)
            .map(|row| {
                let cells = grid.get(row).map(Vec::as_slice).unwrap_or_default();
                let mut values: Vec<String> = (range.start.0..=range.end.0)
                    .map(|column| cells.get(column).cloned().unwrap_or_default())
                    .collect();
                while values.last().is_some_and(String::is_empty) {
                    values.pop();
                }
                values
            })
            .collect();
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn set_values(&self, range: &str, values: Vec<Vec<String>>) -> Result<bool, StoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let range = CellRange::parse(range)?;
        if values.len() > range.height() || values.iter().any(|row| row.len() > range.width()) {
            return Err(StoreError::InvalidRange(format!(
                "{} values do not fit {}",
                values.len(),
                range
            )));
        }

        let mut sheets = self.sheets.write();
        let grid = sheets.entry(range.sheet.clone()).or_default();
        for (row_offset, row_values) in values.into_iter().enumerate() {
            let row = range.start.1 + row_offset;
            if grid.len() <= row {
                grid.resize(row + 1, Vec::new());
            }
            for (column_offset, value) in row_values.into_iter().enumerate() {
                let column = range.start.0 + column_offset;
                let cells = &mut grid[row];
                if cells.len() <= column {
                    cells.resize(column + 1, String::new());
                }
                cells[column] = value;
            }
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySheetStore;
    use crate::sheet::SheetStore;

    #[tokio::test]
    async fn set_then_get_single_cell() {
        let store = MemorySheetStore::new();

        let written = store
            .set_values("메인!C2:C2", vec![vec!["출석 9:5".to_string()]])
            .await
            .expect("write cell");
        assert!(written);

        let values = store.get_values("메인!C2:C2").await.expect("read cell");
        assert_eq!(values, vec![vec!["출석 9:5".to_string()]]);
        assert_eq!(store.cell("메인", 2, 1).as_deref(), Some("출석 9:5"));
    }

    #[tokio::test]
    async fn empty_cell_reads_as_no_rows() {
        let store = MemorySheetStore::with_sheet("메인", &[&["id", "name"]]);

        let values = store.get_values("메인!D9:D9").await.expect("read cell");
        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn rejected_writes_report_false() {
        let store = MemorySheetStore::new();
        store.reject_writes(true);

        let written = store
            .set_values("메인!A1:A1", vec![vec!["x".to_string()]])
            .await
            .expect("request accepted");
        assert!(!written);
        assert_eq!(store.write_count(), 0);
    }
}
