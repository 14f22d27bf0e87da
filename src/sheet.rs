use async_trait::async_trait;
use thiserror::Error;

pub mod google;
pub mod range;

#[cfg(test)]
pub mod memory;

pub use self::google::GoogleSheetsClient;
pub use self::range::{CellRange, cell_range, column_index, column_letter};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sheet request failed: {0}")]
    Transport(String),
    #[error("sheet api returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid range: {0}")]
    InvalidRange(String),
}

/// Range-addressed access to a spreadsheet used as a table.
///
/// `get_values` takes either a bare sheet name (whole sheet) or A1 notation
/// such as `메인!C4:C4`. Rows come back in order; trailing empty cells may be
/// omitted, so callers treat a missing cell as empty.
#[async_trait]
pub trait SheetStore: Send + Sync {
    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// Returns `false` when the store accepted the request but reported that
    /// nothing was written.
    async fn set_values(&self, range: &str, values: Vec<Vec<String>>) -> Result<bool, StoreError>;
}
