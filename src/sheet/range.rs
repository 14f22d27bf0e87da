use super::StoreError;

/// Spreadsheet column letters for a 0-based column index: 0 -> A, 25 -> Z, 26 -> AA.
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Inverse of [`column_letter`].
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut n = 0usize;
    for c in letters.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        n = n * 26 + (c as usize - 'A' as usize + 1);
    }
    Some(n - 1)
}

/// Single-cell range with 0-based coordinates, e.g. `(sheet, 2, 3)` -> `sheet!C4:C4`.
pub fn cell_range(sheet: &str, column: usize, row: usize) -> String {
    CellRange::cell(sheet, column, row).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: String,
    /// 0-based (column, row) of the top-left cell.
    pub start: (usize, usize),
    /// 0-based (column, row) of the bottom-right cell.
    pub end: (usize, usize),
}

impl CellRange {
    pub fn cell(sheet: &str, column: usize, row: usize) -> Self {
        Self {
            sheet: sheet.to_string(),
            start: (column, row),
            end: (column, row),
        }
    }

    pub fn column(sheet: &str, column: usize, first_row: usize, last_row: usize) -> Self {
        Self {
            sheet: sheet.to_string(),
            start: (column, first_row),
            end: (column, last_row),
        }
    }

    pub fn width(&self) -> usize {
        self.end.0 - self.start.0 + 1
    }

    pub fn height(&self) -> usize {
        self.end.1 - self.start.1 + 1
    }

    /// Parses `Sheet!A1:B2` or `Sheet!A1`. A bare sheet name is not a cell range.
    pub fn parse(range: &str) -> Result<Self, StoreError> {
        let invalid = || StoreError::InvalidRange(range.to_string());
        let (sheet, cells) = range.rsplit_once('!').ok_or_else(invalid)?;
        let (first, last) = cells.split_once(':').unwrap_or((cells, cells));
        let start = parse_cell(first).ok_or_else(invalid)?;
        let end = parse_cell(last).ok_or_else(invalid)?;
        if end.0 < start.0 || end.1 < start.1 {
            return Err(invalid());
        }
        Ok(Self {
            sheet: sheet.to_string(),
            start,
            end,
        })
    }
}

impl std::fmt::Display for CellRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}!{}{}:{}{}",
            self.sheet,
            column_letter(self.start.0),
            self.start.1 + 1,
            column_letter(self.end.0),
            self.end.1 + 1
        )
    }
}

fn parse_cell(cell: &str) -> Option<(usize, usize)> {
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    let column = column_index(letters)?;
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((column, row - 1))
}
