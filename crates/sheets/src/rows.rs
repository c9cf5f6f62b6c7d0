//! Pure row policy: which row a new entry lands in and what its cells look
//! like. Kept free of I/O so the write policy is testable without a network.

use shiftbot_core::domain::shift::ShiftRecord;
use shiftbot_core::gateway::{SheetStats, StoredEntry};

/// First spreadsheet row that can hold entry data; row 1 is the header.
pub const DATA_START_ROW: u32 = 2;

/// A date cell whose value leads with `-` marks a reusable placeholder row.
const PLACEHOLDER_PREFIX: char = '-';

/// Exactly the three raw fields the store owns: date, start, end. Hour and
/// pay columns are derived by the sheet's own formulas.
pub fn entry_cells(record: &ShiftRecord) -> [String; 3] {
    [
        record.date.format("%Y-%m-%d").to_string(),
        record.start_time.format("%H:%M").to_string(),
        record.end_time.format("%H:%M").to_string(),
    ]
}

/// Scans the date column (starting at `DATA_START_ROW`) for the first row
/// that is empty or carries a placeholder marker. `None` means append past
/// the last row.
pub fn first_reusable_row(date_cells: &[String]) -> Option<u32> {
    date_cells.iter().position(is_reusable_cell).map(|offset| DATA_START_ROW + offset as u32)
}

fn is_reusable_cell(cell: &String) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || trimmed.starts_with(PLACEHOLDER_PREFIX)
}

/// Summarizes the date column for the admin `stats` command.
pub fn column_stats(date_cells: &[String]) -> SheetStats {
    SheetStats {
        data_rows: date_cells.len(),
        last_entry_date: date_cells
            .iter()
            .rev()
            .find(|cell| !cell.trim().is_empty())
            .map(|cell| cell.trim().to_owned()),
    }
}

/// The most recent `limit` rows, oldest first, padded cells included.
pub fn tail_entries(rows: &[Vec<String>], limit: usize) -> Vec<StoredEntry> {
    let skip = rows.len().saturating_sub(limit);
    rows.iter()
        .skip(skip)
        .map(|row| StoredEntry {
            date: row.first().cloned().unwrap_or_default(),
            start_time: row.get(1).cloned().unwrap_or_default(),
            end_time: row.get(2).cloned().unwrap_or_default(),
        })
        .collect()
}
