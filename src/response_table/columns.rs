//! Column derivation for projected rows

use serde::Serialize;

use crate::response_table::row::ProjectedRow;

pub const QUESTION_COLUMN_WIDTH: u16 = 200;
pub const PERSON_OR_DATE_COLUMN_WIDTH: u16 = 180;
pub const DEFAULT_COLUMN_WIDTH: u16 = 100;

/// Column identity, label and rendering width in pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub id: String,
    pub header: String,
    pub accessor: String,
    pub width: u16,
}

impl ColumnDescriptor {
    pub fn new(key: &str) -> Self {
        Self {
            id: key.to_string(),
            header: key.to_string(),
            accessor: key.to_string(),
            width: width_for(key),
        }
    }

    /// Width in terminal cells, one cell per ten pixels
    pub fn terminal_width(&self) -> u16 {
        (self.width / 10).max(1)
    }
}

/// Union of row keys in first-seen order, one descriptor per key
pub fn derive_columns(rows: &[ProjectedRow]) -> Vec<ColumnDescriptor> {
    let mut keys: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }

    keys.into_iter().map(ColumnDescriptor::new).collect()
}

/// Width policy by naming convention; checks are case-sensitive substrings
pub fn width_for(key: &str) -> u16 {
    if key.contains("question") {
        return QUESTION_COLUMN_WIDTH;
    }

    if key.contains("user") || key.contains("Review") || key.contains("date") {
        PERSON_OR_DATE_COLUMN_WIDTH
    } else {
        DEFAULT_COLUMN_WIDTH
    }
}
