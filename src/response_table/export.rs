//! Plain-text and CSV renderings of a projected table

use std::io::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::errors::AdminError;
use crate::response_table::columns::ColumnDescriptor;
use crate::response_table::row::ProjectedRow;

/// Text of `key` in `row`, empty when the row has no such column
pub fn cell_text(row: &ProjectedRow, key: &str) -> String {
    row.get(key).map(|cell| cell.display_text()).unwrap_or_default()
}

/// Fixed-width table, one terminal cell per ten pixels of column width
pub fn render_text_table(rows: &[ProjectedRow], columns: &[ColumnDescriptor]) -> String {
    if columns.is_empty() {
        return String::new();
    }

    let mut out = String::new();

    let header: Vec<String> = columns
        .iter()
        .map(|column| fit_width(&column.header, column.terminal_width() as usize))
        .collect();
    out.push_str(header.join(" │ ").trim_end());
    out.push('\n');

    let rule: Vec<String> = columns
        .iter()
        .map(|column| "─".repeat(column.terminal_width() as usize))
        .collect();
    out.push_str(&rule.join("─┼─"));
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| {
                let text = cell_text(row, &column.accessor).replace('\n', " ");
                fit_width(&text, column.terminal_width() as usize)
            })
            .collect();
        out.push_str(cells.join(" │ ").trim_end());
        out.push('\n');
    }

    out
}

/// Header of column headers, then one record per row; missing cells are empty
pub fn write_csv<W: Write>(
    rows: &[ProjectedRow],
    columns: &[ColumnDescriptor],
    writer: W,
) -> Result<(), AdminError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(columns.iter().map(|column| column.header.as_str()))?;
    for row in rows {
        csv_writer.write_record(columns.iter().map(|column| cell_text(row, &column.accessor)))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Pad or truncate to an exact display width (Unicode-aware)
pub fn fit_width(s: &str, max_width: usize) -> String {
    let display_width = s.width();
    if display_width <= max_width {
        let padding = max_width - display_width;
        return format!("{}{}", s, " ".repeat(padding));
    }

    let target_width = max_width.saturating_sub(1);
    let mut truncated = String::new();
    let mut current_width = 0;

    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        truncated.push(ch);
        current_width += ch_width;
    }

    let padding_needed = max_width.saturating_sub(current_width + 1);
    format!("{}…{}", truncated, " ".repeat(padding_needed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response_table::columns::derive_columns;
    use crate::response_table::row::CellValue;
    use tempfile::NamedTempFile;

    fn rows() -> Vec<ProjectedRow> {
        let mut first = ProjectedRow::new();
        first.insert("response_id", CellValue::text("1"));
        first.insert("user_title", CellValue::text("Dr. Jane Doe"));

        let mut second = ProjectedRow::new();
        second.insert("response_id", CellValue::text("2"));
        second.insert("Review1", CellValue::text("Alice, Bob"));

        vec![first, second]
    }

    #[test]
    fn test_csv_export_fills_missing_cells() {
        let rows = rows();
        let columns = derive_columns(&rows);
        let file = NamedTempFile::new().unwrap();

        write_csv(&rows, &columns, file.reopen().unwrap()).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            written,
            "response_id,user_title,Review1\n1,Dr. Jane Doe,\n2,,\"Alice, Bob\"\n"
        );
    }

    #[test]
    fn test_text_table_layout() {
        let rows = rows();
        let columns = derive_columns(&rows);
        let table = render_text_table(&rows, &columns);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("response_…"));
        assert!(lines[2].contains("Dr. Jane Doe"));
        assert!(render_text_table(&[], &[]).is_empty());
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("abc", 5), "abc  ");
        assert_eq!(fit_width("abcdef", 4), "abc…");
        assert_eq!(fit_width("日本語", 4), "日… ");
    }
}
