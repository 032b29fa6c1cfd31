//! Scrollable terminal rendering of projected response rows

use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::response_table::export::fit_width;
use crate::response_table::{CellValue, ColumnDescriptor, ProjectedRow};
use crate::tui::ui::Styles;

const COLUMN_SPACING: u16 = 1;

/// Cursor over rows and columns; columns scroll horizontally
#[derive(Debug, Default)]
pub struct ResponseTableView {
    pub state: TableState,
    pub column_offset: usize,
    pub selected_column: usize,
}

impl ResponseTableView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the cursor inside a table of the given shape
    pub fn clamp(&mut self, row_count: usize, column_count: usize) {
        match (self.state.selected(), row_count) {
            (_, 0) => self.state.select(None),
            (None, _) => self.state.select(Some(0)),
            (Some(i), n) if i >= n => self.state.select(Some(n - 1)),
            _ => {}
        }
        if column_count == 0 {
            self.selected_column = 0;
            self.column_offset = 0;
        } else {
            self.selected_column = self.selected_column.min(column_count - 1);
            self.column_offset = self.column_offset.min(self.selected_column);
        }
    }

    pub fn next_row(&mut self, row_count: usize) {
        if row_count == 0 {
            return;
        }
        let next = self.state.selected().map(|i| (i + 1).min(row_count - 1)).unwrap_or(0);
        self.state.select(Some(next));
    }

    pub fn previous_row(&mut self) {
        let previous = self.state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
        self.state.select(Some(previous));
    }

    pub fn next_column(&mut self, column_count: usize) {
        if self.selected_column + 1 < column_count {
            self.selected_column += 1;
        }
    }

    pub fn previous_column(&mut self) {
        self.selected_column = self.selected_column.saturating_sub(1);
        if self.selected_column < self.column_offset {
            self.column_offset = self.selected_column;
        }
    }

    /// Number of columns from `column_offset` that fit into `width` cells
    fn visible_count(&self, columns: &[ColumnDescriptor], width: u16) -> usize {
        let mut used = 0u16;
        let mut count = 0;
        for column in columns.iter().skip(self.column_offset) {
            let needed = column.terminal_width() + COLUMN_SPACING;
            if count > 0 && used + needed > width {
                break;
            }
            used += needed;
            count += 1;
        }
        count
    }

    /// Scroll so the selected column is on screen
    fn scroll_to_selection(&mut self, columns: &[ColumnDescriptor], width: u16) {
        while self.column_offset < self.selected_column
            && self.column_offset + self.visible_count(columns, width) <= self.selected_column
        {
            self.column_offset += 1;
        }
    }

    /// Column and cell under the cursor
    pub fn selected_cell<'a>(
        &self,
        rows: &'a [ProjectedRow],
        columns: &'a [ColumnDescriptor],
    ) -> Option<(&'a ColumnDescriptor, Option<&'a CellValue>)> {
        let row = rows.get(self.state.selected()?)?;
        let column = columns.get(self.selected_column)?;
        Some((column, row.get(&column.accessor)))
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        rows: &[ProjectedRow],
        columns: &[ColumnDescriptor],
        title: &str,
    ) {
        self.clamp(rows.len(), columns.len());
        let inner_width = area.width.saturating_sub(2);
        self.scroll_to_selection(columns, inner_width);

        let visible: Vec<(usize, &ColumnDescriptor)> = columns
            .iter()
            .enumerate()
            .skip(self.column_offset)
            .take(self.visible_count(columns, inner_width))
            .collect();

        let header = Row::new(visible.iter().map(|(i, column)| {
            let style = if *i == self.selected_column {
                Styles::selected()
            } else {
                Styles::header()
            };
            Cell::from(Span::styled(
                fit_width(&column.header, column.terminal_width() as usize),
                style,
            ))
        }));

        let body: Vec<Row> = rows
            .iter()
            .map(|row| {
                Row::new(visible.iter().map(|(_, column)| {
                    let width = column.terminal_width() as usize;
                    match row.get(&column.accessor) {
                        Some(cell) => {
                            let text = fit_width(&cell.display_text().replace('\n', " "), width);
                            let style = match cell {
                                CellValue::FileLink(_)
                                | CellValue::FileLinks { .. }
                                | CellValue::ResponseLink { .. } => Styles::link(),
                                _ => Styles::default(),
                            };
                            Cell::from(Span::styled(text, style))
                        }
                        None => Cell::from(""),
                    }
                }))
            })
            .collect();

        let widths: Vec<Constraint> = visible
            .iter()
            .map(|(_, column)| Constraint::Length(column.terminal_width()))
            .collect();

        let more = if self.column_offset + visible.len() < columns.len() {
            " ▸"
        } else {
            ""
        };
        let title = format!(
            "{} ({} rows, {} columns){}",
            title,
            rows.len(),
            columns.len(),
            more
        );

        let table = Table::new(body, widths)
            .header(header)
            .column_spacing(COLUMN_SPACING)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(table, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(keys: &[&str]) -> Vec<ColumnDescriptor> {
        keys.iter().map(|key| ColumnDescriptor::new(key)).collect()
    }

    #[test]
    fn test_clamp_on_shrinking_table() {
        let mut view = ResponseTableView::new();
        view.clamp(3, 2);
        assert_eq!(view.state.selected(), Some(0));

        view.next_row(3);
        view.next_row(3);
        view.next_row(3);
        assert_eq!(view.state.selected(), Some(2));
        view.next_column(2);
        view.next_column(2);
        assert_eq!(view.selected_column, 1);

        view.clamp(1, 1);
        assert_eq!(view.state.selected(), Some(0));
        assert_eq!(view.selected_column, 0);

        view.clamp(0, 0);
        assert_eq!(view.state.selected(), None);
    }

    #[test]
    fn test_horizontal_scroll_follows_selection() {
        let columns = columns(&["response_id", "user_title", "Essay", "Review1"]);
        let mut view = ResponseTableView::new();

        // 11 + 19 = 30 cells fit the first two columns only
        assert_eq!(view.visible_count(&columns, 30), 2);

        view.selected_column = 3;
        view.scroll_to_selection(&columns, 30);
        assert_eq!(view.column_offset, 2);

        view.previous_column();
        view.previous_column();
        assert_eq!(view.column_offset, 1);
    }

    #[test]
    fn test_selected_cell_with_missing_key() {
        let mut row = ProjectedRow::new();
        row.insert("response_id", CellValue::text("1"));
        let rows = vec![row];
        let columns = columns(&["response_id", "Essay"]);

        let mut view = ResponseTableView::new();
        view.clamp(rows.len(), columns.len());
        let (column, cell) = view.selected_cell(&rows, &columns).unwrap();
        assert_eq!(column.id, "response_id");
        assert_eq!(cell.map(|c| c.display_text()), Some("1".to_string()));

        view.next_column(columns.len());
        let (_, cell) = view.selected_cell(&rows, &columns).unwrap();
        assert!(cell.is_none());
    }
}
