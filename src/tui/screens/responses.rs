//! Response list screen: question picker plus the projected response table

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::i18n::Translator;
use crate::response_table::{PageState, RefreshTicket, ResponseListPage, ResponseProjector};
use crate::tui::components::response_table::ResponseTableView;
use crate::tui::ui::{centered_rect, Styles};

/// Work the app has to start on behalf of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsesAction {
    None,
    LoadQuestions,
    Refresh(RefreshTicket),
    Export,
    Back,
}

pub struct ResponsesScreen {
    pub page: ResponseListPage,
    pub question_cursor: ListState,
    pub table: ResponseTableView,
    pub show_detail: bool,
}

impl ResponsesScreen {
    pub fn new(projector: ResponseProjector) -> Self {
        Self {
            page: ResponseListPage::new(projector),
            question_cursor: ListState::default(),
            table: ResponseTableView::new(),
            show_detail: false,
        }
    }

    /// Questions are fetched once, the first time the screen is opened
    pub fn needs_questions(&self) -> bool {
        !self.page.questions_loaded() && self.page.state() != PageState::LoadingQuestions
    }

    fn highlighted_question_id(&self) -> Option<i64> {
        self.question_cursor
            .selected()
            .and_then(|i| self.page.questions().get(i))
            .map(|question| question.question_id)
    }

    fn move_question_cursor(&mut self, forward: bool) {
        let count = self.page.questions().len();
        if count == 0 {
            return;
        }
        let next = match self.question_cursor.selected() {
            Some(i) if forward => (i + 1) % count,
            Some(0) | None if !forward => count - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.question_cursor.select(Some(next));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ResponsesAction {
        if self.show_detail {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.show_detail = false;
            }
            return ResponsesAction::None;
        }

        let row_count = self.page.rows().len();
        let column_count = self.page.columns().len();

        match key.code {
            KeyCode::Esc if self.page.question_list_visible => {
                self.page.toggle_question_list();
                ResponsesAction::None
            }
            KeyCode::Esc => ResponsesAction::Back,
            KeyCode::Char('s') => {
                self.page.toggle_question_list();
                if self.page.question_list_visible && self.question_cursor.selected().is_none() {
                    self.question_cursor.select(Some(0));
                }
                if self.page.question_list_visible && self.needs_questions() {
                    ResponsesAction::LoadQuestions
                } else {
                    ResponsesAction::None
                }
            }
            KeyCode::Char('u') => ResponsesAction::Refresh(self.page.begin_refresh()),
            KeyCode::Char('i') => {
                self.page.toggle_include_unsubmitted();
                ResponsesAction::None
            }
            KeyCode::Up if self.page.question_list_visible => {
                self.move_question_cursor(false);
                ResponsesAction::None
            }
            KeyCode::Down if self.page.question_list_visible => {
                self.move_question_cursor(true);
                ResponsesAction::None
            }
            KeyCode::Char(' ') if self.page.question_list_visible => match self.highlighted_question_id() {
                Some(id) => ResponsesAction::Refresh(self.page.toggle_selection(id)),
                None => ResponsesAction::None,
            },
            KeyCode::Up => {
                self.table.previous_row();
                ResponsesAction::None
            }
            KeyCode::Down => {
                self.table.next_row(row_count);
                ResponsesAction::None
            }
            KeyCode::Left => {
                self.table.previous_column();
                ResponsesAction::None
            }
            KeyCode::Right => {
                self.table.next_column(column_count);
                ResponsesAction::None
            }
            KeyCode::Enter if row_count > 0 => {
                self.show_detail = true;
                ResponsesAction::None
            }
            KeyCode::Char('e') if self.page.has_table => ResponsesAction::Export,
            _ => ResponsesAction::None,
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, translator: &dyn Translator) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        self.draw_controls(f, chunks[0], translator);

        let body = if self.page.question_list_visible {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(chunks[1]);
            self.draw_question_list(f, columns[0], translator);
            columns[1]
        } else {
            chunks[1]
        };

        self.draw_table(f, body, translator);

        if self.show_detail {
            self.draw_detail(f, area);
        }
    }

    fn draw_controls(&self, f: &mut Frame, area: Rect, translator: &dyn Translator) {
        let checkbox = if self.page.include_unsubmitted { "[x]" } else { "[ ]" };
        let mut spans = vec![
            Span::styled(format!("{} ", checkbox), Styles::info()),
            Span::raw(translator.t("Include un-submitted")),
            Span::raw(format!(
                "  |  {}: {}",
                translator.t("Selected questions"),
                self.page.selection().len()
            )),
        ];

        match self.page.state() {
            PageState::LoadingQuestions => {
                spans.push(Span::styled(format!("  |  {}", translator.t("Loading questions...")), Styles::warning()))
            }
            PageState::Refreshing => {
                spans.push(Span::styled(format!("  |  {}", translator.t("Loading responses...")), Styles::warning()))
            }
            PageState::Idle if self.page.update_pending => {
                spans.push(Span::styled(format!("  |  {}", translator.t("Press u to update")), Styles::warning()))
            }
            PageState::Idle => {
                if let Some(refreshed) = self.page.last_refreshed {
                    spans.push(Span::styled(
                        format!("  |  {} {}", translator.t("Updated"), refreshed.format("%H:%M:%S")),
                        Styles::inactive(),
                    ));
                }
            }
        }

        let controls = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(translator.t("Response List"))
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(controls, area);
    }

    fn draw_question_list(&mut self, f: &mut Frame, area: Rect, translator: &dyn Translator) {
        let selection = self.page.selection();
        let items: Vec<ListItem> = self
            .page
            .questions()
            .iter()
            .map(|question| {
                let mark = if selection.contains(question.question_id) { "[x]" } else { "[ ]" };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", mark), Styles::info()),
                    Span::raw(question.headline.clone()),
                ]))
            })
            .collect();

        let title = if self.page.state() == PageState::LoadingQuestions {
            translator.t("Loading questions...")
        } else {
            translator.t("Questions")
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());
        f.render_stateful_widget(list, area, &mut self.question_cursor);
    }

    fn draw_table(&mut self, f: &mut Frame, area: Rect, translator: &dyn Translator) {
        if !self.page.has_table {
            let hint = Paragraph::new(translator.t(
                "Press s to choose questions, then u to build the table",
            ))
            .style(Styles::inactive())
            .block(Block::default().borders(Borders::ALL).border_style(Styles::inactive_border()));
            f.render_widget(hint, area);
            return;
        }

        let columns = self.page.columns();
        self.table
            .render(f, area, self.page.rows(), &columns, &translator.t("Responses"));
    }

    fn draw_detail(&self, f: &mut Frame, area: Rect) {
        let columns = self.page.columns();
        let Some((column, cell)) = self.table.selected_cell(self.page.rows(), &columns) else {
            return;
        };

        let mut lines = vec![Line::from(
            cell.map(|cell| cell.display_text()).unwrap_or_default(),
        )];
        if let Some(detail) = cell.and_then(|cell| cell.detail_text()) {
            lines.push(Line::from(""));
            lines.extend(detail.lines().map(|line| Line::from(Span::styled(line.to_string(), Styles::link()))));
        }

        let popup_area = centered_rect(70, 50, area);
        f.render_widget(Clear, popup_area);
        let popup = Paragraph::new(lines)
            .style(Style::default())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(column.header.as_str())
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );
        f.render_widget(popup, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AdminError;
    use crate::models::Question;
    use crate::response_table::ProjectorConfig;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen() -> ResponsesScreen {
        ResponsesScreen::new(ResponseProjector::new(ProjectorConfig::new("http://api")))
    }

    fn questions() -> Vec<Question> {
        vec![
            Question { question_id: 3, headline: "Essay".into(), value: json!(null) },
            Question { question_id: 8, headline: "CV".into(), value: json!(null) },
        ]
    }

    #[test]
    fn test_opening_picker_requests_questions_once() {
        let mut screen = screen();
        assert_eq!(screen.handle_key(key(KeyCode::Char('s'))), ResponsesAction::LoadQuestions);
        screen.page.begin_question_load();
        assert!(!screen.needs_questions());
        screen.page.apply_questions(questions());

        assert_eq!(screen.handle_key(key(KeyCode::Char('s'))), ResponsesAction::None);
        assert!(!screen.page.question_list_visible);
        assert_eq!(screen.handle_key(key(KeyCode::Char('s'))), ResponsesAction::None);
        assert!(screen.page.question_list_visible);
    }

    #[test]
    fn test_event_without_questions_is_not_refetched() {
        let mut screen = screen();
        assert_eq!(screen.handle_key(key(KeyCode::Char('s'))), ResponsesAction::LoadQuestions);
        screen.page.begin_question_load();
        screen.page.apply_questions(Vec::new());

        screen.handle_key(key(KeyCode::Char('s')));
        assert_eq!(screen.handle_key(key(KeyCode::Char('s'))), ResponsesAction::None);
        assert!(screen.page.question_list_visible);
        assert!(!screen.needs_questions());
    }

    #[test]
    fn test_failed_question_load_is_retried() {
        let mut screen = screen();
        screen.handle_key(key(KeyCode::Char('s')));
        screen.page.begin_question_load();
        screen.page.fail_question_load(&AdminError::MissingEvent);

        assert!(screen.needs_questions());
        screen.handle_key(key(KeyCode::Char('s')));
        assert_eq!(screen.handle_key(key(KeyCode::Char('s'))), ResponsesAction::LoadQuestions);
    }

    #[test]
    fn test_space_toggles_highlighted_question_and_refreshes() {
        let mut screen = screen();
        screen.page.apply_questions(questions());
        screen.handle_key(key(KeyCode::Char('s')));
        screen.handle_key(key(KeyCode::Down));

        let action = screen.handle_key(key(KeyCode::Char(' ')));
        assert!(matches!(action, ResponsesAction::Refresh(ticket) if ticket.generation == 1));
        assert!(screen.page.selection().contains(8));
        assert!(screen.page.question_list_visible);
    }

    #[test]
    fn test_update_hides_picker_and_esc_goes_back() {
        let mut screen = screen();
        screen.page.apply_questions(questions());
        screen.handle_key(key(KeyCode::Char('s')));
        screen.handle_key(key(KeyCode::Char('i')));

        let action = screen.handle_key(key(KeyCode::Char('u')));
        assert!(matches!(action, ResponsesAction::Refresh(ticket) if ticket.include_unsubmitted));
        assert!(!screen.page.question_list_visible);
        assert_eq!(screen.handle_key(key(KeyCode::Esc)), ResponsesAction::Back);
    }

    #[test]
    fn test_export_needs_a_table() {
        let mut screen = screen();
        assert_eq!(screen.handle_key(key(KeyCode::Char('e'))), ResponsesAction::None);

        let ticket = screen.page.begin_refresh();
        screen.page.apply_responses(ticket, &[]);
        assert_eq!(screen.handle_key(key(KeyCode::Char('e'))), ResponsesAction::Export);
    }
}
