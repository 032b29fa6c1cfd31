//! Tag configuration screen: tag list plus the entry form

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::i18n::Translator;
use crate::models::TagType;
use crate::tags::{field_label, TagConfigPage, TagField, TagValidationError};
use crate::tui::components::form_field::{FormField, FormFieldType};
use crate::tui::ui::{centered_rect, Styles};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagsAction {
    None,
    Load,
    Save,
    Delete(i64),
    Back,
}

/// Which part of the draft a form field edits
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldBinding {
    Text { field: TagField, lang: String },
    Type,
}

pub struct TagsScreen {
    /// `None` when no event is configured
    pub page: Option<TagConfigPage>,
    pub list: ListState,
    pub form: Vec<FormField>,
    bindings: Vec<FieldBinding>,
    pub focused_field: usize,
    pub pending_delete: Option<i64>,
    pub loaded: bool,
}

impl TagsScreen {
    pub fn new(page: Option<TagConfigPage>) -> Self {
        Self {
            page,
            list: ListState::default(),
            form: Vec::new(),
            bindings: Vec::new(),
            focused_field: 0,
            pending_delete: None,
            loaded: false,
        }
    }

    /// True while the entry form takes keyboard input
    pub fn is_editing(&self) -> bool {
        self.page.as_ref().map_or(false, |page| page.entry_visible)
    }

    /// Rebuild the form widgets from the page draft
    fn build_form(&mut self, translator: &dyn Translator) {
        let Some(page) = &self.page else {
            return;
        };

        let mut form = Vec::new();
        let mut bindings = Vec::new();

        for (field, base, description) in [
            (TagField::Name, "Tag Name", None),
            (TagField::Description, "Tag Description", Some("Optional")),
        ] {
            for lang in page.languages() {
                let label = field_label(&translator.t(base), &lang.description, page.is_multilingual);
                let value = page.draft.text(field, &lang.code);
                let widget = match field {
                    TagField::Name => FormField::text_box(&label),
                    TagField::Description => FormField::text_area(&label),
                };
                let widget = match description {
                    Some(text) => widget.with_description(&translator.t(text)),
                    None => widget,
                };
                form.push(widget.with_value(value));
                bindings.push(FieldBinding::Text {
                    field,
                    lang: lang.code.clone(),
                });
            }
        }

        let options = TagType::ALL.iter().map(|t| t.as_str().to_string()).collect();
        let type_value = page.draft.tag_type.map(|t| t.as_str().to_string()).unwrap_or_default();
        form.push(
            FormField::select(&translator.t("Tag Type"), options)
                .with_placeholder(&translator.t("Select a type"))
                .with_value(&type_value),
        );
        bindings.push(FieldBinding::Type);

        self.form = form;
        self.bindings = bindings;
        self.focused_field = 0;
        self.update_focus();
        self.refresh_errors(translator);
    }

    fn update_focus(&mut self) {
        for (i, field) in self.form.iter_mut().enumerate() {
            field.set_focus(i == self.focused_field);
        }
    }

    /// Push the value of a form field into the page draft
    fn sync_field(&mut self, index: usize) {
        let (Some(page), Some(field), Some(binding)) =
            (self.page.as_mut(), self.form.get(index), self.bindings.get(index))
        else {
            return;
        };

        match binding {
            FieldBinding::Text { field: tag_field, lang } => {
                page.update_text_field(*tag_field, lang, &field.value);
            }
            FieldBinding::Type => {
                if let Some(tag_type) = TagType::parse(&field.value) {
                    page.update_dropdown(tag_type);
                }
            }
        }
    }

    /// Copy per-field validation messages from the page onto the widgets
    pub fn refresh_errors(&mut self, translator: &dyn Translator) {
        let Some(page) = &self.page else {
            return;
        };

        for (widget, binding) in self.form.iter_mut().zip(&self.bindings) {
            let missing = match binding {
                FieldBinding::Text { field: TagField::Name, lang } => page
                    .draft
                    .text(TagField::Name, lang)
                    .trim()
                    .is_empty()
                    .then_some(TagValidationError::NameRequired),
                FieldBinding::Text { .. } => None,
                FieldBinding::Type => page
                    .draft
                    .tag_type
                    .is_none()
                    .then_some(TagValidationError::TypeRequired),
            };
            widget.error_text = missing.map(|e| translator.t(e.message())).unwrap_or_default();
            widget.show_error = page.show_errors;
        }
    }

    fn selected_tag_id(&self) -> Option<i64> {
        let page = self.page.as_ref()?;
        page.tags.get(self.list.selected()?)?.id
    }

    pub fn handle_key(&mut self, key: KeyEvent, translator: &dyn Translator) -> TagsAction {
        let Some(page) = self.page.as_mut() else {
            return match key.code {
                KeyCode::Esc => TagsAction::Back,
                _ => TagsAction::None,
            };
        };

        if page.entry_visible {
            return self.handle_form_key(key, translator);
        }

        if let Some(tag_id) = self.pending_delete.take() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => TagsAction::Delete(tag_id),
                _ => TagsAction::None,
            };
        }

        let tag_count = page.tags.len();
        match key.code {
            KeyCode::Esc => TagsAction::Back,
            KeyCode::Up if tag_count > 0 => {
                let i = self.list.selected().unwrap_or(0);
                self.list.select(Some(if i == 0 { tag_count - 1 } else { i - 1 }));
                TagsAction::None
            }
            KeyCode::Down if tag_count > 0 => {
                let i = self.list.selected().map_or(0, |i| (i + 1) % tag_count);
                self.list.select(Some(i));
                TagsAction::None
            }
            KeyCode::Char('a') => {
                page.show_entry();
                self.build_form(translator);
                TagsAction::None
            }
            KeyCode::Enter => {
                if let Some(index) = self.list.selected() {
                    if page.edit_entry(index) {
                        self.build_form(translator);
                    }
                }
                TagsAction::None
            }
            KeyCode::Char('d') => {
                self.pending_delete = self.selected_tag_id();
                TagsAction::None
            }
            KeyCode::Char('r') => TagsAction::Load,
            _ => TagsAction::None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, translator: &dyn Translator) -> TagsAction {
        let field_count = self.form.len();
        if field_count == 0 {
            return TagsAction::None;
        }
        let index = self.focused_field;

        match key.code {
            KeyCode::Esc => {
                if let Some(page) = self.page.as_mut() {
                    page.hide_entry();
                }
                return TagsAction::None;
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return TagsAction::Save;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focused_field = (index + 1) % field_count;
                self.update_focus();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused_field = if index == 0 { field_count - 1 } else { index - 1 };
                self.update_focus();
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                let field = &mut self.form[index];
                if self.bindings[index] == FieldBinding::Type {
                    field.cycle_option(forward);
                    self.sync_field(index);
                } else if forward {
                    field.move_cursor_right();
                } else {
                    field.move_cursor_left();
                }
            }
            KeyCode::Enter => {
                if self.form[index].field_type != FormFieldType::TextArea {
                    return TagsAction::Save;
                }
                self.form[index].insert_char('\n');
                self.sync_field(index);
            }
            KeyCode::Backspace => {
                self.form[index].delete_char();
                self.sync_field(index);
            }
            KeyCode::Char(c) => {
                self.form[index].insert_char(c);
                self.sync_field(index);
            }
            _ => {}
        }

        self.refresh_errors(translator);
        TagsAction::None
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, translator: &dyn Translator) {
        let Some(page) = &self.page else {
            let message = Paragraph::new(translator.t(
                "No event selected. Set EVENTADMIN_EVENT_ID or pass --event-id",
            ))
            .style(Styles::error())
            .block(Block::default().title(translator.t("Tag Configuration")).borders(Borders::ALL));
            f.render_widget(message, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let lang = page.languages().first().map(|l| l.code.as_str()).unwrap_or("");
        let items: Vec<ListItem> = page
            .tags
            .iter()
            .map(|tag| {
                let description = tag
                    .description
                    .get(lang)
                    .map(|d| format!("  {}", d))
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<13}", tag.tag_type.as_str()), Styles::info()),
                    Span::raw(tag.display_name(lang).to_string()),
                    Span::styled(description, Styles::inactive()),
                ]))
            })
            .collect();

        let title = if page.loading {
            translator.t("Loading tags...")
        } else {
            format!("{} ({})", translator.t("Tags"), page.tags.len())
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        let footer = match (&page.error, self.pending_delete) {
            (_, Some(tag_id)) => Paragraph::new(format!(
                "{} {}? (y/n)",
                translator.t("Delete tag"),
                tag_id
            ))
            .style(Styles::warning()),
            (Some(error), None) => Paragraph::new(error.clone()).style(Styles::error()),
            (None, None) => Paragraph::new("a: add | Enter: edit | d: delete | r: reload")
                .style(Styles::inactive()),
        };
        let entry_visible = page.entry_visible;
        let visible_errors: Vec<String> = page.visible_errors().to_vec();
        let entry_title = if page.draft.id.is_some() {
            translator.t("Edit Tag")
        } else {
            translator.t("New Tag")
        };

        f.render_stateful_widget(list, chunks[0], &mut self.list);
        f.render_widget(
            footer.block(Block::default().borders(Borders::ALL).border_style(Styles::inactive_border())),
            chunks[1],
        );

        if entry_visible {
            self.draw_entry(f, area, &entry_title, &visible_errors);
        }
    }

    fn draw_entry(&self, f: &mut Frame, area: Rect, title: &str, errors: &[String]) {
        let popup_area = centered_rect(70, 80, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("{} (Ctrl+S: save, ESC: cancel)", title))
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let mut constraints: Vec<Constraint> = self
            .form
            .iter()
            .map(|field| Constraint::Length(field.height()))
            .collect();
        constraints.push(Constraint::Min(0));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (field, row) in self.form.iter().zip(rows.iter()) {
            field.render(f, *row);
        }

        if let Some(last) = rows.last() {
            let lines: Vec<Line> = errors
                .iter()
                .map(|error| Line::from(Span::styled(format!("✗ {}", error), Styles::error())))
                .collect();
            f.render_widget(Paragraph::new(lines), *last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::IdentityTranslator;
    use crate::models::Language;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(languages: Vec<Language>) -> TagsScreen {
        TagsScreen::new(Some(TagConfigPage::new(3, languages)))
    }

    #[test]
    fn test_form_has_label_per_language() {
        let mut screen = screen(vec![Language::new("en", "English"), Language::new("fr", "French")]);
        screen.handle_key(key(KeyCode::Char('a')), &IdentityTranslator);

        assert!(screen.is_editing());
        let labels: Vec<&str> = screen.form.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Tag Name in English",
                "Tag Name in French",
                "Tag Description in English",
                "Tag Description in French",
                "Tag Type",
            ]
        );
    }

    #[test]
    fn test_typing_updates_draft_and_errors_wait_for_save() {
        let mut screen = screen(vec![Language::new("en", "English")]);
        let t = IdentityTranslator;
        screen.handle_key(key(KeyCode::Char('a')), &t);

        for c in "Jury".chars() {
            screen.handle_key(key(KeyCode::Char(c)), &t);
        }
        let page = screen.page.as_ref().unwrap();
        assert_eq!(page.draft.text(TagField::Name, "en"), "Jury");
        assert!(!screen.form.iter().any(|f| f.should_display_error()));

        screen.handle_key(key(KeyCode::BackTab), &t);
        screen.handle_key(key(KeyCode::Right), &t);
        let page = screen.page.as_ref().unwrap();
        assert_eq!(page.draft.tag_type, Some(TagType::Response));
        assert!(page.is_valid);

        let save = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(screen.handle_key(save, &t), TagsAction::Save);
    }

    #[test]
    fn test_type_error_shown_after_failed_save() {
        let mut screen = screen(vec![Language::new("en", "English")]);
        let t = IdentityTranslator;
        screen.handle_key(key(KeyCode::Char('a')), &t);
        screen.handle_key(key(KeyCode::Char('x')), &t);

        if let Some(page) = screen.page.as_mut() {
            page.show_errors = true;
        }
        screen.refresh_errors(&t);

        let shown: Vec<&str> = screen
            .form
            .iter()
            .filter(|f| f.should_display_error())
            .map(|f| f.error_text.as_str())
            .collect();
        assert_eq!(shown, vec!["Tag type is required"]);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut screen = screen(vec![Language::new("en", "English")]);
        let t = IdentityTranslator;
        if let Some(page) = screen.page.as_mut() {
            page.tags.push(crate::models::Tag {
                id: Some(9),
                event_id: 3,
                tag_type: TagType::Registration,
                name: [("en".to_string(), "VIP".to_string())].into_iter().collect(),
                description: Default::default(),
            });
        }
        screen.handle_key(key(KeyCode::Down), &t);

        assert_eq!(screen.handle_key(key(KeyCode::Char('d')), &t), TagsAction::None);
        assert_eq!(screen.pending_delete, Some(9));
        assert_eq!(screen.handle_key(key(KeyCode::Char('n')), &t), TagsAction::None);
        assert_eq!(screen.pending_delete, None);

        screen.handle_key(key(KeyCode::Char('d')), &t);
        assert_eq!(screen.handle_key(key(KeyCode::Char('y')), &t), TagsAction::Delete(9));
    }

    #[test]
    fn test_without_event_only_esc_works() {
        let mut screen = TagsScreen::new(None);
        assert_eq!(screen.handle_key(key(KeyCode::Char('a')), &IdentityTranslator), TagsAction::None);
        assert_eq!(screen.handle_key(key(KeyCode::Esc), &IdentityTranslator), TagsAction::Back);
    }
}
