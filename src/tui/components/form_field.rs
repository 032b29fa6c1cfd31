//! Controlled input widgets used by the tag entry form

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::ui::Styles;

/// Kind of input
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    TextBox,
    TextArea,
    /// Fixed options, cycled with ←/→
    Select(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    /// Help text rendered under the input
    pub description: Option<String>,
    pub error_text: String,
    pub show_error: bool,
    pub is_focused: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
}

impl FormField {
    pub fn new(label: &str, field_type: FormFieldType) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            description: None,
            error_text: String::new(),
            show_error: false,
            is_focused: false,
            cursor_position: 0,
        }
    }

    pub fn text_box(label: &str) -> Self {
        Self::new(label, FormFieldType::TextBox)
    }

    pub fn text_area(label: &str) -> Self {
        Self::new(label, FormFieldType::TextArea)
    }

    pub fn select(label: &str, options: Vec<String>) -> Self {
        Self::new(label, FormFieldType::Select(options))
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self.cursor_position = value.chars().count();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_error(mut self, error_text: &str, show_error: bool) -> Self {
        self.error_text = error_text.to_string();
        self.show_error = show_error;
        self
    }

    /// The error line is shown only when requested and there is something to show
    pub fn should_display_error(&self) -> bool {
        self.show_error && !self.error_text.is_empty()
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn is_select(&self) -> bool {
        matches!(self.field_type, FormFieldType::Select(_))
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        if self.is_select() {
            return;
        }
        if c == '\n' && self.field_type != FormFieldType::TextArea {
            return;
        }
        let index = self.byte_index();
        self.value.insert(index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.is_select() || self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let index = self.byte_index();
        self.value.remove(index);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
    }

    /// Step to the next (or previous) option of a select
    pub fn cycle_option(&mut self, forward: bool) {
        let options = match &self.field_type {
            FormFieldType::Select(options) if !options.is_empty() => options,
            _ => return,
        };

        let next = match options.iter().position(|option| *option == self.value) {
            Some(i) if forward => (i + 1) % options.len(),
            Some(0) => options.len() - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.value = options[next].clone();
        self.cursor_position = self.value.chars().count();
    }

    /// Rows needed to render this field
    pub fn height(&self) -> u16 {
        let input = match self.field_type {
            FormFieldType::TextArea => 5,
            _ => 3,
        };
        let description = if self.description.is_some() { 1 } else { 0 };
        let error = if self.should_display_error() { 1 } else { 0 };
        input + description + error
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let input_height = match self.field_type {
            FormFieldType::TextArea => 5,
            _ => 3,
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(input_height), Constraint::Min(0)])
            .split(area);

        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.should_display_error() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let (text, text_style) = if self.value.is_empty() && !self.placeholder.is_empty() {
            (self.placeholder.clone(), Styles::inactive())
        } else if self.is_select() {
            (format!("◂ {} ▸", self.value), Styles::default())
        } else {
            (self.value.clone(), Styles::default())
        };

        let block = Block::default()
            .title(self.label.as_str())
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut paragraph = Paragraph::new(text).style(text_style).block(block);
        if self.field_type == FormFieldType::TextArea {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        f.render_widget(paragraph, chunks[0]);

        let mut notes = Vec::new();
        if let Some(description) = &self.description {
            notes.push(Line::from(Span::styled(format!(" {}", description), Styles::inactive())));
        }
        if self.should_display_error() {
            notes.push(Line::from(Span::styled(format!(" {}", self.error_text), Styles::error())));
        }
        if !notes.is_empty() {
            f.render_widget(Paragraph::new(notes), chunks[1]);
        }

        if self.is_focused && self.field_type == FormFieldType::TextBox {
            let cursor_x = chunks[0].x + 1 + self.cursor_position as u16;
            let cursor_y = chunks[0].y + 1;
            if cursor_x < chunks[0].x + chunks[0].width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_needs_flag_and_text() {
        let field = FormField::text_box("Name");
        assert!(!field.should_display_error());

        let field = field.with_error("Tag name is required", false);
        assert!(!field.should_display_error());

        let field = field.with_error("", true);
        assert!(!field.should_display_error());

        let field = field.with_error("Tag name is required", true);
        assert!(field.should_display_error());
        assert_eq!(field.height(), 4);
    }

    #[test]
    fn test_editing_multibyte_text() {
        let mut field = FormField::text_box("Name").with_value("Café");
        field.insert_char('s');
        assert_eq!(field.value, "Cafés");

        field.move_cursor_left();
        field.move_cursor_left();
        field.delete_char();
        assert_eq!(field.value, "Caés");
    }

    #[test]
    fn test_newlines_only_in_text_area() {
        let mut text_box = FormField::text_box("Name");
        text_box.insert_char('\n');
        assert!(text_box.value.is_empty());

        let mut text_area = FormField::text_area("Description");
        text_area.insert_char('a');
        text_area.insert_char('\n');
        assert_eq!(text_area.value, "a\n");
    }

    #[test]
    fn test_select_cycles_options() {
        let mut field = FormField::select("Type", vec!["RESPONSE".into(), "REGISTRATION".into()]);
        field.insert_char('x');
        assert!(field.value.is_empty());

        field.cycle_option(true);
        assert_eq!(field.value, "RESPONSE");
        field.cycle_option(true);
        assert_eq!(field.value, "REGISTRATION");
        field.cycle_option(false);
        assert_eq!(field.value, "RESPONSE");
        field.cycle_option(false);
        assert_eq!(field.value, "REGISTRATION");
    }
}
