//! Help screen

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::tui::ui::Styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpSection {
    Overview,
    Responses,
    Tags,
    Shortcuts,
}

impl HelpSection {
    pub const ALL: [HelpSection; 4] = [
        HelpSection::Overview,
        HelpSection::Responses,
        HelpSection::Tags,
        HelpSection::Shortcuts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HelpSection::Overview => "Overview",
            HelpSection::Responses => "Response List",
            HelpSection::Tags => "Tag Configuration",
            HelpSection::Shortcuts => "Keyboard Shortcuts",
        }
    }
}

pub struct HelpScreen {
    pub current_section: usize,
    pub section_state: ListState,
    pub scroll_offset: usize,
}

impl Default for HelpScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpScreen {
    pub fn new() -> Self {
        let mut section_state = ListState::default();
        section_state.select(Some(0));
        Self {
            current_section: 0,
            section_state,
            scroll_offset: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up if self.current_section > 0 => {
                self.current_section -= 1;
                self.section_state.select(Some(self.current_section));
                self.scroll_offset = 0;
            }
            KeyCode::Down if self.current_section + 1 < HelpSection::ALL.len() => {
                self.current_section += 1;
                self.section_state.select(Some(self.current_section));
                self.scroll_offset = 0;
            }
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(10),
            KeyCode::PageDown => self.scroll_offset += 10,
            KeyCode::Home => self.scroll_offset = 0,
            _ => {}
        }
    }

    fn section_content(&self) -> Vec<Line<'static>> {
        match HelpSection::ALL[self.current_section] {
            HelpSection::Overview => vec![
                Line::from(Span::styled("Event Administration", Styles::title())),
                Line::from(""),
                Line::from("Review the responses submitted to an event and manage its tags."),
                Line::from(""),
                Line::from(Span::styled("Getting Started:", Styles::info())),
                Line::from("1. Set EVENTADMIN_API_URL and EVENTADMIN_EVENT_ID (or pass --api-url / --event-id)"),
                Line::from("2. Open Response List, pick the questions to show and press u"),
                Line::from("3. Open Tag Configuration to add, edit or delete tags"),
            ],
            HelpSection::Responses => vec![
                Line::from(Span::styled("Response List", Styles::title())),
                Line::from(""),
                Line::from("Each row is one response. The fixed columns are the response id,"),
                Line::from("the applicant, one column per selected question and one per reviewer."),
                Line::from(""),
                Line::from(Span::styled("Question picker:", Styles::info())),
                Line::from("• s - Show or hide the picker"),
                Line::from("• Space - Toggle the highlighted question (refreshes the table)"),
                Line::from("• u - Update the table and hide the picker"),
                Line::from("• i - Include un-submitted responses"),
                Line::from(""),
                Line::from(Span::styled("Table:", Styles::info())),
                Line::from("• ↑/↓ - Move between rows, ←/→ - move between columns"),
                Line::from("• Enter - Show the full cell, with file and response links"),
                Line::from("• e - Export the table to CSV in the working directory"),
            ],
            HelpSection::Tags => vec![
                Line::from(Span::styled("Tag Configuration", Styles::title())),
                Line::from(""),
                Line::from("Tags have a type (RESPONSE or REGISTRATION) and a name in every"),
                Line::from("organisation language. Descriptions are optional."),
                Line::from(""),
                Line::from(Span::styled("List:", Styles::info())),
                Line::from("• a - Add a tag, Enter - edit the highlighted tag"),
                Line::from("• d - Delete the highlighted tag (press y to confirm)"),
                Line::from("• r - Reload tags"),
                Line::from(""),
                Line::from(Span::styled("Entry form:", Styles::info())),
                Line::from("• Tab/Shift+Tab - Move between fields"),
                Line::from("• ←/→ - Change the tag type"),
                Line::from("• Ctrl+S - Save, ESC - cancel"),
            ],
            HelpSection::Shortcuts => vec![
                Line::from(Span::styled("Keyboard Shortcuts Reference", Styles::title())),
                Line::from(""),
                Line::from("┌─────────────┬─────────────────────────────────┐"),
                Line::from("│ ESC         │ Go back / Main menu             │"),
                Line::from("│ q           │ Quit application                │"),
                Line::from("│ F1 or ?     │ Toggle help popup               │"),
                Line::from("│ R / T / H   │ Main menu shortcuts             │"),
                Line::from("└─────────────┴─────────────────────────────────┘"),
            ],
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(area);

        let items: Vec<ListItem> = HelpSection::ALL
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let style = if i == self.current_section {
                    Styles::selected()
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(section.as_str(), style)))
            })
            .collect();

        let section_list = List::new(items)
            .block(
                Block::default()
                    .title("Help Sections")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());
        f.render_stateful_widget(section_list, chunks[0], &mut self.section_state);

        let visible_lines: Vec<Line> = self
            .section_content()
            .into_iter()
            .skip(self.scroll_offset)
            .collect();

        let content = Paragraph::new(visible_lines)
            .block(
                Block::default()
                    .title(format!("Help - {}", HelpSection::ALL[self.current_section].as_str()))
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(content, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_section_navigation_stops_at_ends() {
        let mut help = HelpScreen::new();
        help.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        assert_eq!(help.current_section, 0);

        for _ in 0..10 {
            help.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        assert_eq!(help.current_section, HelpSection::ALL.len() - 1);

        help.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
        assert_eq!(help.scroll_offset, 10);
        help.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        assert_eq!(help.scroll_offset, 0);
    }
}
