//! Main menu screen

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::i18n::Translator;
use crate::tui::app::Screen;
use crate::tui::ui::Styles;

#[derive(Debug, Clone)]
pub struct MenuOption {
    pub title: &'static str,
    pub description: &'static str,
    pub shortcut: char,
    pub screen: Screen,
}

pub struct MainMenuScreen {
    pub menu_state: ListState,
    pub menu_options: Vec<MenuOption>,
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenuScreen {
    pub fn new() -> Self {
        let menu_options = vec![
            MenuOption {
                title: "Response List",
                description: "Browse responses with the answers to selected questions",
                shortcut: 'R',
                screen: Screen::Responses,
            },
            MenuOption {
                title: "Tag Configuration",
                description: "Create, edit and delete the tags of the event",
                shortcut: 'T',
                screen: Screen::Tags,
            },
            MenuOption {
                title: "Help",
                description: "View help and keyboard shortcuts",
                shortcut: 'H',
                screen: Screen::Help,
            },
        ];

        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        Self {
            menu_state,
            menu_options,
        }
    }

    pub fn next(&mut self) {
        let selected = self.menu_state.selected().unwrap_or(0);
        self.menu_state.select(Some((selected + 1) % self.menu_options.len()));
    }

    pub fn previous(&mut self) {
        let selected = self.menu_state.selected().unwrap_or(0);
        let previous = if selected == 0 {
            self.menu_options.len() - 1
        } else {
            selected - 1
        };
        self.menu_state.select(Some(previous));
    }

    pub fn selected_screen(&self) -> Option<Screen> {
        self.menu_state
            .selected()
            .and_then(|i| self.menu_options.get(i))
            .map(|option| option.screen)
    }

    /// Screen bound to a shortcut key, case insensitive
    pub fn screen_for_shortcut(&self, c: char) -> Option<Screen> {
        let upper = c.to_ascii_uppercase();
        self.menu_options
            .iter()
            .find(|option| option.shortcut == upper)
            .map(|option| option.screen)
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect, translator: &dyn Translator, event_label: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(4),
            ])
            .split(area);

        let title = Paragraph::new(format!("{} - {}", translator.t("Event Administration"), event_label))
            .style(Styles::title())
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, chunks[0]);

        let selected = self.menu_state.selected();
        let items: Vec<ListItem> = self
            .menu_options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == selected {
                    Styles::selected()
                } else {
                    Style::default()
                };

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", option.shortcut), Styles::info()),
                        Span::styled(translator.t(option.title), style.add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(Span::styled(
                        format!("     {}", translator.t(option.description)),
                        if Some(i) == selected { style } else { Styles::inactive() },
                    )),
                ])
            })
            .collect();

        let menu = List::new(items)
            .block(
                Block::default()
                    .title(translator.t("Main Menu"))
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());
        f.render_stateful_widget(menu, chunks[1], &mut self.menu_state);

        let instructions = vec![
            Line::from(vec![
                Span::styled("Navigation: ", Styles::info()),
                Span::raw("↑/↓ to move, "),
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" to select, "),
                Span::styled("R/T/H", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" for direct access"),
            ]),
            Line::from(vec![
                Span::styled("Global: ", Styles::info()),
                Span::styled("F1/?", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" for help, "),
                Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" to quit"),
            ]),
        ];
        let instructions = Paragraph::new(instructions).block(
            Block::default()
                .title("Instructions")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(instructions, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_cursor_and_shortcuts() {
        let mut menu = MainMenuScreen::new();
        assert_eq!(menu.selected_screen(), Some(Screen::Responses));
        menu.previous();
        assert_eq!(menu.selected_screen(), Some(Screen::Help));
        menu.next();
        menu.next();
        assert_eq!(menu.selected_screen(), Some(Screen::Tags));

        assert_eq!(menu.screen_for_shortcut('t'), Some(Screen::Tags));
        assert_eq!(menu.screen_for_shortcut('x'), None);
    }
}
