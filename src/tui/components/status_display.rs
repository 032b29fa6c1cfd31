//! Status bar showing the latest message

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::ui::Styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Info,
    Success,
    Error,
    Loading,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: DateTime<Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: Local::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct StatusDisplay {
    current: Option<StatusMessage>,
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.current = Some(StatusMessage::new(message.into(), StatusType::Info));
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.current = Some(StatusMessage::new(message.into(), StatusType::Success));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.current = Some(StatusMessage::new(message.into(), StatusType::Error));
    }

    pub fn set_loading(&mut self, message: impl Into<String>) {
        self.current = Some(StatusMessage::new(message.into(), StatusType::Loading));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Render the message, or `fallback` when there is none
    pub fn render(&self, f: &mut Frame, area: Rect, fallback: &str) {
        let (content, style) = match &self.current {
            Some(message) => {
                let style = match message.status_type {
                    StatusType::Info => Styles::info(),
                    StatusType::Success => Styles::success(),
                    StatusType::Error => Styles::error(),
                    StatusType::Loading => Styles::warning(),
                };
                (format_message(message), style)
            }
            None => (fallback.to_string(), Styles::inactive()),
        };

        let paragraph = Paragraph::new(content)
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(Styles::inactive_border()));

        f.render_widget(paragraph, area);
    }
}

fn format_message(message: &StatusMessage) -> String {
    let prefix = match message.status_type {
        StatusType::Info => "ℹ",
        StatusType::Success => "✓",
        StatusType::Error => "✗",
        StatusType::Loading => "⟳",
    };
    format!(
        "{} [{}] {}",
        prefix,
        message.timestamp.format("%H:%M:%S"),
        message.message
    )
}
