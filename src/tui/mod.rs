//! Terminal user interface for response review and tag configuration

pub mod app;
pub mod components;
pub mod events;
pub mod screens;
pub mod ui;

pub use app::{App, Screen};
pub use events::AppEvent;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::i18n::Translator;

/// Take over the terminal, run the app and restore the terminal even when the app fails
pub async fn run_tui(config: Config, translator: Arc<dyn Translator>) -> Result<()> {
    info!("Starting TUI against {}", config.api_url);

    let mut app = App::new(config, translator)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        error!("TUI error: {:#}", err);
    }
    result
}
