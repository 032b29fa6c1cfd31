//! Main TUI application state and event loop

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::api::{ApiClient, ResponseListService};
use crate::config::Config;
use crate::i18n::Translator;
use crate::response_table::export::write_csv;
use crate::response_table::{ProjectorConfig, RefreshOutcome, RefreshTicket, ResponseProjector};
use crate::tags::TagConfigPage;
use crate::tui::components::status_display::StatusDisplay;
use crate::tui::events::AppEvent;
use crate::tui::screens::{
    help::HelpScreen,
    main_menu::MainMenuScreen,
    responses::{ResponsesAction, ResponsesScreen},
    tags::{TagsAction, TagsScreen},
};
use crate::tui::ui::centered_rect;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Responses,
    Tags,
    Help,
}

impl Screen {
    fn title(&self) -> &'static str {
        match self {
            Screen::MainMenu => "Main Menu",
            Screen::Responses => "Response List",
            Screen::Tags => "Tag Configuration",
            Screen::Help => "Help",
        }
    }
}

pub struct App {
    pub current_screen: Screen,
    pub config: Config,
    client: Arc<ApiClient>,
    translator: Arc<dyn Translator>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,

    pub main_menu: MainMenuScreen,
    pub responses: ResponsesScreen,
    pub tags: TagsScreen,
    pub help: HelpScreen,

    pub status: StatusDisplay,
    pub should_quit: bool,
    pub show_help_popup: bool,
}

impl App {
    pub fn new(config: Config, translator: Arc<dyn Translator>) -> Result<Self> {
        let client = Arc::new(ApiClient::new(&config).context("Failed to create HTTP client")?);

        let mut projector_config = ProjectorConfig::new(client.base_url());
        if let Some(key) = &config.event_key {
            projector_config = projector_config.with_event_key(key);
        }

        let tag_page = config
            .event_id
            .map(|event_id| TagConfigPage::new(event_id, config.languages.clone()));

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            current_screen: Screen::MainMenu,
            config,
            client,
            translator,
            events_tx,
            events_rx,
            main_menu: MainMenuScreen::new(),
            responses: ResponsesScreen::new(ResponseProjector::new(projector_config)),
            tags: TagsScreen::new(tag_page),
            help: HelpScreen::new(),
            status: StatusDisplay::new(),
            should_quit: false,
            show_help_popup: false,
        })
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        if self.config.event_id.is_none() {
            self.status
                .set_error(self.translator.t("No event selected. Set EVENTADMIN_EVENT_ID or pass --event-id"));
        }

        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(INPUT_POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key).await?;
                    }
                }
            }

            while let Ok(app_event) = self.events_rx.try_recv() {
                self.handle_app_event(app_event);
            }

            if self.should_quit {
                info!("Leaving TUI");
                break;
            }
        }

        Ok(())
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        let editing = self.current_screen == Screen::Tags && self.tags.is_editing();

        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            KeyCode::Char('?') if !editing => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return Ok(());
            }
            KeyCode::Char('q') if !editing => {
                self.should_quit = true;
                return Ok(());
            }
            _ => {}
        }

        if self.show_help_popup {
            return Ok(());
        }

        match self.current_screen {
            Screen::MainMenu => self.handle_main_menu_key(key).await,
            Screen::Responses => self.handle_responses_key(key),
            Screen::Tags => self.handle_tags_key(key).await,
            Screen::Help => {
                if key.code == KeyCode::Esc {
                    self.navigate_to_screen(Screen::MainMenu).await;
                } else {
                    self.help.handle_key(key);
                }
            }
        }

        Ok(())
    }

    async fn handle_main_menu_key(&mut self, key: KeyEvent) {
        let target = match key.code {
            KeyCode::Up => {
                self.main_menu.previous();
                None
            }
            KeyCode::Down => {
                self.main_menu.next();
                None
            }
            KeyCode::Enter => self.main_menu.selected_screen(),
            KeyCode::Char(c) => self.main_menu.screen_for_shortcut(c),
            _ => None,
        };

        if let Some(screen) = target {
            self.navigate_to_screen(screen).await;
        }
    }

    fn handle_responses_key(&mut self, key: KeyEvent) {
        match self.responses.handle_key(key) {
            ResponsesAction::None => {}
            ResponsesAction::LoadQuestions => self.spawn_question_load(),
            ResponsesAction::Refresh(ticket) => self.spawn_refresh(ticket),
            ResponsesAction::Export => self.export_responses(),
            ResponsesAction::Back => self.current_screen = Screen::MainMenu,
        }
    }

    async fn handle_tags_key(&mut self, key: KeyEvent) {
        let translator = Arc::clone(&self.translator);
        let action = self.tags.handle_key(key, translator.as_ref());

        let Some(page) = self.tags.page.as_mut() else {
            if action == TagsAction::Back {
                self.current_screen = Screen::MainMenu;
            }
            return;
        };

        match action {
            TagsAction::None => {}
            TagsAction::Back => self.current_screen = Screen::MainMenu,
            TagsAction::Load => {
                page.load(self.client.as_ref(), translator.as_ref()).await;
                self.tags.loaded = true;
            }
            TagsAction::Save => {
                if page.save(self.client.as_ref(), translator.as_ref()).await {
                    self.status.set_success(translator.t("Tag saved"));
                }
                self.tags.refresh_errors(translator.as_ref());
            }
            TagsAction::Delete(tag_id) => {
                if page.delete(tag_id, self.client.as_ref(), translator.as_ref()).await {
                    self.status.set_success(translator.t("Tag deleted"));
                }
            }
        }
    }

    /// Switch screens, fetching whatever the target needs on first visit
    pub async fn navigate_to_screen(&mut self, screen: Screen) {
        debug!("Navigating to {:?}", screen);
        self.current_screen = screen;
        self.status.clear();

        match screen {
            Screen::Responses if self.responses.needs_questions() && self.config.event_id.is_some() => {
                self.spawn_question_load();
            }
            Screen::Tags if !self.tags.loaded => {
                if let Some(page) = self.tags.page.as_mut() {
                    page.load(self.client.as_ref(), self.translator.as_ref()).await;
                    self.tags.loaded = true;
                }
            }
            _ => {}
        }
    }

    fn spawn_question_load(&mut self) {
        self.responses.page.begin_question_load();
        self.status.set_loading(self.translator.t("Loading questions..."));

        let client = Arc::clone(&self.client);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_questions().await;
            if tx.send(AppEvent::QuestionsLoaded(result)).is_err() {
                debug!("UI closed before questions arrived");
            }
        });
    }

    fn spawn_refresh(&mut self, ticket: RefreshTicket) {
        self.status.set_loading(self.translator.t("Loading responses..."));

        let client = Arc::clone(&self.client);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_responses(ticket.include_unsubmitted).await;
            if tx.send(AppEvent::ResponsesLoaded { ticket, result }).is_err() {
                debug!("UI closed before refresh {} finished", ticket.generation);
            }
        });
    }

    pub fn handle_app_event(&mut self, app_event: AppEvent) {
        let page = &mut self.responses.page;
        match app_event {
            AppEvent::QuestionsLoaded(Ok(questions)) => {
                page.apply_questions(questions);
                if page.questions().is_empty() {
                    self.status.set_info(self.translator.t("This event has no questions"));
                } else {
                    if self.responses.question_cursor.selected().is_none() {
                        self.responses.question_cursor.select(Some(0));
                    }
                    self.status.clear();
                }
            }
            AppEvent::QuestionsLoaded(Err(err)) => {
                page.fail_question_load(&err);
                self.status.set_error(self.translator.t(&err.user_message()));
            }
            AppEvent::ResponsesLoaded { ticket, result: Ok(records) } => {
                if let RefreshOutcome::Applied { rows } = page.apply_responses(ticket, &records) {
                    self.status
                        .set_success(format!("{} {}", rows, self.translator.t("responses")));
                }
            }
            AppEvent::ResponsesLoaded { ticket, result: Err(err) } => {
                if page.fail_refresh(ticket, &err) == RefreshOutcome::Failed {
                    self.status.set_error(self.translator.t(&err.user_message()));
                }
            }
        }
    }

    fn export_responses(&mut self) {
        let filename = format!("responses-{}.csv", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let page = &self.responses.page;

        let result = std::fs::File::create(&filename)
            .map_err(Into::into)
            .and_then(|file| write_csv(page.rows(), &page.columns(), file));

        match result {
            Ok(()) => {
                info!("Exported {} rows to {}", page.rows().len(), filename);
                self.status
                    .set_success(format!("{} {}", self.translator.t("Exported to"), filename));
            }
            Err(err) => {
                error!("Export failed: {}", err);
                self.status.set_error(err.to_string());
            }
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let translator = Arc::clone(&self.translator);
        match self.current_screen {
            Screen::MainMenu => {
                let event_label = match self.config.event_id {
                    Some(id) => format!("{} {} @ {}", translator.t("Event"), id, self.config.api_url),
                    None => self.config.api_url.clone(),
                };
                self.main_menu.draw(f, chunks[0], translator.as_ref(), &event_label)
            }
            Screen::Responses => self.responses.draw(f, chunks[0], translator.as_ref()),
            Screen::Tags => self.tags.draw(f, chunks[0], translator.as_ref()),
            Screen::Help => self.help.draw(f, chunks[0]),
        }

        let fallback = format!(
            "{} | ESC: Back | q: Quit | F1/?: Help",
            translator.t(self.current_screen.title())
        );
        self.status.render(f, chunks[1], &fallback);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);
        f.render_widget(Clear, popup_area);

        let screen_help = match self.current_screen {
            Screen::MainMenu => "↑/↓ - Navigate menu\nEnter - Select option\nR/T/H - Direct access",
            Screen::Responses => {
                "s - Show/hide question picker\nSpace - Toggle question\nu - Update table\n\
                 i - Include un-submitted\n↑/↓/←/→ - Move in table\nEnter - Cell details\ne - Export CSV"
            }
            Screen::Tags => {
                "a - Add tag\nEnter - Edit tag\nd - Delete tag\nr - Reload\n\
                 Tab - Next field\nCtrl+S - Save\nESC - Close form"
            }
            Screen::Help => "↑/↓ - Switch section\nPage Up/Down - Scroll",
        };

        let content = format!(
            "Global Shortcuts:\nESC - Go back\nq - Quit application\nF1 / ? - Toggle this help\n\n{}",
            screen_help
        );

        let popup = Paragraph::new(content)
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));
        f.render_widget(popup, popup_area);
    }
}
