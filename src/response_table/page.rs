//! Response list page state
//!
//! ```text
//! Idle -> LoadingQuestions -> Idle (question list visible/hidden)
//!   selection toggle / Update -> Refreshing -> Idle
//! ```
//!
//! Every refresh is issued a [`RefreshTicket`] with a monotonically increasing generation.
//! Results carrying an older generation than the newest issued ticket are dropped, so a slow
//! early fetch can never overwrite the table built by a later one.

use chrono::{DateTime, Local};
use tracing::{debug, error, info};

use crate::api::ResponseListService;
use crate::errors::AdminError;
use crate::models::{Question, ResponseRecord};
use crate::response_table::columns::{derive_columns, ColumnDescriptor};
use crate::response_table::projector::ResponseProjector;
use crate::response_table::row::ProjectedRow;
use crate::response_table::selection::QuestionSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    LoadingQuestions,
    Refreshing,
}

/// Handle for one in-flight response fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
    pub include_unsubmitted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { rows: usize },
    Failed,
    /// A newer refresh was issued after this one
    Stale,
}

pub struct ResponseListPage {
    projector: ResponseProjector,
    questions: Vec<Question>,
    questions_loaded: bool,
    selection: QuestionSelection,
    rows: Vec<ProjectedRow>,
    state: PageState,
    latest_generation: u64,
    pub question_list_visible: bool,
    /// Selection changed since the table was last rebuilt
    pub update_pending: bool,
    pub include_unsubmitted: bool,
    pub has_table: bool,
    pub last_refreshed: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

impl ResponseListPage {
    pub fn new(projector: ResponseProjector) -> Self {
        Self {
            projector,
            questions: Vec::new(),
            questions_loaded: false,
            selection: QuestionSelection::new(),
            rows: Vec::new(),
            state: PageState::Idle,
            latest_generation: 0,
            question_list_visible: false,
            update_pending: false,
            include_unsubmitted: false,
            has_table: false,
            last_refreshed: None,
            last_error: None,
        }
    }

    pub fn with_selection(mut self, selection: QuestionSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// True once a question fetch succeeded, even if the event has none
    pub fn questions_loaded(&self) -> bool {
        self.questions_loaded
    }

    pub fn selection(&self) -> &QuestionSelection {
        &self.selection
    }

    pub fn rows(&self) -> &[ProjectedRow] {
        &self.rows
    }

    /// Columns are derived from the rows currently held, on every call
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        derive_columns(&self.rows)
    }

    pub fn begin_question_load(&mut self) {
        self.state = PageState::LoadingQuestions;
    }

    pub fn apply_questions(&mut self, questions: Vec<Question>) {
        info!("Question picker has {} questions", questions.len());
        self.questions = questions;
        self.questions_loaded = true;
        if self.state == PageState::LoadingQuestions {
            self.state = PageState::Idle;
        }
    }

    pub fn fail_question_load(&mut self, err: &AdminError) {
        error!("Loading questions failed: {}", err);
        self.last_error = Some(err.user_message());
        if self.state == PageState::LoadingQuestions {
            self.state = PageState::Idle;
        }
    }

    /// Show or hide the picker; never fetches
    pub fn toggle_question_list(&mut self) {
        self.question_list_visible = !self.question_list_visible;
    }

    /// Flip the "include un-submitted" filter; takes effect on the next refresh
    pub fn toggle_include_unsubmitted(&mut self) {
        self.include_unsubmitted = !self.include_unsubmitted;
        self.update_pending = true;
    }

    /// Toggle a question and start a refresh so the table reflects the new selection
    pub fn toggle_selection(&mut self, question_id: i64) -> RefreshTicket {
        self.selection = self.selection.toggle(question_id);
        self.update_pending = true;
        self.issue_ticket()
    }

    /// Explicit Update: hide the picker and start a refresh
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.question_list_visible = false;
        self.issue_ticket()
    }

    fn issue_ticket(&mut self) -> RefreshTicket {
        self.latest_generation += 1;
        self.state = PageState::Refreshing;
        RefreshTicket {
            generation: self.latest_generation,
            include_unsubmitted: self.include_unsubmitted,
        }
    }

    fn is_stale(&self, ticket: RefreshTicket) -> bool {
        ticket.generation < self.latest_generation
    }

    /// Replace the table with a projection of `records`, unless the ticket is stale
    pub fn apply_responses(&mut self, ticket: RefreshTicket, records: &[ResponseRecord]) -> RefreshOutcome {
        if self.is_stale(ticket) {
            debug!(
                "Dropping responses of refresh {} (latest is {})",
                ticket.generation, self.latest_generation
            );
            return RefreshOutcome::Stale;
        }

        self.rows = self.projector.project_rows(records, &self.selection);
        self.has_table = true;
        self.update_pending = false;
        self.state = PageState::Idle;
        self.last_refreshed = Some(Local::now());
        self.last_error = None;

        RefreshOutcome::Applied { rows: self.rows.len() }
    }

    /// Leave the previous table in place and return to idle
    pub fn fail_refresh(&mut self, ticket: RefreshTicket, err: &AdminError) -> RefreshOutcome {
        if self.is_stale(ticket) {
            debug!("Ignoring failure of stale refresh {}", ticket.generation);
            return RefreshOutcome::Stale;
        }

        error!("Refreshing responses failed: {}", err);
        self.state = PageState::Idle;
        self.last_error = Some(err.user_message());
        RefreshOutcome::Failed
    }

    /// Fetch the question list and apply it
    pub async fn load_questions(&mut self, service: &dyn ResponseListService) -> Result<(), AdminError> {
        self.begin_question_load();
        match service.fetch_questions().await {
            Ok(questions) => {
                self.apply_questions(questions);
                Ok(())
            }
            Err(err) => {
                self.fail_question_load(&err);
                Err(err)
            }
        }
    }

    /// Fetch and project all responses in one step
    pub async fn refresh(&mut self, service: &dyn ResponseListService) -> Result<RefreshOutcome, AdminError> {
        let ticket = self.begin_refresh();
        match service.fetch_responses(ticket.include_unsubmitted).await {
            Ok(records) => Ok(self.apply_responses(ticket, &records)),
            Err(err) => {
                self.fail_refresh(ticket, &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;
    use crate::response_table::projector::ProjectorConfig;
    use crate::response_table::row::CellValue;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeService {
        questions: Vec<Question>,
        records: Vec<ResponseRecord>,
        fail: bool,
        seen_include_unsubmitted: Mutex<Vec<bool>>,
    }

    impl FakeService {
        fn new(records: Vec<ResponseRecord>) -> Self {
            Self {
                questions: vec![Question { question_id: 5, headline: "CV".into(), value: json!(null) }],
                records,
                fail: false,
                seen_include_unsubmitted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ResponseListService for FakeService {
        async fn fetch_questions(&self) -> Result<Vec<Question>, AdminError> {
            Ok(self.questions.clone())
        }

        async fn fetch_responses(&self, include_unsubmitted: bool) -> Result<Vec<ResponseRecord>, AdminError> {
            self.seen_include_unsubmitted.lock().unwrap().push(include_unsubmitted);
            if self.fail {
                return Err(AdminError::Api { status_code: 500, message: "boom".into() });
            }
            Ok(self.records.clone())
        }
    }

    fn page() -> ResponseListPage {
        ResponseListPage::new(ResponseProjector::new(ProjectorConfig::new("http://api")))
    }

    fn record_with_file(id: i64) -> ResponseRecord {
        let mut record = ResponseRecord::new(id);
        record.answers = vec![Answer {
            headline: "CV".into(),
            answer_type: "file".into(),
            value: json!("cv.pdf"),
            options: vec![],
            question_id: Some(5),
        }];
        record
    }

    #[test]
    fn test_question_list_toggle_does_not_refresh() {
        let mut page = page();
        page.toggle_question_list();
        assert!(page.question_list_visible);
        assert_eq!(page.state(), PageState::Idle);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut page = page();
        let first = page.begin_refresh();
        let second = page.toggle_selection(5);
        assert_eq!(page.state(), PageState::Refreshing);

        let newer = vec![record_with_file(2)];
        assert_eq!(page.apply_responses(second, &newer), RefreshOutcome::Applied { rows: 1 });

        let older = vec![record_with_file(1), record_with_file(3)];
        assert_eq!(page.apply_responses(first, &older), RefreshOutcome::Stale);
        assert_eq!(page.rows().len(), 1);
        assert!(matches!(page.rows()[0].get("CV"), Some(CellValue::FileLink(_))));
        assert!(!page.update_pending);
    }

    #[test]
    fn test_failure_keeps_previous_rows() {
        let mut page = page();
        let ticket = page.begin_refresh();
        page.apply_responses(ticket, &[record_with_file(1)]);

        let ticket = page.begin_refresh();
        let err = AdminError::Api { status_code: 502, message: "Bad gateway".into() };
        assert_eq!(page.fail_refresh(ticket, &err), RefreshOutcome::Failed);
        assert_eq!(page.state(), PageState::Idle);
        assert_eq!(page.rows().len(), 1);
        assert_eq!(page.last_error.as_deref(), Some("Bad gateway"));
    }

    #[test]
    fn test_columns_follow_current_rows() {
        let mut page = page();
        assert!(page.columns().is_empty());

        let ticket = page.begin_refresh();
        page.apply_responses(ticket, &[record_with_file(1)]);
        let ids: Vec<String> = page.columns().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["response_id", "user_title", "CV"]);

        let ticket = page.begin_refresh();
        page.apply_responses(ticket, &[]);
        assert!(page.columns().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_through_service() {
        let service = FakeService::new(vec![record_with_file(1), record_with_file(2)]);
        let mut page = page();

        page.load_questions(&service).await.unwrap();
        assert_eq!(page.questions().len(), 1);

        page.toggle_include_unsubmitted();
        let outcome = page.refresh(&service).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Applied { rows: 2 });
        assert!(page.has_table);
        assert!(page.last_refreshed.is_some());
        assert_eq!(*service.seen_include_unsubmitted.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn test_refresh_error_is_returned_and_state_recovers() {
        let mut service = FakeService::new(vec![]);
        service.fail = true;
        let mut page = page();

        assert!(page.refresh(&service).await.is_err());
        assert_eq!(page.state(), PageState::Idle);
        assert!(!page.has_table);
    }
}
