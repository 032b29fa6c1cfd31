//! Events delivered to the UI loop by background fetches

use crate::errors::AdminError;
use crate::models::{Question, ResponseRecord};
use crate::response_table::RefreshTicket;

#[derive(Debug)]
pub enum AppEvent {
    /// Question list for the picker arrived
    QuestionsLoaded(Result<Vec<Question>, AdminError>),
    /// Response fetch started by `ticket` finished
    ResponsesLoaded {
        ticket: RefreshTicket,
        result: Result<Vec<ResponseRecord>, AdminError>,
    },
}
