//! Service seams between page state and the backend

use async_trait::async_trait;

use crate::errors::AdminError;
use crate::models::{Question, ResponseRecord, Tag};

/// Data needed by the response list page
#[async_trait]
pub trait ResponseListService: Send + Sync {
    async fn fetch_questions(&self) -> Result<Vec<Question>, AdminError>;

    async fn fetch_responses(&self, include_unsubmitted: bool) -> Result<Vec<ResponseRecord>, AdminError>;
}

/// Tag CRUD for the tag configuration page
#[async_trait]
pub trait TagService: Send + Sync {
    async fn get_tag_list(&self, event_id: i64) -> Result<Vec<Tag>, AdminError>;

    async fn add_tag(&self, tag: &Tag) -> Result<Tag, AdminError>;

    async fn update_tag(&self, tag: &Tag) -> Result<Tag, AdminError>;

    async fn delete_tag(&self, event_id: i64, tag_id: i64) -> Result<(), AdminError>;
}
