//! reqwest-backed implementation of the service traits

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::api::services::{ResponseListService, TagService};
use crate::api::types::{ApiErrorResponse, EventApi};
use crate::config::Config;
use crate::errors::AdminError;
use crate::models::{Question, ResponseRecord, Tag};

/// HTTP client bound to one backend and, optionally, one event
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    event_id: Option<i64>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, AdminError> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            event_id: config.event_id,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn require_event(&self) -> Result<i64, AdminError> {
        self.event_id.ok_or(AdminError::MissingEvent)
    }

    /// Send a request, map non-2xx statuses to `AdminError::Api` and return the body
    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<String, AdminError> {
        debug!("Requesting {}", endpoint);

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(error_response) => error_response.message,
                Err(_) => body,
            };
            return Err(AdminError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, AdminError> {
        let body = self.send(endpoint, request).await?;
        serde_json::from_str(&body).map_err(|source| AdminError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ResponseListService for ApiClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, AdminError> {
        let event_id = self.require_event()?;
        let request = self
            .client
            .get(self.url(EventApi::QUESTIONS_ENDPOINT))
            .query(&[("event_id", event_id.to_string())]);

        let questions: Vec<Question> = self.send_json(EventApi::QUESTIONS_ENDPOINT, request).await?;
        info!("Fetched {} questions for event {}", questions.len(), event_id);
        Ok(questions)
    }

    async fn fetch_responses(&self, include_unsubmitted: bool) -> Result<Vec<ResponseRecord>, AdminError> {
        let event_id = self.require_event()?;
        let request = self
            .client
            .get(self.url(EventApi::RESPONSES_ENDPOINT))
            .query(&[
                ("event_id", event_id.to_string()),
                ("include_unsubmitted", include_unsubmitted.to_string()),
            ]);

        let records: Vec<ResponseRecord> = self.send_json(EventApi::RESPONSES_ENDPOINT, request).await?;
        info!("Fetched {} responses for event {}", records.len(), event_id);
        Ok(records)
    }
}

#[async_trait]
impl TagService for ApiClient {
    async fn get_tag_list(&self, event_id: i64) -> Result<Vec<Tag>, AdminError> {
        let request = self
            .client
            .get(self.url(EventApi::TAGS_ENDPOINT))
            .query(&[("event_id", event_id.to_string())]);

        self.send_json(EventApi::TAGS_ENDPOINT, request).await
    }

    async fn add_tag(&self, tag: &Tag) -> Result<Tag, AdminError> {
        let request = self.client.post(self.url(EventApi::TAG_ENDPOINT)).json(tag);
        let created: Tag = self.send_json(EventApi::TAG_ENDPOINT, request).await?;
        info!("Created tag {:?} for event {}", created.id, created.event_id);
        Ok(created)
    }

    async fn update_tag(&self, tag: &Tag) -> Result<Tag, AdminError> {
        let request = self.client.put(self.url(EventApi::TAG_ENDPOINT)).json(tag);
        let updated: Tag = self.send_json(EventApi::TAG_ENDPOINT, request).await?;
        info!("Updated tag {:?} for event {}", updated.id, updated.event_id);
        Ok(updated)
    }

    async fn delete_tag(&self, event_id: i64, tag_id: i64) -> Result<(), AdminError> {
        let request = self
            .client
            .delete(self.url(EventApi::TAG_ENDPOINT))
            .query(&[("id", tag_id.to_string()), ("event_id", event_id.to_string())]);

        self.send(EventApi::TAG_ENDPOINT, request).await?;
        info!("Deleted tag {} from event {}", tag_id, event_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_requests_without_event_fail_before_network() {
        let client = ApiClient::new(&Config::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");

        let err = client.fetch_questions().await.unwrap_err();
        assert!(matches!(err, AdminError::MissingEvent));

        let err = client.fetch_responses(false).await.unwrap_err();
        assert!(matches!(err, AdminError::MissingEvent));
    }
}
