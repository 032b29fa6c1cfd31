//! Backend endpoints and wire-level helper types

use serde::Deserialize;

/// Error body returned by the backend for non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}

/// Backend endpoints and constants
pub struct EventApi;

impl EventApi {
    /// Question picker entries for an event
    pub const QUESTIONS_ENDPOINT: &'static str = "/api/v1/questions";
    /// Response records for an event
    pub const RESPONSES_ENDPOINT: &'static str = "/api/v1/responses";
    /// Tag listing for an event
    pub const TAGS_ENDPOINT: &'static str = "/api/v1/tags";
    /// Single tag create/update/delete
    pub const TAG_ENDPOINT: &'static str = "/api/v1/tag";
    /// File download path; the filename is appended verbatim
    pub const FILE_ENDPOINT: &'static str = "/api/v1/file?filename=";
}

/// Download link for an uploaded file answer
pub fn file_url(base_url: &str, filename: &str) -> String {
    format!("{}{}{}", base_url, EventApi::FILE_ENDPOINT, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_is_plain_concatenation() {
        assert_eq!(
            file_url("https://api.example.org", "cv final.pdf"),
            "https://api.example.org/api/v1/file?filename=cv final.pdf"
        );
    }
}
