use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One questionnaire submission as returned by the responses endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub response_id: Value,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub user_title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub answers: Vec<Answer>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviewers: Vec<Option<Reviewer>>,
    /// Remaining top-level fields, kept in the order the backend sent them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResponseRecord {
    pub fn new(response_id: impl Into<Value>) -> Self {
        Self {
            response_id: response_id.into(),
            firstname: None,
            lastname: None,
            user_title: None,
            answers: Vec::new(),
            reviewers: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn response_id_text(&self) -> String {
        value_to_text(&self.response_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub headline: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub answer_type: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub question_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    #[serde(default)]
    pub value: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reviewer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviewer_name: String,
}

/// Entry of the question picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headline: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TagType {
    Response,
    Registration,
}

impl TagType {
    pub const ALL: [TagType; 2] = [TagType::Response, TagType::Registration];

    pub fn as_str(&self) -> &str {
        match self {
            TagType::Response => "RESPONSE",
            TagType::Registration => "REGISTRATION",
        }
    }

    pub fn parse(value: &str) -> Option<TagType> {
        match value.to_uppercase().as_str() {
            "RESPONSE" => Some(TagType::Response),
            "REGISTRATION" => Some(TagType::Registration),
            _ => None,
        }
    }
}

/// Typed, optionally multi-lingual label attached to an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub event_id: i64,
    pub tag_type: TagType,
    /// Language code to name
    #[serde(default)]
    pub name: BTreeMap<String, String>,
    #[serde(default)]
    pub description: BTreeMap<String, String>,
}

impl Tag {
    /// Name in the given language, falling back to any available translation
    pub fn display_name(&self, lang: &str) -> &str {
        self.name
            .get(lang)
            .or_else(|| self.name.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Organisation language, e.g. `en` / `English`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub description: String,
}

impl Language {
    pub fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
        }
    }
}

/// Render a JSON value the way a cell shows it
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_record_deserialization() {
        let sample = r#"{
            "response_id": 17,
            "user_title": "Dr.",
            "firstname": "Jane",
            "lastname": "Doe",
            "start_date": "2024-03-01",
            "answers": [
                {"headline": "Motivation", "type": "long-text", "value": "Because", "question_id": 4, "options": null}
            ],
            "reviewers": [{"reviewer_name": "Alice"}, null],
            "is_submitted": true
        }"#;

        let record: ResponseRecord = serde_json::from_str(sample).unwrap();
        assert_eq!(record.response_id_text(), "17");
        assert_eq!(record.firstname.as_deref(), Some("Jane"));
        assert_eq!(record.answers.len(), 1);
        assert!(record.answers[0].options.is_empty());
        assert_eq!(record.answers[0].answer_type, "long-text");
        assert_eq!(record.reviewers[1], None);

        let extra_keys: Vec<&String> = record.extra.keys().collect();
        assert_eq!(extra_keys, vec!["start_date", "is_submitted"]);
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let record: ResponseRecord =
            serde_json::from_str(r#"{"response_id": "a1", "answers": null}"#).unwrap();
        assert!(record.answers.is_empty());
        assert!(record.reviewers.is_empty());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_null_strings_read_as_empty() {
        let sample = r#"[{
            "response_id": 1,
            "answers": [
                {"headline": null, "type": null, "value": "2", "options": [{"value": "2", "label": null}]}
            ],
            "reviewers": [{"reviewer_name": null}]
        }]"#;

        let records: Vec<ResponseRecord> = serde_json::from_str(sample).unwrap();
        let answer = &records[0].answers[0];
        assert_eq!(answer.headline, "");
        assert_eq!(answer.answer_type, "");
        assert_eq!(answer.options[0].label, "");
        assert_eq!(records[0].reviewers[0].as_ref().unwrap().reviewer_name, "");

        let question: Question =
            serde_json::from_str(r#"{"question_id": 4, "headline": null}"#).unwrap();
        assert_eq!(question.headline, "");
    }

    #[test]
    fn test_tag_round_trip_uses_uppercase_type() {
        let mut name = BTreeMap::new();
        name.insert("en".to_string(), "Shortlisted".to_string());
        let tag = Tag {
            id: None,
            event_id: 3,
            tag_type: TagType::Response,
            name,
            description: BTreeMap::new(),
        };

        let encoded = serde_json::to_value(&tag).unwrap();
        assert_eq!(encoded["tag_type"], json!("RESPONSE"));
        assert!(encoded.get("id").is_none());
        assert_eq!(tag.display_name("fr"), "Shortlisted");
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&Value::Null), "");
        assert_eq!(value_to_text(&json!("x")), "x");
        assert_eq!(value_to_text(&json!(["a", "b"])), "a, b");
        assert_eq!(value_to_text(&json!(3)), "3");
        assert_eq!(TagType::parse("registration"), Some(TagType::Registration));
    }
}
