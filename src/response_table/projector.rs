//! Response table projector
//!
//! Flattens [`ResponseRecord`]s into [`ProjectedRow`]s. Row keys come out in this order:
//! `response_id`, `user_title`, any extra top-level fields of the record, one column per
//! answer headline, then `Review1..ReviewN`.
//!
//! Answer display depends on the answer type and on whether its question is selected:
//!
//! | type               | selected        | not selected |
//! |--------------------|-----------------|--------------|
//! | contains `text`    | value + tooltip | value + tooltip |
//! | `file`             | link            | value |
//! | `multi-file`       | one link per non-empty filename | value |
//! | contains `choice`  | labels of matching options | value |
//! | anything else      | value           | value |

use serde_json::Value;
use tracing::warn;

use crate::api::file_url;
use crate::models::{value_to_text, Answer, ResponseRecord};
use crate::response_table::row::{CellValue, Link, ProjectedRow};
use crate::response_table::selection::QuestionSelection;

/// Explicit inputs for link building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectorConfig {
    /// Backend base URL used for file links
    pub base_url: String,
    /// Event key; when present, response ids become response-page links
    pub event_key: Option<String>,
}

impl ProjectorConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            event_key: None,
        }
    }

    pub fn with_event_key(mut self, event_key: &str) -> Self {
        self.event_key = Some(event_key.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ResponseProjector {
    config: ProjectorConfig,
}

impl ResponseProjector {
    pub fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    pub fn project_rows(&self, records: &[ResponseRecord], selected: &QuestionSelection) -> Vec<ProjectedRow> {
        records
            .iter()
            .map(|record| self.project_row(record, selected))
            .collect()
    }

    /// Build a fresh row from one record; the record itself is left untouched
    pub fn project_row(&self, record: &ResponseRecord, selected: &QuestionSelection) -> ProjectedRow {
        let mut row = ProjectedRow::new();

        row.insert("response_id", self.response_id_cell(record));
        row.insert("user_title", CellValue::text(user_title(record)));

        for (key, value) in &record.extra {
            row.insert(key.clone(), CellValue::text(value_to_text(value)));
        }

        for answer in &record.answers {
            let cell = self.answer_cell(answer, selected);
            if row.insert(answer.headline.clone(), cell) {
                warn!(
                    "Response {} has more than one answer headlined '{}'; keeping the last one",
                    record.response_id_text(),
                    answer.headline
                );
            }
        }

        for (index, reviewer) in record.reviewers.iter().enumerate() {
            let name = reviewer
                .as_ref()
                .map(|reviewer| reviewer.reviewer_name.clone())
                .unwrap_or_default();
            row.insert(format!("Review{}", index + 1), CellValue::text(name));
        }

        row
    }

    fn response_id_cell(&self, record: &ResponseRecord) -> CellValue {
        let id = record.response_id_text();
        match self.config.event_key {
            Some(ref event_key) => CellValue::ResponseLink {
                href: format!("{}/responsePage/{}", event_key, id),
                id,
            },
            None => CellValue::text(id),
        }
    }

    fn answer_cell(&self, answer: &Answer, selected: &QuestionSelection) -> CellValue {
        let raw = value_to_text(&answer.value);

        if answer.answer_type.contains("text") {
            return CellValue::Tooltip {
                tooltip: raw.clone(),
                text: raw,
            };
        }

        let is_selected = answer
            .question_id
            .map(|id| selected.contains(id))
            .unwrap_or(false);
        if !is_selected {
            return CellValue::text(raw);
        }

        if answer.answer_type == "file" {
            CellValue::FileLink(self.file_link(&raw))
        } else if answer.answer_type == "multi-file" {
            let links = filenames(&answer.value)
                .iter()
                .map(|filename| self.file_link(filename))
                .collect();
            CellValue::FileLinks { links }
        } else if answer.answer_type.contains("choice") {
            let labels = answer
                .options
                .iter()
                .filter(|option| loosely_equal(&answer.value, &option.value))
                .map(|option| option.label.clone())
                .collect();
            CellValue::Choices { labels }
        } else {
            CellValue::text(raw)
        }
    }

    fn file_link(&self, filename: &str) -> Link {
        Link {
            label: filename.to_string(),
            href: file_url(&self.config.base_url, filename),
        }
    }
}

/// `title firstname lastname`, single-space joined even when parts are missing
pub fn user_title(record: &ResponseRecord) -> String {
    format!(
        "{} {} {}",
        record.user_title.as_deref().unwrap_or(""),
        record.firstname.as_deref().unwrap_or(""),
        record.lastname.as_deref().unwrap_or("")
    )
}

/// Non-empty filenames of a multi-file answer
fn filenames(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| is_truthy(item))
            .map(value_to_text)
            .collect(),
        single if is_truthy(single) => vec![value_to_text(single)],
        _ => Vec::new(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Equality used to match an answer value against option values.
///
/// Same JSON types compare structurally. Numbers match strings that parse to the same
/// number, booleans count as 0/1, and arrays compare as their comma-joined text.
pub fn loosely_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            parse_number(s) == n.as_f64()
        }
        (Value::Bool(b), other) | (other, Value::Bool(b)) if !other.is_boolean() => {
            let as_number = Value::from(if *b { 1 } else { 0 });
            loosely_equal(&as_number, other)
        }
        (Value::Array(items), Value::String(s)) | (Value::String(s), Value::Array(items)) => {
            joined(items) == *s
        }
        (a, b) => a == b,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Some(0.0)
    } else {
        trimmed.parse().ok()
    }
}

fn joined(items: &[Value]) -> String {
    items
        .iter()
        .map(value_to_text)
        .collect::<Vec<_>>()
        .join(",")
}
