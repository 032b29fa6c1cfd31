//! Display-ready rows produced by the projector

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Link to a backend resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

/// What a single table cell shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellValue {
    /// Plain value, no link and no tooltip
    Text { text: String },
    /// Value with a hover copy of itself
    Tooltip { text: String, tooltip: String },
    FileLink(Link),
    /// One link per uploaded file; may be empty
    FileLinks { links: Vec<Link> },
    /// Labels of the options matching the answer value
    Choices { labels: Vec<String> },
    /// Response id pointing at the response page of the current event
    ResponseLink { id: String, href: String },
}

impl CellValue {
    pub fn text(text: impl Into<String>) -> Self {
        CellValue::Text { text: text.into() }
    }

    /// Plain rendering used by terminal tables and CSV export
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text { text } | CellValue::Tooltip { text, .. } => text.clone(),
            CellValue::FileLink(link) => link.label.clone(),
            CellValue::FileLinks { links } => links
                .iter()
                .map(|link| link.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            CellValue::Choices { labels } => labels.join(", "),
            CellValue::ResponseLink { id, .. } => id.clone(),
        }
    }

    /// Secondary text shown for the selected cell, if any
    pub fn detail_text(&self) -> Option<String> {
        match self {
            CellValue::Tooltip { tooltip, .. } => Some(tooltip.clone()),
            CellValue::FileLink(link) => Some(link.href.clone()),
            CellValue::FileLinks { links } if !links.is_empty() => Some(
                links
                    .iter()
                    .map(|link| link.href.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            CellValue::ResponseLink { href, .. } => Some(href.clone()),
            _ => None,
        }
    }
}

/// Ordered column key to cell mapping for one response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedRow {
    cells: Vec<(String, CellValue)>,
}

impl ProjectedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell. An existing key keeps its position and gets the new value;
    /// returns true in that case.
    pub fn insert(&mut self, key: impl Into<String>, value: CellValue) -> bool {
        let key = key.into();
        match self.cells.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => {
                self.cells.push((key, value));
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for ProjectedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
