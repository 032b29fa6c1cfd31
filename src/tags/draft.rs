//! Tag entry form state and validation

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::AdminError;
use crate::models::{Language, Tag, TagType};

/// Per-language text fields of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Name,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagValidationError {
    NameRequired,
    TypeRequired,
}

impl TagValidationError {
    /// Untranslated message, also the translation key
    pub fn message(&self) -> &'static str {
        match self {
            TagValidationError::NameRequired => "Tag name is required",
            TagValidationError::TypeRequired => "Tag type is required",
        }
    }
}

impl fmt::Display for TagValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Tag being created or edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDraft {
    /// Set when editing an existing tag
    pub id: Option<i64>,
    pub tag_type: Option<TagType>,
    pub name: BTreeMap<String, String>,
    pub description: BTreeMap<String, String>,
}

impl TagDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tag(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            tag_type: Some(tag.tag_type),
            name: tag.name.clone(),
            description: tag.description.clone(),
        }
    }

    pub fn text(&self, field: TagField, lang: &str) -> &str {
        let values = match field {
            TagField::Name => &self.name,
            TagField::Description => &self.description,
        };
        values.get(lang).map(String::as_str).unwrap_or("")
    }

    pub fn update_text_field(&mut self, field: TagField, lang: &str, value: &str) {
        let values = match field {
            TagField::Name => &mut self.name,
            TagField::Description => &mut self.description,
        };
        values.insert(lang.to_string(), value.to_string());
    }

    pub fn update_dropdown(&mut self, tag_type: TagType) {
        self.tag_type = Some(tag_type);
    }

    /// Build the wire tag, rejecting drafts that fail validation
    pub fn to_tag(&self, event_id: i64, languages: &[Language]) -> Result<Tag, AdminError> {
        let errors = validate_tag(self, languages);
        let tag_type = match (errors.is_empty(), self.tag_type) {
            (true, Some(tag_type)) => tag_type,
            _ => {
                return Err(AdminError::Validation(
                    errors.iter().map(|e| e.message().to_string()).collect(),
                ))
            }
        };

        let non_blank = |values: &BTreeMap<String, String>| {
            values
                .iter()
                .filter(|(_, text)| !text.trim().is_empty())
                .map(|(lang, text)| (lang.clone(), text.trim().to_string()))
                .collect::<BTreeMap<_, _>>()
        };

        Ok(Tag {
            id: self.id,
            event_id,
            tag_type,
            name: non_blank(&self.name),
            description: non_blank(&self.description),
        })
    }
}

/// A name is required in every organisation language, and a type must be chosen
pub fn validate_tag(draft: &TagDraft, languages: &[Language]) -> Vec<TagValidationError> {
    let mut errors = Vec::new();

    let missing_name = languages.is_empty()
        || languages
            .iter()
            .any(|lang| draft.text(TagField::Name, &lang.code).trim().is_empty());
    if missing_name {
        errors.push(TagValidationError::NameRequired);
    }

    if draft.tag_type.is_none() {
        errors.push(TagValidationError::TypeRequired);
    }

    errors
}

/// `"{base} in {language}"` for multi-lingual organisations, otherwise `base`
pub fn field_label(base: &str, language_description: &str, is_multilingual: bool) -> String {
    if is_multilingual {
        format!("{} in {}", base, language_description)
    } else {
        base.to_string()
    }
}
