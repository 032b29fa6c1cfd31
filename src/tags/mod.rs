//! Event tag configuration

pub mod draft;
pub mod page;

pub use draft::{field_label, validate_tag, TagDraft, TagField, TagValidationError};
pub use page::TagConfigPage;
