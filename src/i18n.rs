//! Translation of static labels
//!
//! Labels are looked up by their English text. Missing keys fall back to the key itself,
//! so an empty catalog behaves like no translation at all.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

pub trait Translator: Send + Sync {
    fn t(&self, key: &str) -> String;
}

/// Returns every key unchanged
#[derive(Debug, Default, Clone)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn t(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Flat `{"key": "translation"}` catalog loaded from JSON
#[derive(Debug, Default, Clone)]
pub struct CatalogTranslator {
    entries: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read locale file: {}", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("Locale file is not a flat JSON object: {}", path.display()))?;
        Ok(Self::new(entries))
    }
}

impl Translator for CatalogTranslator {
    fn t(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Pick the catalog translator when a locale file is configured
pub fn load_translator(locale_file: Option<&Path>) -> Result<Box<dyn Translator>> {
    match locale_file {
        Some(path) => Ok(Box::new(CatalogTranslator::from_file(path)?)),
        None => Ok(Box::new(IdentityTranslator)),
    }
}
