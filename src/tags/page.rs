//! Tag configuration page state

use tracing::{error, info, warn};

use crate::api::TagService;
use crate::errors::AdminError;
use crate::i18n::Translator;
use crate::models::{Language, Tag, TagType};
use crate::tags::draft::{validate_tag, TagDraft, TagField};

pub struct TagConfigPage {
    event_id: i64,
    languages: Vec<Language>,
    pub tags: Vec<Tag>,
    pub draft: TagDraft,
    pub is_multilingual: bool,
    pub is_valid: bool,
    pub loading: bool,
    /// Failure to load the tag list
    pub error: Option<String>,
    /// Validation or save errors of the entry form, already translated
    pub errors: Vec<String>,
    pub show_errors: bool,
    pub entry_visible: bool,
}

impl TagConfigPage {
    pub fn new(event_id: i64, languages: Vec<Language>) -> Self {
        let is_multilingual = languages.len() > 1;
        Self {
            event_id,
            languages,
            tags: Vec::new(),
            draft: TagDraft::new(),
            is_multilingual,
            is_valid: false,
            loading: false,
            error: None,
            errors: Vec::new(),
            show_errors: false,
            entry_visible: false,
        }
    }

    pub fn event_id(&self) -> i64 {
        self.event_id
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub async fn load(&mut self, service: &dyn TagService, translator: &dyn Translator) {
        self.loading = true;
        match service.get_tag_list(self.event_id).await {
            Ok(tags) => {
                info!("Loaded {} tags for event {}", tags.len(), self.event_id);
                self.tags = tags;
                self.error = None;
            }
            Err(err) => {
                error!("Loading tags failed: {}", err);
                self.error = Some(translator.t(&err.user_message()));
            }
        }
        self.loading = false;
    }

    /// Open an empty entry form
    pub fn show_entry(&mut self) {
        self.draft = TagDraft::new();
        self.open_entry();
    }

    /// Open the entry form prefilled with the tag at `index`
    pub fn edit_entry(&mut self, index: usize) -> bool {
        match self.tags.get(index) {
            Some(tag) => {
                self.draft = TagDraft::from_tag(tag);
                self.open_entry();
                true
            }
            None => false,
        }
    }

    pub fn hide_entry(&mut self) {
        self.entry_visible = false;
        self.show_errors = false;
        self.errors.clear();
    }

    fn open_entry(&mut self) {
        self.entry_visible = true;
        self.show_errors = false;
        self.errors.clear();
        self.revalidate();
    }

    pub fn update_text_field(&mut self, field: TagField, lang: &str, value: &str) {
        self.draft.update_text_field(field, lang, value);
        self.revalidate();
    }

    pub fn update_dropdown(&mut self, tag_type: TagType) {
        self.draft.update_dropdown(tag_type);
        self.revalidate();
    }

    fn revalidate(&mut self) {
        self.is_valid = validate_tag(&self.draft, &self.languages).is_empty();
    }

    /// Errors to display, empty until a save has been attempted
    pub fn visible_errors(&self) -> &[String] {
        if self.show_errors {
            self.errors.as_slice()
        } else {
            &[]
        }
    }

    /// Create a tag from the draft
    pub async fn save_new(&mut self, service: &dyn TagService, translator: &dyn Translator) -> bool {
        let tag = match self.validated_tag(translator) {
            Some(tag) => tag,
            None => return false,
        };

        match service.add_tag(&tag).await {
            Ok(saved) => {
                info!("Created tag {:?}", saved.id);
                self.tags.push(saved);
                self.finish_save();
                true
            }
            Err(err) => {
                self.fail_save(&err, translator);
                false
            }
        }
    }

    /// Update the tag being edited
    pub async fn save_update(&mut self, service: &dyn TagService, translator: &dyn Translator) -> bool {
        let tag = match self.validated_tag(translator) {
            Some(tag) => tag,
            None => return false,
        };
        if tag.id.is_none() {
            warn!("Update requested for a tag that was never saved");
            self.errors = vec![translator.t("Tag has not been saved yet")];
            self.show_errors = true;
            return false;
        }

        match service.update_tag(&tag).await {
            Ok(saved) => {
                info!("Updated tag {:?}", saved.id);
                match self.tags.iter_mut().find(|existing| existing.id == saved.id) {
                    Some(existing) => *existing = saved,
                    None => self.tags.push(saved),
                }
                self.finish_save();
                true
            }
            Err(err) => {
                self.fail_save(&err, translator);
                false
            }
        }
    }

    /// Create or update depending on whether the draft came from an existing tag
    pub async fn save(&mut self, service: &dyn TagService, translator: &dyn Translator) -> bool {
        if self.draft.id.is_some() {
            self.save_update(service, translator).await
        } else {
            self.save_new(service, translator).await
        }
    }

    pub async fn delete(&mut self, tag_id: i64, service: &dyn TagService, translator: &dyn Translator) -> bool {
        match service.delete_tag(self.event_id, tag_id).await {
            Ok(()) => {
                info!("Deleted tag {}", tag_id);
                self.tags.retain(|tag| tag.id != Some(tag_id));
                self.error = None;
                true
            }
            Err(err) => {
                error!("Deleting tag {} failed: {}", tag_id, err);
                self.error = Some(translator.t(&err.user_message()));
                false
            }
        }
    }

    fn validated_tag(&mut self, translator: &dyn Translator) -> Option<Tag> {
        match self.draft.to_tag(self.event_id, &self.languages) {
            Ok(tag) => Some(tag),
            Err(AdminError::Validation(messages)) => {
                self.errors = messages.iter().map(|m| translator.t(m)).collect();
                self.show_errors = true;
                None
            }
            Err(err) => {
                self.errors = vec![translator.t(&err.user_message())];
                self.show_errors = true;
                None
            }
        }
    }

    fn finish_save(&mut self) {
        self.draft = TagDraft::new();
        self.hide_entry();
        self.is_valid = false;
    }

    fn fail_save(&mut self, err: &AdminError, translator: &dyn Translator) {
        error!("Saving tag failed: {}", err);
        self.errors = vec![translator.t(&err.user_message())];
        self.show_errors = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{CatalogTranslator, IdentityTranslator};
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTags {
        tags: Mutex<Vec<Tag>>,
        reject_with: Option<String>,
    }

    #[async_trait]
    impl TagService for FakeTags {
        async fn get_tag_list(&self, event_id: i64) -> Result<Vec<Tag>, AdminError> {
            if let Some(message) = &self.reject_with {
                return Err(AdminError::Api { status_code: 400, message: message.clone() });
            }
            let tags = self.tags.lock().unwrap();
            Ok(tags.iter().filter(|t| t.event_id == event_id).cloned().collect())
        }

        async fn add_tag(&self, tag: &Tag) -> Result<Tag, AdminError> {
            if let Some(message) = &self.reject_with {
                return Err(AdminError::Api { status_code: 400, message: message.clone() });
            }
            let mut tags = self.tags.lock().unwrap();
            let mut saved = tag.clone();
            saved.id = Some(tags.len() as i64 + 1);
            tags.push(saved.clone());
            Ok(saved)
        }

        async fn update_tag(&self, tag: &Tag) -> Result<Tag, AdminError> {
            let mut tags = self.tags.lock().unwrap();
            if let Some(existing) = tags.iter_mut().find(|t| t.id == tag.id) {
                *existing = tag.clone();
            }
            Ok(tag.clone())
        }

        async fn delete_tag(&self, _event_id: i64, tag_id: i64) -> Result<(), AdminError> {
            self.tags.lock().unwrap().retain(|t| t.id != Some(tag_id));
            Ok(())
        }
    }

    fn stored_tag(id: i64, name: &str) -> Tag {
        Tag {
            id: Some(id),
            event_id: 7,
            tag_type: TagType::Response,
            name: BTreeMap::from([("en".to_string(), name.to_string())]),
            description: BTreeMap::new(),
        }
    }

    fn page() -> TagConfigPage {
        TagConfigPage::new(7, vec![Language::new("en", "English")])
    }

    #[tokio::test]
    async fn test_load_lists_event_tags() {
        let service = FakeTags::default();
        service.tags.lock().unwrap().push(stored_tag(1, "Shortlisted"));

        let mut page = page();
        page.load(&service, &IdentityTranslator).await;

        assert!(!page.loading);
        assert_eq!(page.tags.len(), 1);
        assert!(!page.is_multilingual);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_sent() {
        let service = FakeTags::default();
        let mut page = page();
        page.show_entry();
        assert!(page.visible_errors().is_empty());

        assert!(!page.save_new(&service, &IdentityTranslator).await);
        assert_eq!(
            page.visible_errors().to_vec(),
            vec!["Tag name is required".to_string(), "Tag type is required".to_string()]
        );
        assert!(service.tags.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_new_then_update_then_delete() {
        let service = FakeTags::default();
        let mut page = page();

        page.show_entry();
        page.update_text_field(TagField::Name, "en", "Speaker");
        assert!(!page.is_valid);
        page.update_dropdown(TagType::Registration);
        assert!(page.is_valid);
        assert!(page.save(&service, &IdentityTranslator).await);
        assert!(!page.entry_visible);
        assert_eq!(page.tags[0].id, Some(1));

        assert!(page.edit_entry(0));
        page.update_text_field(TagField::Name, "en", "Keynote speaker");
        assert!(page.save(&service, &IdentityTranslator).await);
        assert_eq!(page.tags.len(), 1);
        assert_eq!(page.tags[0].display_name("en"), "Keynote speaker");

        assert!(page.delete(1, &service, &IdentityTranslator).await);
        assert!(page.tags.is_empty());
        assert!(service.tags.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_errors_are_translated() {
        let service = FakeTags {
            reject_with: Some("Tag already exists".into()),
            ..Default::default()
        };
        let translator = CatalogTranslator::new(HashMap::from([(
            "Tag already exists".to_string(),
            "La balise existe déjà".to_string(),
        )]));

        let mut page = page();
        page.show_entry();
        page.update_text_field(TagField::Name, "en", "Speaker");
        page.update_dropdown(TagType::Response);

        assert!(!page.save_new(&service, &translator).await);
        assert_eq!(page.visible_errors().to_vec(), vec!["La balise existe déjà".to_string()]);
        assert!(page.entry_visible);

        page.load(&service, &translator).await;
        assert_eq!(page.error.as_deref(), Some("La balise existe déjà"));
    }

    #[test]
    fn test_multilingual_flag_and_missing_edit_target() {
        let mut page = TagConfigPage::new(
            1,
            vec![Language::new("en", "English"), Language::new("fr", "French")],
        );
        assert!(page.is_multilingual);
        assert!(!page.edit_entry(0));
        assert!(!page.entry_visible);
    }
}
