//! Visible-question selection

/// Question ids whose answers are expanded into links or choice labels.
/// Kept in toggle order; membership is what matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSelection {
    ids: Vec<i64>,
}

impl QuestionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        ids.into_iter().fold(Self::new(), |selection, id| {
            if selection.contains(id) {
                selection
            } else {
                selection.toggle(id)
            }
        })
    }

    /// Remove `id` if present, otherwise append it
    pub fn toggle(&self, id: i64) -> Self {
        let mut ids = self.ids.clone();
        match ids.iter().position(|existing| *existing == id) {
            Some(index) => {
                ids.remove(index);
            }
            None => ids.push(id),
        }
        Self { ids }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_set(selection: &QuestionSelection) -> HashSet<i64> {
        selection.ids().iter().copied().collect()
    }

    #[test]
    fn test_toggle_appends_and_removes() {
        let selection = QuestionSelection::new().toggle(3).toggle(9);
        assert_eq!(selection.ids(), &[3, 9]);

        let selection = selection.toggle(3);
        assert_eq!(selection.ids(), &[9]);
        assert!(!selection.contains(3));
    }

    #[test]
    fn test_toggle_twice_restores_contents() {
        let original = QuestionSelection::from_ids([1, 2, 5]);
        for id in [1, 2, 5, 42] {
            let restored = original.toggle(id).toggle(id);
            assert_eq!(as_set(&restored), as_set(&original));
        }
    }

    #[test]
    fn test_toggle_leaves_original_untouched() {
        let original = QuestionSelection::from_ids([7]);
        let _ = original.toggle(8);
        assert_eq!(original.ids(), &[7]);
        assert_eq!(QuestionSelection::from_ids([4, 4]).len(), 1);
    }
}
