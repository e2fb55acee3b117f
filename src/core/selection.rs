use crate::domain::model::Selection;
use std::collections::VecDeque;

pub const MAX_LANGUAGES: usize = 3;

/// 單選的興趣原因：再次選取同一項會取消，選取另一項會取代
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestSelection {
    selected: Option<String>,
}

impl InterestSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.selected.as_deref() == Some(id.as_str()) {
            self.selected = None;
        } else {
            self.selected = Some(id);
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn to_selection(&self) -> Selection {
        Selection::new(self.selected.iter().cloned())
    }
}

/// 有上限的語言清單；超過上限時淘汰最早選取的語言 (FIFO)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSelection {
    codes: VecDeque<String>,
    max: usize,
}

impl Default for LanguageSelection {
    fn default() -> Self {
        Self::new(MAX_LANGUAGES)
    }
}

impl LanguageSelection {
    pub fn new(max: usize) -> Self {
        Self {
            codes: VecDeque::with_capacity(max),
            max: max.max(1),
        }
    }

    /// 切換語言；若因此淘汰了最舊的語言則回傳之
    pub fn toggle(&mut self, code: impl Into<String>) -> Option<String> {
        let code = code.into();
        if let Some(pos) = self.codes.iter().position(|c| *c == code) {
            self.codes.remove(pos);
            return None;
        }

        let evicted = if self.codes.len() >= self.max {
            self.codes.pop_front()
        } else {
            None
        };
        self.codes.push_back(code);
        evicted
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn to_selection(&self) -> Selection {
        Selection::new(self.codes.iter().cloned())
    }
}

impl<S: Into<String>> FromIterator<S> for LanguageSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::default();
        for code in iter {
            selection.toggle(code);
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_selection_is_single_select() {
        let mut interest = InterestSelection::new();
        interest.toggle("writing");
        interest.toggle("learning");
        assert_eq!(interest.selected(), Some("learning"));

        interest.toggle("learning");
        assert_eq!(interest.selected(), None);
        assert!(interest.to_selection().is_empty());
    }

    #[test]
    fn test_fourth_language_evicts_oldest() {
        let mut languages = LanguageSelection::default();
        assert_eq!(languages.toggle("en"), None);
        assert_eq!(languages.toggle("fr"), None);
        assert_eq!(languages.toggle("de"), None);
        assert_eq!(languages.toggle("es"), Some("en".to_string()));

        let codes: Vec<&str> = languages.codes().collect();
        assert_eq!(codes, vec!["fr", "de", "es"]);
    }

    #[test]
    fn test_toggle_removes_selected_language() {
        let mut languages: LanguageSelection = ["en", "fr"].into_iter().collect();
        languages.toggle("en");
        languages.toggle("it");

        assert_eq!(languages.to_selection().as_slice(), ["fr", "it"]);
    }
}
