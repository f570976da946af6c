use super::query::{self, Catalog, SearchFilters, Suggestion};

/// Keys the search box reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Enter,
    ArrowUp,
    ArrowDown,
    Tab,
    Escape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Not handled; the widget should apply its default behaviour
    PassThrough,
    /// Handled internally (selection moved or suggestion committed)
    Consumed,
    /// Enter with no open suggestion list
    Submit(SearchFilters),
}

/// What a text change did to the suggestion list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChange {
    /// No suggestions are open; the query may be auto-submitted later
    Idle,
    /// A suggestion list is open
    Suggesting,
}

/// Editable search input with live filter suggestions
#[derive(Debug, Default)]
pub struct SearchBox {
    text: String,
    suggestions: Vec<Suggestion>,
    active: usize,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for text widgets; call [`SearchBox::refresh`] afterwards
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn active(&self) -> Option<usize> {
        (!self.suggestions.is_empty()).then_some(self.active)
    }

    pub fn is_suggesting(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn set_text(&mut self, text: impl Into<String>, catalog: Catalog<'_>) -> InputChange {
        self.text = text.into();
        self.refresh(catalog)
    }

    /// Recompute suggestions after the text changed
    pub fn refresh(&mut self, catalog: Catalog<'_>) -> InputChange {
        self.suggestions = query::suggest(&self.text, catalog);
        self.active = 0;
        if self.suggestions.is_empty() {
            InputChange::Idle
        } else {
            InputChange::Suggesting
        }
    }

    /// Highlight a suggestion, e.g. on hover
    pub fn hover(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.active = index;
        }
    }

    /// Commit the suggestion at `index` into the text
    pub fn select(&mut self, index: usize) {
        if let Some(suggestion) = self.suggestions.get(index) {
            self.text = query::complete(&self.text, suggestion);
        }
        self.dismiss();
    }

    /// Close the suggestion list without changing the text
    pub fn dismiss(&mut self) {
        self.suggestions.clear();
        self.active = 0;
    }

    pub fn submit(&mut self, catalog: Catalog<'_>) -> SearchFilters {
        self.dismiss();
        query::parse(&self.text, catalog)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.dismiss();
    }

    pub fn handle_key(&mut self, key: SearchKey, catalog: Catalog<'_>) -> KeyOutcome {
        let len = self.suggestions.len();

        match key {
            SearchKey::Enter if len > 0 => {
                self.select(self.active);
                KeyOutcome::Consumed
            }
            SearchKey::Enter => KeyOutcome::Submit(self.submit(catalog)),
            SearchKey::ArrowDown if len > 0 => {
                self.active = (self.active + 1) % len;
                KeyOutcome::Consumed
            }
            SearchKey::ArrowUp if len > 0 => {
                self.active = (self.active + len - 1) % len;
                KeyOutcome::Consumed
            }
            SearchKey::Tab | SearchKey::Escape if len > 0 => {
                self.select(self.active);
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::PassThrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{channel, user};

    fn catalog_data() -> (Vec<archivist_protocol::Channel>, Vec<archivist_protocol::User>) {
        (
            vec![channel("c1", "general"), channel("c2", "genomics")],
            vec![user("u1", "alice")],
        )
    }

    #[test]
    fn test_typing_filter_prefix_opens_suggestions() {
        let (channels, users) = catalog_data();
        let catalog = Catalog::new(&channels, &users);
        let mut search = SearchBox::new();

        assert_eq!(search.set_text("hello", catalog), InputChange::Idle);
        assert_eq!(search.set_text("hello in:#gen", catalog), InputChange::Suggesting);
        assert_eq!(search.suggestions().len(), 2);
        assert_eq!(search.active(), Some(0));
    }

    #[test]
    fn test_arrows_cycle() {
        let (channels, users) = catalog_data();
        let catalog = Catalog::new(&channels, &users);
        let mut search = SearchBox::new();
        search.set_text("in:#gen", catalog);

        assert_eq!(search.handle_key(SearchKey::ArrowUp, catalog), KeyOutcome::Consumed);
        assert_eq!(search.active(), Some(1));
        search.handle_key(SearchKey::ArrowDown, catalog);
        assert_eq!(search.active(), Some(0));
        search.handle_key(SearchKey::ArrowDown, catalog);
        search.handle_key(SearchKey::ArrowDown, catalog);
        assert_eq!(search.active(), Some(0));
    }

    #[test]
    fn test_enter_commits_active_suggestion() {
        let (channels, users) = catalog_data();
        let catalog = Catalog::new(&channels, &users);
        let mut search = SearchBox::new();
        search.set_text("report in:#gen", catalog);
        search.handle_key(SearchKey::ArrowDown, catalog);

        assert_eq!(search.handle_key(SearchKey::Enter, catalog), KeyOutcome::Consumed);
        assert_eq!(search.text(), "report in:#genomics ");
        assert!(!search.is_suggesting());
    }

    #[test]
    fn test_tab_and_escape_commit_when_open() {
        let (channels, users) = catalog_data();
        let catalog = Catalog::new(&channels, &users);
        let mut search = SearchBox::new();

        search.set_text("from:@al", catalog);
        assert_eq!(search.handle_key(SearchKey::Tab, catalog), KeyOutcome::Consumed);
        assert_eq!(search.text(), "from:@alice ");

        search.set_text("in:#gen", catalog);
        assert_eq!(search.handle_key(SearchKey::Escape, catalog), KeyOutcome::Consumed);
        assert_eq!(search.text(), "in:#general ");

        assert_eq!(search.handle_key(SearchKey::Tab, catalog), KeyOutcome::PassThrough);
        assert_eq!(search.handle_key(SearchKey::ArrowDown, catalog), KeyOutcome::PassThrough);
    }

    #[test]
    fn test_enter_without_suggestions_submits() {
        let (channels, users) = catalog_data();
        let catalog = Catalog::new(&channels, &users);
        let mut search = SearchBox::new();
        search.set_text("in:#general from:@alice hello", catalog);
        search.dismiss();

        match search.handle_key(SearchKey::Enter, catalog) {
            KeyOutcome::Submit(filters) => {
                assert_eq!(filters.query_text, "hello");
                assert_eq!(filters.channel_id.as_deref(), Some("c1"));
                assert_eq!(filters.user_id.as_deref(), Some("u1"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_dismiss_keeps_text() {
        let (channels, users) = catalog_data();
        let catalog = Catalog::new(&channels, &users);
        let mut search = SearchBox::new();
        search.set_text("in:#gen", catalog);
        search.dismiss();
        assert_eq!(search.text(), "in:#gen");
        assert_eq!(search.active(), None);
    }

    #[test]
    fn test_hover_ignores_out_of_range() {
        let (channels, users) = catalog_data();
        let catalog = Catalog::new(&channels, &users);
        let mut search = SearchBox::new();
        search.set_text("in:#gen", catalog);
        search.hover(1);
        search.hover(7);
        assert_eq!(search.active(), Some(1));
    }
}
