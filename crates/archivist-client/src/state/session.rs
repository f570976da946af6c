use std::collections::HashSet;
use std::sync::Arc;

use archivist_protocol::{Channel, Cursor, Message, MessageThread, SearchResult, User};
use tokio::sync::RwLock;

use crate::search::SearchFilters;

/// Which content fills the main pane. The thread panel is tracked separately
/// because it can sit next to either `Channels` or `Search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Channels,
    Search,
    Error,
}

/// What the last mutation of the feed did to the message list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedChange {
    #[default]
    None,
    /// First page of a freshly selected channel
    Fresh,
    /// Older messages were put in front of the list
    Prepended,
}

/// Identifies one observed state of the feed, so scroll handling can tell
/// whether the list changed since it last looked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedStamp {
    pub generation: u64,
    pub revision: u64,
    pub change: FeedChange,
}

/// Message history of the selected channel
#[derive(Debug, Clone, Default)]
pub struct ChannelFeed {
    pub channel_id: Option<String>,
    /// Bumped on every channel selection; requests carry it to detect staleness
    pub generation: u64,
    /// Ascending by timestamp
    pub messages: Vec<Message>,
    pub cursor: Option<Cursor>,
    pub all_messages_loaded: bool,
    pub initial_loading: bool,
    pub revision: u64,
    pub last_change: FeedChange,
}

impl ChannelFeed {
    fn new(channel_id: &str, generation: u64) -> Self {
        Self {
            channel_id: Some(channel_id.to_string()),
            generation,
            initial_loading: true,
            ..Default::default()
        }
    }

    pub fn is_current(&self, channel_id: &str, generation: u64) -> bool {
        self.generation == generation && self.channel_id.as_deref() == Some(channel_id)
    }

    pub fn stamp(&self) -> FeedStamp {
        FeedStamp {
            generation: self.generation,
            revision: self.revision,
            change: self.last_change,
        }
    }

    pub(crate) fn record_change(&mut self, change: FeedChange) {
        self.revision += 1;
        self.last_change = change;
    }
}

/// Search results and their own loading/error sub-state
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub results: Vec<SearchResult>,
    pub loading: bool,
    pub error: Option<String>,
    pub filters: Option<SearchFilters>,
    /// Latest issued submission; only its response is applied
    pub sequence: u64,
}

impl SearchState {
    fn clear(&mut self) {
        self.results.clear();
        self.loading = false;
        self.error = None;
        self.filters = None;
        self.sequence += 1;
    }
}

/// The content that currently owns the main pane
#[derive(Debug, Clone, Copy)]
pub enum PrimaryContent<'a> {
    Messages(&'a [Message]),
    SearchResults(&'a SearchState),
    Error(&'a str),
}

/// Result of clicking a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Feed was reset; load the channel under this generation
    Reload(u64),
    /// Already showing this channel, only the view changed
    Unchanged,
    /// Not a known channel
    Rejected,
}

#[derive(Debug, Default)]
pub struct SessionInner {
    pub view: ViewState,
    pub error: Option<String>,

    // Catalogs
    pub channels: Vec<Channel>,
    pub users: Vec<User>,
    pub channels_loading: bool,

    // Selected channel
    pub selected_channel: Option<String>,
    pub feed: ChannelFeed,
    /// Channels with an older-page request on the wire
    pub older_in_flight: HashSet<String>,

    // Thread panel
    pub thread: Option<MessageThread>,
    pub thread_generation: u64,
    pub thread_loading: bool,

    pub search: SearchState,

    next_generation: u64,
}

impl SessionInner {
    pub fn selected_channel(&self) -> Option<&Channel> {
        let id = self.selected_channel.as_deref()?;
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn channel(&self, channel_id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == channel_id)
    }

    pub fn primary(&self) -> PrimaryContent<'_> {
        match self.view {
            ViewState::Channels => PrimaryContent::Messages(&self.feed.messages),
            ViewState::Search => PrimaryContent::SearchResults(&self.search),
            ViewState::Error => {
                PrimaryContent::Error(self.error.as_deref().unwrap_or("An unknown error occurred."))
            }
        }
    }

    pub fn is_thread_open(&self) -> bool {
        self.thread.is_some()
    }

    pub fn set_channels(&mut self, channels: Vec<Channel>) {
        self.channels = channels;
        self.channels_loading = false;

        let still_known = self
            .selected_channel
            .as_deref()
            .is_some_and(|id| self.channels.iter().any(|c| c.id == id));
        if !still_known && self.selected_channel.is_some() {
            self.selected_channel = None;
            self.reset_feed(None);
        }
    }

    /// Replace a channel's metadata with a fresher copy of the same channel
    pub(crate) fn refresh_channel(&mut self, channel: Channel) {
        if let Some(existing) = self.channels.iter_mut().find(|c| c.id == channel.id) {
            *existing = channel;
        }
    }

    pub fn select_channel(&mut self, channel_id: &str) -> Selection {
        if self.channel(channel_id).is_none() {
            return Selection::Rejected;
        }

        let same = self.selected_channel.as_deref() == Some(channel_id);
        let recovering = self.view == ViewState::Error;

        self.view = ViewState::Channels;
        self.error = None;
        self.close_thread();
        self.search.clear();

        if same && !recovering {
            return Selection::Unchanged;
        }

        Selection::Reload(self.point_feed_at(channel_id))
    }

    /// Select the startup channel without touching the view, so a search
    /// submitted while the catalog was loading stays on screen. Returns the
    /// generation to load under, or `None` for an unknown channel.
    pub fn open_initial_channel(&mut self, channel_id: &str) -> Option<u64> {
        self.channel(channel_id)?;
        Some(self.point_feed_at(channel_id))
    }

    fn point_feed_at(&mut self, channel_id: &str) -> u64 {
        self.selected_channel = Some(channel_id.to_string());
        self.reset_feed(Some(channel_id))
    }

    fn reset_feed(&mut self, channel_id: Option<&str>) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.feed = match channel_id {
            Some(id) => ChannelFeed::new(id, generation),
            None => ChannelFeed {
                generation,
                ..Default::default()
            },
        };
        generation
    }

    /// Enter the search view for a new submission; returns its sequence number
    pub fn begin_search(&mut self, filters: SearchFilters) -> u64 {
        self.view = ViewState::Search;
        self.error = None;
        self.search.results.clear();
        self.search.error = None;
        self.search.loading = true;
        self.search.filters = Some(filters);
        self.search.sequence += 1;
        self.search.sequence
    }

    pub fn close_search(&mut self) {
        self.search.clear();
        self.view = ViewState::Channels;
    }

    /// Returns the thread generation the replies request must match
    pub fn begin_thread(&mut self) -> u64 {
        self.thread_generation += 1;
        self.thread_loading = true;
        self.thread_generation
    }

    pub fn close_thread(&mut self) {
        self.thread = None;
        self.thread_loading = false;
        self.thread_generation += 1;
    }

    /// Back to defaults, keeping the request counters so responses issued
    /// before the reset can never match afterwards
    pub fn reset(&mut self) {
        let next_generation = self.next_generation;
        let thread_generation = self.thread_generation + 1;
        let sequence = self.search.sequence + 1;

        *self = Self {
            next_generation,
            thread_generation,
            search: SearchState {
                sequence,
                ..Default::default()
            },
            ..Default::default()
        };
    }

    /// Collapse the session into the error view. The thread panel only sits
    /// beside messages or results, so it closes too.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("Session error: {}", message);
        self.view = ViewState::Error;
        self.error = Some(message);
        self.channels_loading = false;
        self.feed.initial_loading = false;
        self.close_thread();
    }
}

/// Shared handle to the session state. Every component holds a clone.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionInner>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, SessionInner> {
        self.inner.read().await
    }

    pub(crate) async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, SessionInner> {
        self.inner.write().await
    }

    pub async fn view(&self) -> ViewState {
        self.inner.read().await.view
    }

    pub async fn set_users(&self, users: Vec<User>) {
        self.inner.write().await.users = users;
    }

    pub async fn select_channel(&self, channel_id: &str) -> Selection {
        self.inner.write().await.select_channel(channel_id)
    }

    pub async fn close_search(&self) {
        self.inner.write().await.close_search();
    }

    pub async fn close_thread(&self) {
        self.inner.write().await.close_thread();
    }

    /// Back to defaults, e.g. on logout
    pub async fn reset(&self) {
        self.inner.write().await.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{channel, message};

    fn with_channels() -> SessionInner {
        let mut state = SessionInner::default();
        state.set_channels(vec![channel("c1", "general"), channel("c2", "random")]);
        state
    }

    #[test]
    fn test_select_channel_resets_feed_and_bumps_generation() {
        let mut state = with_channels();
        let Selection::Reload(first) = state.select_channel("c1") else {
            panic!("expected reload");
        };
        state.feed.messages.push(message("c1", "u1", 1.0));
        state.feed.all_messages_loaded = true;

        let Selection::Reload(second) = state.select_channel("c2") else {
            panic!("expected reload");
        };
        assert!(second > first);
        assert!(state.feed.messages.is_empty());
        assert!(!state.feed.all_messages_loaded);
        assert!(state.feed.cursor.is_none());
        assert!(state.feed.initial_loading);
        assert_eq!(state.selected_channel().unwrap().name, "random");
    }

    #[test]
    fn test_unknown_channel_is_rejected() {
        let mut state = with_channels();
        assert_eq!(state.select_channel("nope"), Selection::Rejected);
        assert!(state.selected_channel.is_none());
    }

    #[test]
    fn test_reselecting_current_channel_keeps_feed() {
        let mut state = with_channels();
        state.select_channel("c1");
        state.feed.messages.push(message("c1", "u1", 1.0));
        state.begin_search(SearchFilters::default());

        assert_eq!(state.select_channel("c1"), Selection::Unchanged);
        assert_eq!(state.view, ViewState::Channels);
        assert_eq!(state.feed.messages.len(), 1);
        assert!(state.search.results.is_empty());
    }

    #[test]
    fn test_reselecting_after_error_reloads() {
        let mut state = with_channels();
        state.select_channel("c1");
        state.fail("boom");
        assert!(matches!(state.select_channel("c1"), Selection::Reload(_)));
        assert_eq!(state.view, ViewState::Channels);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_channel_click_clears_thread_and_search() {
        let mut state = with_channels();
        state.select_channel("c1");
        state.thread = Some(MessageThread {
            parent_message: message("c1", "u1", 1.0),
            replies: vec![],
        });
        let sequence = state.begin_search(SearchFilters::default());

        state.select_channel("c2");
        assert!(state.thread.is_none());
        assert_eq!(state.view, ViewState::Channels);
        assert!(state.search.sequence > sequence);
        assert!(!state.search.loading);
    }

    #[test]
    fn test_thread_overlay_keeps_underlying_view() {
        let mut state = with_channels();
        state.begin_search(SearchFilters::default());
        state.thread = Some(MessageThread {
            parent_message: message("c1", "u1", 1.0),
            replies: vec![],
        });
        assert_eq!(state.view, ViewState::Search);
        assert!(state.is_thread_open());

        state.close_thread();
        assert_eq!(state.view, ViewState::Search);
        assert!(!state.is_thread_open());
    }

    #[test]
    fn test_initial_channel_leaves_search_alone() {
        let mut state = with_channels();
        let sequence = state.begin_search(SearchFilters::default());

        let generation = state.open_initial_channel("c1").unwrap();
        assert!(state.feed.is_current("c1", generation));
        assert_eq!(state.view, ViewState::Search);
        assert_eq!(state.search.sequence, sequence);
        assert!(state.search.loading);

        assert_eq!(state.open_initial_channel("nope"), None);
    }

    #[test]
    fn test_failure_closes_thread_panel() {
        let mut state = with_channels();
        state.select_channel("c1");
        let generation = state.begin_thread();
        state.thread = Some(MessageThread {
            parent_message: message("c1", "u1", 1.0),
            replies: vec![],
        });

        state.fail("Failed to fetch messages.");
        assert_eq!(state.view, ViewState::Error);
        assert!(!state.is_thread_open());
        assert!(!state.thread_loading);
        assert!(state.thread_generation > generation);
    }

    #[test]
    fn test_primary_content_follows_view() {
        let mut state = with_channels();
        assert!(matches!(state.primary(), PrimaryContent::Messages(_)));

        state.begin_search(SearchFilters::default());
        assert!(matches!(state.primary(), PrimaryContent::SearchResults(_)));

        state.close_search();
        assert_eq!(state.view, ViewState::Channels);

        state.fail("Failed to fetch channels.");
        match state.primary() {
            PrimaryContent::Error(message) => assert_eq!(message, "Failed to fetch channels."),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_replacing_channels_drops_vanished_selection() {
        let mut state = with_channels();
        state.select_channel("c2");
        state.set_channels(vec![channel("c1", "general")]);
        assert!(state.selected_channel.is_none());
        assert!(state.feed.channel_id.is_none());
    }

    #[test]
    fn test_reset_keeps_generations_moving_forward() {
        let mut state = with_channels();
        let Selection::Reload(before) = state.select_channel("c1") else {
            panic!("expected reload");
        };
        state.reset();
        state.set_channels(vec![channel("c1", "general")]);

        let Selection::Reload(after) = state.select_channel("c1") else {
            panic!("expected reload");
        };
        assert!(after > before);
        assert!(!state.feed.is_current("c1", before));
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let store = SessionStore::new();
        store.write().await.set_channels(vec![channel("c1", "general")]);
        store.select_channel("c1").await;
        store.write().await.fail("boom");

        store.reset().await;
        let state = store.read().await;
        assert_eq!(state.view, ViewState::Channels);
        assert!(state.channels.is_empty());
        assert!(state.feed.channel_id.is_none());
        assert!(state.selected_channel.is_none());
        assert!(state.error.is_none());
    }
}
