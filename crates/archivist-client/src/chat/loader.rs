//! Channel history pagination.
//!
//! The first page comes with the channel metadata; older pages are fetched
//! one at a time per channel and put in front of the list. Every request is
//! tagged with the feed generation it was issued for, and a response whose
//! generation no longer matches the selected channel is dropped.

use archivist_protocol::{Cursor, Message};

use crate::error::Result;
use crate::network::{ChannelPage, MessagePage, SharedApi};
use crate::state::{FeedChange, SessionInner, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing requested: already in flight, exhausted, or not the selected channel
    Skipped,
    /// First page stored
    Loaded(usize),
    /// Older messages put in front of the list
    Prepended(usize),
    /// No older messages remain
    Exhausted,
    /// The channel changed while the request was in flight
    Discarded,
}

struct OlderTicket {
    generation: u64,
    cursor: Cursor,
}

/// Sort a page ascending and drop repeated messages
fn normalize(mut page: Vec<Message>) -> Vec<Message> {
    // Ties are ordered by author so repeats of one message end up adjacent
    page.sort_by(|a, b| {
        a.timestamp
            .total_cmp(&b.timestamp)
            .then_with(|| a.channel_id.cmp(&b.channel_id))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    page.dedup_by(|a, b| a.key() == b.key());
    page
}

fn apply_initial(state: &mut SessionInner, page: ChannelPage) -> LoadOutcome {
    let messages = normalize(page.messages);
    let count = messages.len();

    state.refresh_channel(page.channel);

    let feed = &mut state.feed;
    feed.initial_loading = false;
    feed.messages = messages;
    if count == 0 {
        feed.all_messages_loaded = true;
        feed.cursor = None;
    } else {
        // Without a boundary there is nothing older to ask for.
        feed.all_messages_loaded = page.before.is_none();
        feed.cursor = page.before;
    }
    feed.record_change(FeedChange::Fresh);

    if count == 0 {
        LoadOutcome::Exhausted
    } else {
        LoadOutcome::Loaded(count)
    }
}

fn begin_older(state: &mut SessionInner, channel_id: &str) -> Option<OlderTicket> {
    if state.selected_channel.as_deref() != Some(channel_id)
        || state.older_in_flight.contains(channel_id)
    {
        return None;
    }

    let feed = &state.feed;
    if feed.channel_id.as_deref() != Some(channel_id)
        || feed.initial_loading
        || feed.all_messages_loaded
    {
        return None;
    }
    let ticket = OlderTicket {
        generation: feed.generation,
        cursor: feed.cursor.clone()?,
    };

    state.older_in_flight.insert(channel_id.to_string());
    Some(ticket)
}

fn apply_older(state: &mut SessionInner, page: MessagePage) -> LoadOutcome {
    let feed = &mut state.feed;

    if page.messages.is_empty() {
        feed.all_messages_loaded = true;
        return LoadOutcome::Exhausted;
    }

    let oldest = feed.messages.first().map(|m| m.timestamp);
    let older: Vec<Message> = normalize(page.messages)
        .into_iter()
        .filter(|m| oldest.is_none_or(|oldest| m.timestamp < oldest))
        .collect();

    if older.is_empty() {
        // The backend returned only what we already have; asking again
        // would return the same page.
        tracing::warn!("Older page made no progress, stopping pagination");
        feed.all_messages_loaded = true;
        return LoadOutcome::Exhausted;
    }

    let count = older.len();
    feed.messages.splice(0..0, older);
    feed.all_messages_loaded = page.before.is_none();
    feed.cursor = page.before;
    feed.record_change(FeedChange::Prepended);
    LoadOutcome::Prepended(count)
}

#[derive(Clone)]
pub struct ChannelMessageLoader {
    store: SessionStore,
    api: SharedApi,
}

impl ChannelMessageLoader {
    pub fn new(store: SessionStore, api: SharedApi) -> Self {
        Self { store, api }
    }

    /// Load channel metadata and the newest page for a fresh selection
    pub async fn initial(&self, channel_id: &str, generation: u64) -> Result<LoadOutcome> {
        tracing::info!(channel_id, generation, "Loading channel");
        let result = self.api.channel_with_messages(channel_id).await;

        let mut state = self.store.write().await;
        if !state.feed.is_current(channel_id, generation) {
            tracing::debug!(channel_id, generation, "Dropping stale channel load");
            return Ok(LoadOutcome::Discarded);
        }

        match result {
            Ok(page) => Ok(apply_initial(&mut state, page)),
            Err(e) => {
                state.fail(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetch the page before the oldest loaded message. At most one such
    /// request per channel is in flight at a time.
    pub async fn load_older(&self, channel_id: &str) -> Result<LoadOutcome> {
        let Some(ticket) = begin_older(&mut *self.store.write().await, channel_id) else {
            tracing::trace!(channel_id, "Skipping older page load");
            return Ok(LoadOutcome::Skipped);
        };

        tracing::debug!(channel_id, cursor = %ticket.cursor, "Loading older messages");
        let result = self.api.messages(channel_id, Some(&ticket.cursor)).await;

        let mut state = self.store.write().await;
        state.older_in_flight.remove(channel_id);

        if !state.feed.is_current(channel_id, ticket.generation) {
            tracing::debug!(channel_id, "Dropping older page for a previous selection");
            return Ok(LoadOutcome::Discarded);
        }

        match result {
            Ok(page) => Ok(apply_older(&mut state, page)),
            Err(e) => {
                state.fail(e.to_string());
                Err(e)
            }
        }
    }
}
