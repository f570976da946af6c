//! Fixtures and an in-memory [`ArchiveApi`] for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use archivist_protocol::{
    Channel, Cursor, Message, RepliesQuery, SearchForm, SearchResult, User,
};
use async_trait::async_trait;

use crate::error::{ClientError, Result};
use crate::network::{ArchiveApi, ChannelPage, MessagePage};

pub fn channel(id: &str, name: &str) -> Channel {
    Channel {
        id: id.to_string(),
        name: name.to_string(),
        topic: String::new(),
        purpose: String::new(),
    }
}

pub fn user(id: &str, name: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        real_name: String::new(),
        display_name: String::new(),
        image_url: String::new(),
        email: String::new(),
        deleted: false,
        is_bot: false,
    }
}

pub fn message(channel_id: &str, user_id: &str, timestamp: f64) -> Message {
    Message {
        channel_id: channel_id.to_string(),
        channel_name: String::new(),
        user_id: user_id.to_string(),
        text: format!("message at {}", timestamp),
        timestamp,
        formatted_timestamp: String::new(),
        parent_user_id: None,
        thread_count: 0,
        user: user(user_id, user_id),
    }
}

pub fn search_result(channel_id: &str, user_id: &str, timestamp: f64) -> SearchResult {
    SearchResult {
        message: message(channel_id, user_id, timestamp),
        parent_message: None,
    }
}

#[derive(Default)]
struct Script {
    channels: VecDeque<Result<Vec<Channel>>>,
    channel_pages: VecDeque<Result<ChannelPage>>,
    pages: VecDeque<Result<MessagePage>>,
    replies: VecDeque<Result<Vec<Message>>>,
    users: VecDeque<Result<Vec<User>>>,
    searches: VecDeque<Result<Vec<SearchResult>>>,

    channel_calls: Vec<String>,
    messages_calls: Vec<(String, Option<String>)>,
    replies_calls: Vec<RepliesQuery>,
    search_forms: Vec<SearchForm>,

    users_stalled: bool,
    page_delay: Duration,
    replies_delay: Duration,
    search_delay: Duration,
}

/// Scripted backend. Each endpoint pops its next queued response when the
/// call starts, then waits for the configured delay before returning it.
#[derive(Default)]
pub struct FakeApi {
    script: Mutex<Script>,
}

fn unscripted(endpoint: &'static str) -> ClientError {
    ClientError::MissingField(endpoint)
}

impl FakeApi {
    fn with<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut script = self.script.lock().unwrap();
        f(&mut script)
    }

    pub fn push_channels(&self, response: Result<Vec<Channel>>) {
        self.with(|s| s.channels.push_back(response));
    }

    pub fn push_channel_page(&self, response: Result<ChannelPage>) {
        self.with(|s| s.channel_pages.push_back(response));
    }

    pub fn push_page(&self, response: Result<MessagePage>) {
        self.with(|s| s.pages.push_back(response));
    }

    pub fn push_replies(&self, response: Result<Vec<Message>>) {
        self.with(|s| s.replies.push_back(response));
    }

    pub fn push_users(&self, response: Result<Vec<User>>) {
        self.with(|s| s.users.push_back(response));
    }

    pub fn push_search(&self, response: Result<Vec<SearchResult>>) {
        self.with(|s| s.searches.push_back(response));
    }

    /// Make `users()` never return
    pub fn stall_users(&self) {
        self.with(|s| s.users_stalled = true);
    }

    pub fn set_page_delay(&self, delay: Duration) {
        self.with(|s| s.page_delay = delay);
    }

    pub fn set_replies_delay(&self, delay: Duration) {
        self.with(|s| s.replies_delay = delay);
    }

    pub fn set_search_delay(&self, delay: Duration) {
        self.with(|s| s.search_delay = delay);
    }

    pub fn channel_calls(&self) -> Vec<String> {
        self.with(|s| s.channel_calls.clone())
    }

    pub fn messages_calls(&self) -> Vec<(String, Option<String>)> {
        self.with(|s| s.messages_calls.clone())
    }

    pub fn replies_calls(&self) -> Vec<RepliesQuery> {
        self.with(|s| s.replies_calls.clone())
    }

    pub fn search_calls(&self) -> usize {
        self.with(|s| s.search_forms.len())
    }

    pub fn search_forms(&self) -> Vec<SearchForm> {
        self.with(|s| s.search_forms.clone())
    }
}

async fn after(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl ArchiveApi for FakeApi {
    async fn channels(&self) -> Result<Vec<Channel>> {
        self.with(|s| s.channels.pop_front())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn channel_with_messages(&self, channel_id: &str) -> Result<ChannelPage> {
        self.with(|s| {
            s.channel_calls.push(channel_id.to_string());
            s.channel_pages.pop_front()
        })
        .unwrap_or_else(|| Err(unscripted("channel")))
    }

    async fn messages(&self, channel_id: &str, before: Option<&Cursor>) -> Result<MessagePage> {
        let (response, delay) = self.with(|s| {
            s.messages_calls
                .push((channel_id.to_string(), before.map(|c| c.to_string())));
            (s.pages.pop_front(), s.page_delay)
        });
        after(delay).await;
        response.unwrap_or_else(|| Ok(MessagePage::default()))
    }

    async fn replies(&self, parent: &Message) -> Result<Vec<Message>> {
        let (response, delay) = self.with(|s| {
            s.replies_calls.push(RepliesQuery::for_parent(parent));
            (s.replies.pop_front(), s.replies_delay)
        });
        after(delay).await;
        response.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn users(&self) -> Result<Vec<User>> {
        let (response, stalled) = self.with(|s| (s.users.pop_front(), s.users_stalled));
        if stalled {
            std::future::pending::<()>().await;
        }
        response.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn search(&self, form: &SearchForm) -> Result<Vec<SearchResult>> {
        let (response, delay) = self.with(|s| {
            s.search_forms.push(form.clone());
            (s.searches.pop_front(), s.search_delay)
        });
        after(delay).await;
        response.unwrap_or_else(|| Ok(Vec::new()))
    }
}
