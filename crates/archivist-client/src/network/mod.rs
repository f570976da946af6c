mod api;

use std::sync::Arc;

use archivist_protocol::{
    Channel, ChannelDetailsResponse, ChannelsResponse, Cursor, Message, MessagesResponse,
    RepliesQuery, RepliesResponse, SearchForm, SearchResponse, SearchResult, User, UsersResponse,
};
use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::{require, Result};

const NO_QUERY: [(&str, &str); 0] = [];

/// Channel metadata together with its newest page
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPage {
    pub channel: Channel,
    pub messages: Vec<Message>,
    pub before: Option<Cursor>,
}

/// One page of messages, oldest first, plus the boundary of that page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub before: Option<Cursor>,
}

/// The backend endpoints the session engine consumes
#[async_trait]
pub trait ArchiveApi: Send + Sync {
    async fn channels(&self) -> Result<Vec<Channel>>;
    async fn channel_with_messages(&self, channel_id: &str) -> Result<ChannelPage>;
    /// Messages strictly older than `before`, or the newest page when `None`
    async fn messages(&self, channel_id: &str, before: Option<&Cursor>) -> Result<MessagePage>;
    async fn replies(&self, parent: &Message) -> Result<Vec<Message>>;
    async fn users(&self) -> Result<Vec<User>>;
    async fn search(&self, form: &SearchForm) -> Result<Vec<SearchResult>>;
}

pub type SharedApi = Arc<dyn ArchiveApi>;

/// HTTP implementation of [`ArchiveApi`]
#[derive(Clone)]
pub struct ArchiveClient {
    http: reqwest::Client,
    server_url: String,
    auth_token: Option<String>,
    per_page: u32,
}

impl ArchiveClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_url: config.server_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
            per_page: config.per_page,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.server_url, path)
    }

    fn token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

#[async_trait]
impl ArchiveApi for ArchiveClient {
    async fn channels(&self) -> Result<Vec<Channel>> {
        let response: ChannelsResponse =
            api::get(&self.http, &self.url("channels"), &NO_QUERY, self.token()).await?;
        require(response.channels, "channels")
    }

    async fn channel_with_messages(&self, channel_id: &str) -> Result<ChannelPage> {
        let url = self.url(&format!("channels/{}", urlencoding::encode(channel_id)));
        let response: ChannelDetailsResponse =
            api::get(&self.http, &url, &NO_QUERY, self.token()).await?;

        Ok(ChannelPage {
            channel: require(response.channel, "channel")?,
            messages: require(response.messages, "messages")?,
            before: response.before_msg_timestamp,
        })
    }

    async fn messages(&self, channel_id: &str, before: Option<&Cursor>) -> Result<MessagePage> {
        let url = self.url(&format!("messages/{}", urlencoding::encode(channel_id)));
        let per_page = self.per_page.to_string();

        let mut query = Vec::with_capacity(2);
        if let Some(cursor) = before {
            query.push(("before_msg_timestamp", cursor.as_str()));
        }
        query.push(("per_page", per_page.as_str()));

        let response: MessagesResponse = api::get(&self.http, &url, &query, self.token()).await?;

        Ok(MessagePage {
            messages: require(response.messages, "messages")?,
            before: response.before_msg_timestamp,
        })
    }

    async fn replies(&self, parent: &Message) -> Result<Vec<Message>> {
        let query = RepliesQuery::for_parent(parent);
        let response: RepliesResponse =
            api::get(&self.http, &self.url("replies"), &query, self.token()).await?;
        require(response.messages, "messages")
    }

    async fn users(&self) -> Result<Vec<User>> {
        let response: UsersResponse =
            api::get(&self.http, &self.url("users"), &NO_QUERY, self.token()).await?;
        require(response.users, "users")
    }

    async fn search(&self, form: &SearchForm) -> Result<Vec<SearchResult>> {
        let response: SearchResponse =
            api::post_form(&self.http, &self.url("search"), form, self.token()).await?;
        require(response.messages, "messages")
    }
}
