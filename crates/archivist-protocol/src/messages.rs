//! Request and response bodies exchanged with the archive backend.
//!
//! Response envelopes keep their payload fields optional so a body that
//! decodes but lacks the expected field can be reported as malformed instead
//! of failing inside serde with a less useful message.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Channel, Cursor, Message, SearchResult, User};

/// `GET /api/channels`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsResponse {
    pub channels: Option<Vec<Channel>>,
}

/// `GET /api/channels/{id}`: channel metadata plus its newest page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelDetailsResponse {
    pub channel: Option<Channel>,
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub before_msg_timestamp: Option<Cursor>,
}

/// `GET /api/messages/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Option<Vec<Message>>,
    #[serde(default)]
    pub before_msg_timestamp: Option<Cursor>,
}

/// `GET /api/replies`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepliesResponse {
    pub messages: Option<Vec<Message>>,
}

/// `GET /api/users`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Option<Vec<User>>,
}

/// `POST /api/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub messages: Option<Vec<SearchResult>>,
}

/// URL-encoded form body for `POST /api/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchForm {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<NaiveDate>,
}

/// Query parameters for `GET /api/replies`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepliesQuery {
    pub ts: String,
    pub user_id: String,
    pub channel_id: String,
}

impl RepliesQuery {
    pub fn for_parent(parent: &Message) -> Self {
        Self {
            ts: parent.timestamp.to_string(),
            user_id: parent.user_id.clone(),
            channel_id: parent.channel_id.clone(),
        }
    }
}
