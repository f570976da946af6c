use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Workspace member as exported by the archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
}

impl User {
    /// Display name, falling back to the real name and then the handle
    pub fn label(&self) -> &str {
        [&self.display_name, &self.real_name, &self.name]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Channel data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub purpose: String,
}

/// Message data. `timestamp` is the ordering key; `formatted_timestamp` is
/// only ever displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: String,
    pub user_id: String,
    pub text: String,
    pub timestamp: f64,
    #[serde(default)]
    pub formatted_timestamp: String,
    #[serde(default)]
    pub parent_user_id: Option<String>,
    #[serde(default)]
    pub thread_count: i64,
    pub user: User,
}

/// (channel_id, user_id, timestamp) uniquely identifies a message
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageKey<'a> {
    pub channel_id: &'a str,
    pub user_id: &'a str,
    pub timestamp: f64,
}

impl Message {
    pub fn key(&self) -> MessageKey<'_> {
        MessageKey {
            channel_id: &self.channel_id,
            user_id: &self.user_id,
            timestamp: self.timestamp,
        }
    }

    pub fn has_replies(&self) -> bool {
        self.thread_count > 0
    }
}

/// A search hit. Replies carry their thread parent for context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub message: Message,
    #[serde(default)]
    pub parent_message: Option<Box<Message>>,
}

/// An open thread: the parent plus its replies, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct MessageThread {
    pub parent_message: Message,
    pub replies: Vec<Message>,
}

/// Opaque pagination boundary (the oldest loaded message's timestamp as the
/// backend renders it). Accepted as either a JSON string or number and sent
/// back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Cursor(s),
            Raw::Number(n) => Cursor(n.to_string()),
        })
    }
}
