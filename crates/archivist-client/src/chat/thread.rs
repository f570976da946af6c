use archivist_protocol::{Message, MessageThread};

use crate::error::Result;
use crate::network::SharedApi;
use crate::state::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadOutcome {
    Opened(usize),
    /// Another thread was opened, or the panel closed, before the replies arrived
    Discarded,
}

/// Loads replies for the thread panel
#[derive(Clone)]
pub struct ThreadLoader {
    store: SessionStore,
    api: SharedApi,
}

impl ThreadLoader {
    pub fn new(store: SessionStore, api: SharedApi) -> Self {
        Self { store, api }
    }

    pub async fn open(&self, parent: Message) -> Result<ThreadOutcome> {
        let generation = self.store.write().await.begin_thread();
        tracing::debug!(
            channel_id = %parent.channel_id,
            ts = parent.timestamp,
            "Loading thread replies"
        );

        let result = self.api.replies(&parent).await;

        let mut state = self.store.write().await;
        if state.thread_generation != generation {
            tracing::debug!(generation, "Dropping replies for a closed thread");
            return Ok(ThreadOutcome::Discarded);
        }

        state.thread_loading = false;
        match result {
            Ok(replies) => {
                let count = replies.len();
                state.thread = Some(MessageThread {
                    parent_message: parent,
                    replies,
                });
                Ok(ThreadOutcome::Opened(count))
            }
            Err(e) => {
                state.fail(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn close(&self) {
        self.store.close_thread().await;
    }
}
