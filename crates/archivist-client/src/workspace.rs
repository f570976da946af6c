use std::sync::Arc;

use archivist_protocol::Message;

use crate::chat::{ChannelMessageLoader, LoadOutcome, ThreadLoader, ThreadOutcome};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::network::{ArchiveClient, SharedApi};
use crate::search::{SearchFilters, SearchOutcome, SearchSession};
use crate::state::{Selection, SessionStore};

/// Entry point for every user action. Owns the session store and hands a
/// clone of it to each loader.
#[derive(Clone)]
pub struct Workspace {
    store: SessionStore,
    api: SharedApi,
    messages: ChannelMessageLoader,
    threads: ThreadLoader,
    search: SearchSession,
}

impl Workspace {
    pub fn new(api: SharedApi) -> Self {
        let store = SessionStore::new();
        Self {
            messages: ChannelMessageLoader::new(store.clone(), api.clone()),
            threads: ThreadLoader::new(store.clone(), api.clone()),
            search: SearchSession::new(store.clone(), api.clone()),
            store,
            api,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(Arc::new(ArchiveClient::new(config)))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Load the channel and user catalogs, then open the first channel.
    ///
    /// Each catalog is stored as soon as it arrives; a slow user list never
    /// holds back the channels.
    pub async fn bootstrap(&self) -> Result<()> {
        tracing::info!("Loading workspace");
        self.store.write().await.channels_loading = true;

        let users = async {
            match self.api.users().await {
                Ok(users) => {
                    tracing::info!("Loaded {} users", users.len());
                    self.store.set_users(users).await;
                }
                Err(e) => tracing::warn!("Failed to load users: {}", e),
            }
        };

        let ((), channels) = tokio::join!(users, self.load_channels());
        channels
    }

    async fn load_channels(&self) -> Result<()> {
        let channels = self.api.channels().await;

        let first = {
            let mut state = self.store.write().await;
            match channels {
                Ok(channels) => {
                    tracing::info!("Loaded {} channels", channels.len());
                    let first = channels.first().map(|c| c.id.clone());
                    state.set_channels(channels);
                    first.and_then(|id| state.open_initial_channel(&id).map(|g| (id, g)))
                }
                Err(e) => {
                    state.fail(e.to_string());
                    return Err(e);
                }
            }
        };

        if let Some((channel_id, generation)) = first {
            self.messages.initial(&channel_id, generation).await?;
        }
        Ok(())
    }

    /// Switch to a channel. Returns `None` when no load was needed.
    pub async fn select_channel(&self, channel_id: &str) -> Result<Option<LoadOutcome>> {
        match self.store.select_channel(channel_id).await {
            Selection::Reload(generation) => {
                tracing::info!(channel_id, "Selected channel");
                self.messages.initial(channel_id, generation).await.map(Some)
            }
            Selection::Unchanged => Ok(None),
            Selection::Rejected => {
                tracing::warn!(channel_id, "Ignoring unknown channel");
                Ok(None)
            }
        }
    }

    /// Fetch the next older page of the selected channel
    pub async fn load_older(&self) -> Result<LoadOutcome> {
        let selected = self.store.read().await.selected_channel.clone();
        match selected {
            Some(channel_id) => self.messages.load_older(&channel_id).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    pub async fn open_thread(&self, parent: Message) -> Result<ThreadOutcome> {
        self.threads.open(parent).await
    }

    pub async fn close_thread(&self) {
        self.threads.close().await;
    }

    pub async fn submit_search(&self, filters: SearchFilters) -> Result<SearchOutcome> {
        self.search.submit(filters).await
    }

    pub async fn close_search(&self) {
        self.search.close().await;
    }

    pub async fn logout(&self) {
        tracing::info!("Logging out");
        self.store.reset().await;
    }
}
