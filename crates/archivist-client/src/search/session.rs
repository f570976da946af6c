use crate::error::{ClientError, Result};
use crate::network::SharedApi;
use crate::state::SessionStore;

use super::SearchFilters;

/// What happened to a search submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results were stored
    Applied(usize),
    /// A newer submission (or closing the results) superseded this one
    Superseded,
}

/// Runs structured searches against the backend. The latest submission
/// wins: responses for older submissions are dropped when they arrive.
#[derive(Clone)]
pub struct SearchSession {
    store: SessionStore,
    api: SharedApi,
}

impl SearchSession {
    pub fn new(store: SessionStore, api: SharedApi) -> Self {
        Self { store, api }
    }

    pub async fn submit(&self, filters: SearchFilters) -> Result<SearchOutcome> {
        if filters.is_empty() {
            tracing::debug!("Ignoring empty search");
            self.store.close_search().await;
            return Err(ClientError::EmptySearch);
        }

        let form = filters.to_form();
        let sequence = self.store.write().await.begin_search(filters);
        tracing::info!(sequence, query = %form.query, "Searching");

        let result = self.api.search(&form).await;

        let mut state = self.store.write().await;
        if state.search.sequence != sequence {
            tracing::debug!(sequence, "Dropping superseded search response");
            return Ok(SearchOutcome::Superseded);
        }

        state.search.loading = false;
        match result {
            Ok(results) => {
                let count = results.len();
                state.search.results = results;
                Ok(SearchOutcome::Applied(count))
            }
            Err(e) => {
                tracing::warn!("Search failed: {}", e);
                state.search.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn close(&self) {
        self.store.close_search().await;
    }
}
