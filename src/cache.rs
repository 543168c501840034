use std::collections::HashMap;

use tracing::debug;

use crate::api::{Catalog, CatalogError, Episode, Show};

/// Process-lifetime memo of catalog responses. Entries are created lazily on
/// the first successful fetch and never evicted; a failed fetch leaves no
/// entry, so the next call retries. Concurrent in-flight calls for the same
/// key are not de-duplicated (the event loop never overlaps them anyway).
pub struct CatalogCache<C> {
    catalog: C,
    shows: Option<Vec<Show>>,
    episodes: HashMap<u64, Vec<Episode>>,
}

impl<C> CatalogCache<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            shows: None,
            episodes: HashMap::new(),
        }
    }

    /// Already-cached show list, without touching the network. Empty before
    /// the first successful [`CatalogCache::shows`] call.
    pub fn cached_shows(&self) -> &[Show] {
        self.shows.as_deref().unwrap_or_default()
    }

    /// Already-cached episode list for a show, without touching the network.
    pub fn cached_episodes(&self, show_id: u64) -> &[Episode] {
        self.episodes.get(&show_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<C: Catalog> CatalogCache<C> {
    /// The global show list, sorted by name (case-insensitive; ties keep the
    /// catalog's response order). Fetches on the first call only.
    pub async fn shows(&mut self) -> Result<&[Show], CatalogError> {
        if self.shows.is_none() {
            let mut fetched = self.catalog.fetch_shows().await?;
            fetched.sort_by_key(|s| s.name.to_lowercase());
            debug!(count = fetched.len(), "cached show list");
            self.shows = Some(fetched);
        }
        Ok(self.shows.as_deref().unwrap_or_default())
    }

    /// Episodes of one show, in the order the catalog serves them. Fetches on
    /// the first call per show.
    pub async fn episodes(&mut self, show_id: u64) -> Result<&[Episode], CatalogError> {
        if !self.episodes.contains_key(&show_id) {
            let fetched = self.catalog.fetch_episodes(show_id).await?;
            debug!(show_id, count = fetched.len(), "cached episode list");
            self.episodes.insert(show_id, fetched);
        }
        Ok(self.cached_episodes(show_id))
    }
}

#[cfg(test)]
impl<C> CatalogCache<C> {
    pub(crate) fn catalog(&self) -> &C {
        &self.catalog
    }
}
