use tracing::debug;

use crate::api::{Catalog, CatalogError, Episode, Show};
use crate::cache::CatalogCache;
use crate::filter::{self, EPISODE_MATCHERS, SHOW_MATCHERS};

/// What is currently on screen. Carrying the active show inside the episode
/// variant makes "an active show exists exactly in episode view" structural.
#[derive(Debug, Clone)]
pub enum View {
    Shows { visible: Vec<Show> },
    Episodes { show: Show, visible: Vec<Episode> },
}

/// The single mutable record driving the UI. Owned by the app and passed
/// explicitly to the transition functions below; `visible` is always an
/// order-preserving subsequence of the corresponding cached list.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub view: View,
    pub search: String,
}

impl ViewState {
    pub fn new(shows: &[Show]) -> Self {
        Self {
            view: View::Shows {
                visible: shows.to_vec(),
            },
            search: String::new(),
        }
    }

    pub fn visible_len(&self) -> usize {
        match &self.view {
            View::Shows { visible } => visible.len(),
            View::Episodes { visible, .. } => visible.len(),
        }
    }

    pub fn active_show(&self) -> Option<&Show> {
        match &self.view {
            View::Shows { .. } => None,
            View::Episodes { show, .. } => Some(show),
        }
    }

    pub fn in_episode_view(&self) -> bool {
        matches!(self.view, View::Episodes { .. })
    }
}

/// Opens a show: fetches its episodes through the cache, then switches to
/// episode view with the search cleared and every episode visible. On fetch
/// failure the previous state is left untouched and the error is returned.
///
/// The caller's event loop awaits this to completion before reading the next
/// input event, so navigations never overlap; consecutive picks are
/// last-write-wins.
pub async fn pick_show<C: Catalog>(
    state: &mut ViewState,
    cache: &mut CatalogCache<C>,
    show: Show,
) -> Result<(), CatalogError> {
    let episodes = cache.episodes(show.id).await?.to_vec();
    debug!(show = %show.name, count = episodes.len(), "opened show");
    state.search.clear();
    state.view = View::Episodes {
        show,
        visible: episodes,
    };
    Ok(())
}

/// Narrows episode view to one episode, or restores the full list when the
/// "all episodes" sentinel (`None`) is chosen. Never changes the view mode;
/// a no-op in shows view.
pub fn pick_episode<C>(state: &mut ViewState, cache: &CatalogCache<C>, selection: Option<u64>) {
    let View::Episodes { show, visible } = &mut state.view else {
        return;
    };
    let full = cache.cached_episodes(show.id);
    *visible = match selection {
        Some(id) => full.iter().filter(|ep| ep.id == id).cloned().collect(),
        None => full.to_vec(),
    };
}

/// Returns to the show list, reusing the cached list without a re-fetch.
pub fn back_to_shows<C>(state: &mut ViewState, cache: &CatalogCache<C>) {
    state.search.clear();
    state.view = View::Shows {
        visible: cache.cached_shows().to_vec(),
    };
}

/// Resets the search and the visible list in shows view; meaningless (and a
/// no-op) in episode view.
pub fn clear_filters<C>(state: &mut ViewState, cache: &CatalogCache<C>) {
    if let View::Shows { visible } = &mut state.view {
        state.search.clear();
        *visible = cache.cached_shows().to_vec();
    }
}

/// Stores the raw search term and recomputes the visible list from the cached
/// full list of the current view, with that entity's matchers.
pub fn apply_search<C>(state: &mut ViewState, cache: &CatalogCache<C>, term: &str) {
    state.search = term.to_string();
    match &mut state.view {
        View::Shows { visible } => {
            *visible = filter::filter(cache.cached_shows(), term, SHOW_MATCHERS);
        }
        View::Episodes { show, visible } => {
            *visible = filter::filter(cache.cached_episodes(show.id), term, EPISODE_MATCHERS);
        }
    }
}
