use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::debounce::Debouncer;
use crate::favorites::Favorites;
use crate::paginator::Paginator;
use crate::query::{QueryCache, FAVORITES_STALE, SEARCH_STALE};
use crate::view::{reconcile, ViewInputs, ViewModel};

/// A simplified Pokemon record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub sprite: String,
    pub weight: u32,
    pub height: u32,
    pub types: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    All,
    Favorites,
}

impl Tab {
    pub fn toggle(self) -> Self {
        match self {
            Tab::All => Tab::Favorites,
            Tab::Favorites => Tab::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::All => "ALL",
            Tab::Favorites => "FAVORITES",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchState {
    /// Search box has keyboard focus.
    pub active: bool,
    pub input: String,
    pub debouncer: Debouncer,
    /// Results for `debouncer.committed()`.
    pub results: DataResource<Vec<Item>>,
    #[serde(skip, default = "search_cache")]
    pub cache: QueryCache<Vec<Item>>,
}

fn search_cache() -> QueryCache<Vec<Item>> {
    QueryCache::new(SEARCH_STALE)
}

fn favorites_cache() -> QueryCache<Vec<Item>> {
    QueryCache::new(FAVORITES_STALE)
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            active: false,
            input: String::new(),
            debouncer: Debouncer::default(),
            results: DataResource::Empty,
            cache: search_cache(),
        }
    }
}

impl SearchState {
    pub fn committed(&self) -> &str {
        self.debouncer.committed()
    }

    pub fn has_searched(&self) -> bool {
        self.debouncer.has_searched()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub tab: Tab,
    pub search: SearchState,
    pub paginator: Paginator,
    pub favorites: Favorites,
    /// Resolved records for `favorites.names()`.
    pub favorite_items: DataResource<Vec<Item>>,
    #[serde(skip, default = "favorites_cache")]
    pub favorite_cache: QueryCache<Vec<Item>>,
    pub selected_index: usize,
    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Favorites::default(), Paginator::default())
    }
}

impl AppState {
    pub fn new(favorites: Favorites, paginator: Paginator) -> Self {
        Self {
            terminal_size: (80, 24),
            tab: Tab::All,
            search: SearchState::default(),
            paginator,
            favorites,
            favorite_items: DataResource::Empty,
            favorite_cache: favorites_cache(),
            selected_index: 0,
            message: None,
        }
    }

    pub fn view(&self) -> ViewModel {
        reconcile(ViewInputs {
            tab: self.tab,
            committed_query: self.search.committed(),
            search: &self.search.results,
            paginator: &self.paginator,
            favorites: &self.favorites,
            favorite_items: &self.favorite_items,
        })
    }

    pub fn selected_item(&self) -> Option<Item> {
        self.view().displayed_items.get(self.selected_index).cloned()
    }

    /// Clamps the selection to `len` rows. Returns whether it moved.
    pub fn set_selected_index(&mut self, index: usize, len: usize) -> bool {
        if len == 0 {
            let moved = self.selected_index != 0;
            self.selected_index = 0;
            return moved;
        }
        let bounded = index.min(len - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let view = self.view();
        vec![
            DebugSection::new("View")
                .entry("tab", ron_string(&self.tab))
                .entry("source", ron_string(&view.source))
                .entry("displayed", ron_string(&view.displayed_items.len()))
                .entry("loading", ron_string(&view.is_loading))
                .entry("error", ron_string(&view.error))
                .entry("no_results", ron_string(&view.show_no_results))
                .entry("selected", ron_string(&self.selected_index)),
            DebugSection::new("Search")
                .entry("input", ron_string(&self.search.input))
                .entry("committed", ron_string(&self.search.committed()))
                .entry("pending", ron_string(&self.search.debouncer.is_pending()))
                .entry("cached", ron_string(&self.search.cache.len())),
            DebugSection::new("Pages")
                .entry("pages", ron_string(&self.paginator.pages().len()))
                .entry("items", ron_string(&self.paginator.item_count()))
                .entry("total", ron_string(&self.paginator.total()))
                .entry("next_page", ron_string(&self.paginator.next_page()))
                .entry("has_more", ron_string(&self.paginator.has_next_page()))
                .entry("fetching", ron_string(&self.paginator.is_fetching())),
            DebugSection::new("Favorites")
                .entry("names", ron_string(&self.favorites.names()))
                .entry("resolved", ron_string(&self.favorite_items.data().map(|items| items.len())))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
