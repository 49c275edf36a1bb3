//! Decides what the list shows from the current state snapshot.

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::favorites::Favorites;
use crate::paginator::Paginator;
use crate::state::{Item, Tab};

/// Which source currently owns the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewSource {
    Search,
    Favorites,
    Listing,
}

impl ViewSource {
    pub fn select(tab: Tab, has_searched: bool) -> Self {
        match (has_searched, tab) {
            (true, _) => ViewSource::Search,
            (false, Tab::Favorites) => ViewSource::Favorites,
            (false, Tab::All) => ViewSource::Listing,
        }
    }
}

pub struct ViewInputs<'a> {
    pub tab: Tab,
    pub committed_query: &'a str,
    pub search: &'a DataResource<Vec<Item>>,
    pub paginator: &'a Paginator,
    pub favorites: &'a Favorites,
    pub favorite_items: &'a DataResource<Vec<Item>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub source: ViewSource,
    pub has_searched: bool,
    pub displayed_items: Vec<Item>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub show_no_results: bool,
    /// A page beyond the first is loading in the background.
    pub is_fetching_next: bool,
}

pub fn reconcile(inputs: ViewInputs<'_>) -> ViewModel {
    let has_searched = !inputs.committed_query.is_empty();
    let source = ViewSource::select(inputs.tab, has_searched);

    let (displayed_items, is_loading, error, show_no_results) = match source {
        ViewSource::Search => {
            let mut items = inputs.search.data().cloned().unwrap_or_default();
            if inputs.tab == Tab::Favorites {
                items.retain(|item| inputs.favorites.contains(&item.name));
            }
            let loading = inputs.search.is_loading();
            let no_results = settled(inputs.search) && items.is_empty();
            (items, loading, error_of(inputs.search), no_results)
        }
        ViewSource::Favorites => {
            let items = inputs.favorite_items.data().cloned().unwrap_or_default();
            (
                items,
                inputs.favorite_items.is_loading(),
                error_of(inputs.favorite_items),
                inputs.favorites.is_empty(),
            )
        }
        ViewSource::Listing => {
            let items = inputs.paginator.items();
            let no_results = inputs.paginator.has_settled() && items.is_empty();
            (
                items,
                inputs.paginator.is_initial_loading(),
                inputs.paginator.error().map(str::to_string),
                no_results,
            )
        }
    };

    ViewModel {
        source,
        has_searched,
        displayed_items,
        is_loading,
        error,
        show_no_results,
        is_fetching_next: source == ViewSource::Listing && inputs.paginator.is_fetching_next(),
    }
}

fn settled<T>(resource: &DataResource<T>) -> bool {
    resource.is_loaded() || resource.is_failed()
}

fn error_of<T>(resource: &DataResource<T>) -> Option<String> {
    resource.error().map(|err| err.to_string())
}
