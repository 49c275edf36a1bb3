//! Async bodies for effects. Each resolves to the action that reports it.

use std::sync::Arc;

use crate::action::Action;
use crate::api::PokemonProvider;
use crate::batch::resolve_favorites;
use crate::paginator::{fetch_page, PageRequest};
use crate::query::{with_retry, RETRY_COUNT};
use crate::search::{resolve_search, SEARCH_LIMIT};

pub async fn search(provider: Arc<dyn PokemonProvider>, query: String) -> Action {
    let result = with_retry(RETRY_COUNT, || {
        let provider = provider.clone();
        let query = query.clone();
        async move { resolve_search(provider, &query, SEARCH_LIMIT).await }
    })
    .await;
    match result {
        Ok(items) => Action::SearchDidLoad { query, items },
        Err(error) => Action::SearchDidError {
            query,
            error: error.to_string(),
        },
    }
}

pub async fn load_page(provider: Arc<dyn PokemonProvider>, page: u32, limit: usize) -> Action {
    let request = PageRequest { page, limit };
    let result = with_retry(RETRY_COUNT, || fetch_page(provider.clone(), request)).await;
    match result {
        Ok(data) => Action::PageDidLoad { page, data },
        Err(error) => Action::PageDidError {
            page,
            error: error.to_string(),
        },
    }
}

pub async fn load_favorites(provider: Arc<dyn PokemonProvider>, names: Vec<String>) -> Action {
    let items = resolve_favorites(provider, &names).await;
    Action::FavoritesDidLoad { names, items }
}
