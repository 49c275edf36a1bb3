//! Exact-then-partial name search.

use std::sync::Arc;

use crate::api::{ApiError, PokemonProvider};
use crate::batch::{resolve_all, Lookup};
use crate::state::Item;

pub const SEARCH_LIMIT: usize = 10;
/// Partial matches only see this many catalog entries.
pub const CATALOG_LIMIT: usize = 1000;

/// Looks `query` up as an exact name or id first; when that fails, filters the
/// catalog by substring and resolves up to `limit` candidates.
///
/// `Err` means the catalog itself could not be fetched. A query with no
/// matches is `Ok(vec![])`.
pub async fn resolve_search(
    provider: Arc<dyn PokemonProvider>,
    query: &str,
    limit: usize,
) -> Result<Vec<Item>, ApiError> {
    match provider.pokemon(&query.to_lowercase()).await {
        Ok(item) => return Ok(vec![item]),
        Err(err) => {
            tracing::debug!(%query, error = %err, "no exact match, trying partial search");
        }
    }

    let catalog = provider.catalog(CATALOG_LIMIT).await?;
    let lookups: Vec<Lookup> = catalog
        .results
        .into_iter()
        .filter(|entry| entry.name.contains(query))
        .take(limit)
        .map(|entry| Lookup::Url(entry.url))
        .collect();

    if lookups.is_empty() {
        return Ok(Vec::new());
    }
    Ok(resolve_all(provider, lookups).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::FakeProvider;

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(|item| item.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_exact_match_skips_partial_search() {
        let provider = Arc::new(FakeProvider::new(&["pikachu", "raichu"]));

        let items = resolve_search(provider.clone(), "pikachu", SEARCH_LIMIT)
            .await
            .unwrap();

        assert_eq!(names(&items), vec!["pikachu"]);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_exact_match_by_id() {
        let provider = Arc::new(FakeProvider::new(&["bulbasaur", "ivysaur"]));

        let items = resolve_search(provider, "2", SEARCH_LIMIT).await.unwrap();

        assert_eq!(names(&items), vec!["ivysaur"]);
        assert_eq!(items[0].id, 2);
    }

    #[tokio::test]
    async fn test_partial_fallback_finds_substring() {
        let provider = Arc::new(FakeProvider::new(&["bulbasaur", "pikachu", "charizard"]));

        let items = resolve_search(provider, "pika", SEARCH_LIMIT).await.unwrap();

        assert_eq!(names(&items), vec!["pikachu"]);
    }

    #[tokio::test]
    async fn test_partial_results_keep_catalog_order_and_limit() {
        let provider = Arc::new(
            FakeProvider::new(&["pikachu", "pikablu", "charizard", "pikapika"])
                .with_delay("pikachu", 25),
        );

        let items = resolve_search(provider, "pika", 2).await.unwrap();

        assert_eq!(names(&items), vec!["pikachu", "pikablu"]);
    }

    #[tokio::test]
    async fn test_partial_match_is_case_sensitive() {
        let provider = Arc::new(FakeProvider::new(&["pikachu"]));

        let items = resolve_search(provider, "PIKA", SEARCH_LIMIT).await.unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_failed_details_are_dropped() {
        let provider = Arc::new(
            FakeProvider::new(&["pikachu", "pikablu"]).with_broken("pikablu"),
        );

        let items = resolve_search(provider, "pika", SEARCH_LIMIT).await.unwrap();

        assert_eq!(names(&items), vec!["pikachu"]);
    }

    #[tokio::test]
    async fn test_no_matches_is_not_an_error() {
        let provider = Arc::new(FakeProvider::new(&["bulbasaur", "charizard"]));

        let items = resolve_search(provider, "nonexistent", SEARCH_LIMIT)
            .await
            .unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_failure_is_an_error() {
        let provider = Arc::new(FakeProvider::new(&["pikachu"]).with_catalog_down());

        let result = resolve_search(provider, "pika", SEARCH_LIMIT).await;

        assert!(matches!(result, Err(ApiError::Request(_))));
    }
}
