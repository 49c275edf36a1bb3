use std::sync::Arc;

use tokio::task::JoinSet;

use crate::api::PokemonProvider;
use crate::state::Item;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Name(String),
    Url(String),
}

/// Resolves every lookup concurrently. Failed lookups are dropped; survivors
/// keep the order of `lookups` regardless of completion order.
pub async fn resolve_all(provider: Arc<dyn PokemonProvider>, lookups: Vec<Lookup>) -> Vec<Item> {
    if lookups.is_empty() {
        return Vec::new();
    }

    let mut join_set = JoinSet::new();
    for (index, lookup) in lookups.into_iter().enumerate() {
        let provider = provider.clone();
        join_set.spawn(async move {
            let result = match &lookup {
                Lookup::Name(name) => provider.pokemon(name).await,
                Lookup::Url(url) => provider.pokemon_at(url).await,
            };
            (index, lookup, result)
        });
    }

    let mut resolved: Vec<(usize, Item)> = Vec::with_capacity(join_set.len());
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, _, Ok(item))) => resolved.push((index, item)),
            Ok((_, lookup, Err(err))) => {
                tracing::debug!(?lookup, error = %err, "dropping unresolved entry");
            }
            Err(err) => {
                tracing::debug!(error = %err, "lookup task failed");
            }
        }
    }
    resolved.sort_by_key(|(index, _)| *index);
    resolved.into_iter().map(|(_, item)| item).collect()
}

/// Full records for the favorites list, in favorites order.
pub async fn resolve_favorites(provider: Arc<dyn PokemonProvider>, names: &[String]) -> Vec<Item> {
    let lookups = names.iter().cloned().map(Lookup::Name).collect();
    resolve_all(provider, lookups).await
}
