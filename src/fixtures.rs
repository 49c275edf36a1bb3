use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, NamedResource, PokemonProvider, ResourceList};
use crate::state::Item;

pub fn item(id: u32, name: &str) -> Item {
    Item {
        id,
        name: name.to_string(),
        sprite: format!("https://img.test/{name}.png"),
        weight: 10 * id,
        height: id,
        types: vec!["normal".to_string()],
    }
}

/// In-memory catalog; ids follow catalog order starting at 1.
pub struct FakeProvider {
    catalog: Vec<String>,
    broken: HashSet<String>,
    delays: HashMap<String, u64>,
    catalog_down: bool,
    calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(names: &[&str]) -> Self {
        Self {
            catalog: names.iter().map(|name| name.to_string()).collect(),
            broken: HashSet::new(),
            delays: HashMap::new(),
            catalog_down: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn url_for(name: &str) -> String {
        format!("fake://pokemon/{name}/")
    }

    pub fn with_broken(mut self, name: &str) -> Self {
        self.broken.insert(name.to_string());
        self
    }

    pub fn with_delay(mut self, name: &str, millis: u64) -> Self {
        self.delays.insert(name.to_string(), millis);
        self
    }

    pub fn with_catalog_down(mut self) -> Self {
        self.catalog_down = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn resolve(&self, key: &str) -> Result<Item, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let position = self.catalog.iter().position(|name| name == key).or_else(|| {
            key.parse::<usize>()
                .ok()
                .filter(|id| (1..=self.catalog.len()).contains(id))
                .map(|id| id - 1)
        });
        let Some(position) = position else {
            return Err(ApiError::NotFound(key.to_string()));
        };
        let name = &self.catalog[position];
        if let Some(millis) = self.delays.get(name) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        if self.broken.contains(name) {
            return Err(ApiError::Request(format!("{name} unavailable")));
        }
        Ok(item(position as u32 + 1, name))
    }

    fn listing(&self, limit: usize, offset: usize) -> Result<ResourceList, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.catalog_down {
            return Err(ApiError::Request("connection refused".to_string()));
        }
        let results: Vec<NamedResource> = self
            .catalog
            .iter()
            .skip(offset)
            .take(limit)
            .map(|name| NamedResource {
                name: name.clone(),
                url: Self::url_for(name),
            })
            .collect();
        let end = offset + results.len();
        Ok(ResourceList {
            count: self.catalog.len() as u32,
            next: (end < self.catalog.len()).then(|| format!("fake://pokemon?offset={end}")),
            previous: None,
            results,
        })
    }
}

#[async_trait]
impl PokemonProvider for FakeProvider {
    async fn pokemon(&self, name_or_id: &str) -> Result<Item, ApiError> {
        self.resolve(name_or_id).await
    }

    async fn pokemon_at(&self, url: &str) -> Result<Item, ApiError> {
        let name = url
            .trim_start_matches("fake://pokemon/")
            .trim_end_matches('/')
            .to_string();
        self.resolve(&name).await
    }

    async fn catalog(&self, limit: usize) -> Result<ResourceList, ApiError> {
        self.listing(limit, 0)
    }

    async fn page(&self, limit: usize, offset: usize) -> Result<ResourceList, ApiError> {
        self.listing(limit, offset)
    }
}
