use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::state::Item;

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
pub const PLACEHOLDER_SPRITE: &str = "https://via.placeholder.com/96?text=No+Image";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of `GET /pokemon?limit=..&offset=..`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceList {
    #[serde(default)]
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    types: Vec<PokemonTypeSlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: TypeName,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeName {
    name: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("response parse error: {0}")]
    Parse(String),
}

/// Read side of the remote Pokemon catalog.
#[async_trait]
pub trait PokemonProvider: Send + Sync {
    /// `GET /pokemon/{name_or_id}`. Any non-success status is `NotFound`.
    async fn pokemon(&self, name_or_id: &str) -> Result<Item, ApiError>;

    /// `GET {url}` for a `results[].url` taken from a listing.
    async fn pokemon_at(&self, url: &str) -> Result<Item, ApiError>;

    /// `GET /pokemon?limit={limit}`.
    async fn catalog(&self, limit: usize) -> Result<ResourceList, ApiError>;

    /// `GET /pokemon?limit={limit}&offset={offset}`.
    async fn page(&self, limit: usize, offset: usize) -> Result<ResourceList, ApiError>;
}

pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_pokemon(&self, url: &str) -> Result<Item, ApiError> {
        tracing::debug!(%url, "fetching pokemon");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ApiError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(ApiError::NotFound(url.to_string()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Request(err.to_string()))?;
        parse_pokemon(&bytes)
    }

    async fn fetch_list(&self, url: &str) -> Result<ResourceList, ApiError> {
        tracing::debug!(%url, "fetching listing");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ApiError::Request(err.to_string()))?
            .error_for_status()
            .map_err(|err| ApiError::Request(err.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Request(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Parse(err.to_string()))
    }
}

impl Default for PokeApiClient {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

#[async_trait]
impl PokemonProvider for PokeApiClient {
    async fn pokemon(&self, name_or_id: &str) -> Result<Item, ApiError> {
        let url = format!("{}/pokemon/{name_or_id}", self.base_url);
        self.fetch_pokemon(&url).await
    }

    async fn pokemon_at(&self, url: &str) -> Result<Item, ApiError> {
        self.fetch_pokemon(url).await
    }

    async fn catalog(&self, limit: usize) -> Result<ResourceList, ApiError> {
        let url = format!("{}/pokemon?limit={limit}", self.base_url);
        self.fetch_list(&url).await
    }

    async fn page(&self, limit: usize, offset: usize) -> Result<ResourceList, ApiError> {
        let url = format!("{}/pokemon?limit={limit}&offset={offset}", self.base_url);
        self.fetch_list(&url).await
    }
}

pub fn parse_pokemon(bytes: &[u8]) -> Result<Item, ApiError> {
    let response: PokemonResponse =
        serde_json::from_slice(bytes).map_err(|err| ApiError::Parse(err.to_string()))?;
    Ok(project(response))
}

fn project(response: PokemonResponse) -> Item {
    let sprite = pointer_string(&response.sprites, "/other/official-artwork/front_default")
        .or_else(|| pointer_string(&response.sprites, "/front_default"))
        .unwrap_or_else(|| PLACEHOLDER_SPRITE.to_string());
    Item {
        id: response.id,
        name: response.name,
        sprite,
        weight: response.weight,
        height: response.height,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
