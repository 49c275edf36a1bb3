//! Persisted, ordered set of favorite Pokemon names.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Storage key; also the file name used by [`JsonFileStorage`].
pub const FAVORITES_KEY: &str = "pokemon-favorite-ids";

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("favorites io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("favorites file corrupted: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable home for the favorites list.
pub trait FavoritesStorage: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<Vec<String>, StorageError>;
    fn save(&self, names: &[String]) -> Result<(), StorageError>;
}

/// A JSON array of names in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, names: &[String]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(names)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    names: Mutex<Vec<String>>,
}

impl MemoryStorage {
    pub fn with_names(names: Vec<String>) -> Self {
        Self {
            names: Mutex::new(names),
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        match self.names.lock() {
            Ok(names) => names.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl FavoritesStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, names: &[String]) -> Result<(), StorageError> {
        let mut guard = match self.names.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = names.to_vec();
        Ok(())
    }
}

pub fn default_path() -> PathBuf {
    let base = dirs_next::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("pokedex").join(format!("{FAVORITES_KEY}.json"))
}

/// Outcome of a mutating call. A failed save never undoes the in-memory change.
#[derive(Debug)]
pub struct Mutation {
    pub changed: bool,
    pub warning: Option<StorageError>,
}

impl Mutation {
    fn unchanged() -> Self {
        Self {
            changed: false,
            warning: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Favorites {
    names: Vec<String>,
    #[serde(skip, default = "memory_storage")]
    storage: Arc<dyn FavoritesStorage>,
}

fn memory_storage() -> Arc<dyn FavoritesStorage> {
    Arc::new(MemoryStorage::default())
}

impl fmt::Debug for Favorites {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Favorites")
            .field("names", &self.names)
            .finish()
    }
}

impl Default for Favorites {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            storage: memory_storage(),
        }
    }
}

impl Favorites {
    /// Reads the persisted list. Unreadable storage starts empty.
    pub fn load(storage: Arc<dyn FavoritesStorage>) -> Self {
        let stored = match storage.load() {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(error = %err, "could not load favorites, starting empty");
                Vec::new()
            }
        };
        let mut names: Vec<String> = Vec::with_capacity(stored.len());
        for name in stored {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self { names, storage }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|fav| fav == name)
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn add(&mut self, name: &str) -> Mutation {
        if self.contains(name) {
            return Mutation::unchanged();
        }
        self.names.push(name.to_string());
        self.persist()
    }

    pub fn remove(&mut self, name: &str) -> Mutation {
        let Some(pos) = self.names.iter().position(|fav| fav == name) else {
            return Mutation::unchanged();
        };
        self.names.remove(pos);
        self.persist()
    }

    pub fn toggle(&mut self, name: &str) -> Mutation {
        if self.contains(name) {
            self.remove(name)
        } else {
            self.add(name)
        }
    }

    pub fn clear(&mut self) -> Mutation {
        if self.names.is_empty() {
            return Mutation::unchanged();
        }
        self.names.clear();
        self.persist()
    }

    fn persist(&self) -> Mutation {
        let warning = match self.storage.save(&self.names) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(error = %err, count = self.names.len(), "favorites not persisted");
                Some(err)
            }
        };
        Mutation {
            changed: true,
            warning,
        }
    }
}
