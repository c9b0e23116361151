use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::models::IngredientRecord;
use crate::reconcile::Collection;

/// Key under which the ingredient list is stored.
pub const STORAGE_KEY: &str = "ingredientsDataV1";

/// Minimal key-value persistence used for the ingredient list.
///
/// The desktop CLI backs this with SQLite; tests and embedders can use
/// [`MemoryStore`].
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<bool>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}

/// Load the collection. A missing or blank value is an empty collection.
/// Duplicates in the stored data are merged on the way in.
pub fn load_collection<S: KeyValueStore + ?Sized>(store: &S) -> Result<Collection> {
    let Some(text) = store.load(STORAGE_KEY)? else {
        return Ok(Collection::new());
    };
    if text.trim().is_empty() {
        return Ok(Collection::new());
    }
    let records: Vec<IngredientRecord> =
        serde_json::from_str(&text).context("Stored ingredient list is not valid JSON")?;
    let stored = records.len();
    let collection = Collection::from_records(records);
    if collection.len() != stored {
        tracing::info!(
            stored,
            kept = collection.len(),
            "merged duplicate ingredients found in storage"
        );
    }
    Ok(collection)
}

pub fn save_collection<S: KeyValueStore + ?Sized>(
    store: &mut S,
    collection: &Collection,
) -> Result<()> {
    let text = serde_json::to_string(collection)?;
    store.save(STORAGE_KEY, &text)
}
