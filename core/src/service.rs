use std::path::Path;

use anyhow::{Context, Result};

use crate::db::Database;
use crate::error::IngredientError;
use crate::models::{ImportSummary, IngredientFilter, IngredientRecord, NewIngredient};
use crate::reconcile::{Collection, Reconciliation};
use crate::store::{KeyValueStore, MemoryStore, STORAGE_KEY, load_collection, save_collection};

/// Owns the ingredient list and the store it is persisted to.
///
/// Every successful mutation is written back before returning, so the store
/// always reflects the last completed operation.
pub struct LarderService<S: KeyValueStore = Database> {
    store: S,
    collection: Collection,
}

impl LarderService<Database> {
    pub fn open(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Self::with_store(db)
    }
}

impl LarderService<MemoryStore> {
    pub fn new_in_memory() -> Result<Self> {
        Self::with_store(MemoryStore::new())
    }
}

impl<S: KeyValueStore> LarderService<S> {
    pub fn with_store(store: S) -> Result<Self> {
        let collection = load_collection(&store)?;
        Ok(Self { store, collection })
    }

    #[must_use]
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save `next` and make it the current list. On a failed save the
    /// current list is left as it was.
    fn commit(&mut self, next: Collection) -> Result<()> {
        if next.is_empty() {
            self.store
                .remove(STORAGE_KEY)
                .context("Failed to save ingredients")?;
        } else {
            save_collection(&mut self.store, &next).context("Failed to save ingredients")?;
        }
        self.collection = next;
        Ok(())
    }

    // --- Mutations ---

    /// Add a candidate, merging it into an existing record with the same
    /// name and category.
    pub fn add(&mut self, candidate: NewIngredient) -> Result<Reconciliation> {
        let mut next = self.collection.clone();
        let outcome = next.reconcile(candidate)?;
        self.commit(next)?;
        Ok(outcome)
    }

    pub fn set_bought(&mut self, position: usize, bought: bool) -> Result<IngredientRecord> {
        let mut next = self.collection.clone();
        let record = next.set_bought(position, bought)?.clone();
        self.commit(next)?;
        Ok(record)
    }

    pub fn toggle_bought(&mut self, position: usize) -> Result<IngredientRecord> {
        let current = self
            .collection
            .get(position)
            .ok_or(IngredientError::NotFound(position))?
            .bought;
        self.set_bought(position, !current)
    }

    pub fn delete(&mut self, position: usize) -> Result<IngredientRecord> {
        let mut next = self.collection.clone();
        let removed = next.remove(position)?;
        self.commit(next)?;
        tracing::debug!(name = %removed.name, category = %removed.category, "deleted ingredient");
        Ok(removed)
    }

    pub fn clear_all(&mut self) -> Result<usize> {
        let count = self.collection.len();
        self.commit(Collection::new())?;
        tracing::info!(count, "cleared all ingredients");
        Ok(count)
    }

    // --- Queries ---

    /// Records matching `filter`, paired with their position in the collection.
    #[must_use]
    pub fn list(&self, filter: &IngredientFilter) -> Vec<(usize, &IngredientRecord)> {
        self.collection
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .collect()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in self.collection.records() {
            if !seen.contains(&record.category.as_str()) {
                seen.push(&record.category);
            }
        }
        seen
    }

    // --- Export / Import ---

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.collection)?)
    }

    /// Reconcile every record of a JSON export into the current list.
    ///
    /// The import is all-or-nothing: an invalid record aborts it before
    /// anything is saved.
    pub fn import_json(&mut self, text: &str) -> Result<ImportSummary> {
        let records: Vec<IngredientRecord> =
            serde_json::from_str(text).context("Import file is not a valid ingredient list")?;

        let mut next = self.collection.clone();
        let mut summary = ImportSummary::default();
        for (i, record) in records.into_iter().enumerate() {
            let outcome = next
                .reconcile_record(record)
                .with_context(|| format!("Record {} in import", i + 1))?;
            match outcome {
                Reconciliation::Inserted { .. } => summary.inserted += 1,
                Reconciliation::Merged { .. } => summary.merged += 1,
            }
        }

        self.commit(next)?;
        tracing::info!(
            inserted = summary.inserted,
            merged = summary.merged,
            "imported ingredients"
        );
        Ok(summary)
    }
}
