use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::IngredientError;
use crate::models::{IdentityKey, IngredientRecord, NewIngredient, validate_required};
use crate::quantity::{format_quantity, parse_quantity};

/// Separator placed between notes when two records merge.
pub const NOTES_SEPARATOR: &str = " ∘ ";

/// Separator used when quantities cannot both be read as numbers.
pub const QUANTITY_FALLBACK_SEPARATOR: &str = " + ";

/// Ordered list of ingredients with unique identity keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    records: Vec<IngredientRecord>,
}

/// What `reconcile` did with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Inserted { position: usize },
    Merged { position: usize, quantity: QuantityMerge },
}

impl Reconciliation {
    #[must_use]
    pub fn position(self) -> usize {
        match self {
            Self::Inserted { position } | Self::Merged { position, .. } => position,
        }
    }
}

/// How the quantities of a merge were combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityMerge {
    Summed,
    /// At least one side was not numeric; the texts were joined instead.
    Concatenated,
}

impl Collection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[IngredientRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&IngredientRecord> {
        self.records.get(position)
    }

    #[must_use]
    pub fn position_of(&self, key: &IdentityKey) -> Option<usize> {
        self.records.iter().position(|r| r.identity_key() == *key)
    }

    /// Insert the candidate, or merge it into the record with the same identity key.
    ///
    /// On error the collection is left untouched.
    pub fn reconcile(
        &mut self,
        candidate: NewIngredient,
    ) -> Result<Reconciliation, IngredientError> {
        candidate.validate()?;
        self.reconcile_record(candidate.into_record())
    }

    /// Like [`Collection::reconcile`] but for a full record, so a `bought`
    /// flag coming from an import is carried through the merge.
    pub fn reconcile_record(
        &mut self,
        candidate: IngredientRecord,
    ) -> Result<Reconciliation, IngredientError> {
        validate_required(&candidate.name, &candidate.category, &candidate.quantity)?;

        let key = candidate.identity_key();
        let Some(position) = self.position_of(&key) else {
            self.records.push(candidate);
            return Ok(Reconciliation::Inserted {
                position: self.records.len() - 1,
            });
        };

        let existing = &mut self.records[position];
        let quantity = merge_into(existing, candidate);
        tracing::debug!(
            name = %existing.name,
            category = %existing.category,
            merged_quantity = %existing.quantity,
            how = ?quantity,
            "merged duplicate ingredient"
        );
        Ok(Reconciliation::Merged { position, quantity })
    }

    pub fn set_bought(
        &mut self,
        position: usize,
        bought: bool,
    ) -> Result<&IngredientRecord, IngredientError> {
        let record = self
            .records
            .get_mut(position)
            .ok_or(IngredientError::NotFound(position))?;
        record.bought = bought;
        Ok(record)
    }

    pub fn remove(&mut self, position: usize) -> Result<IngredientRecord, IngredientError> {
        if position >= self.records.len() {
            return Err(IngredientError::NotFound(position));
        }
        Ok(self.records.remove(position))
    }

    /// Rebuild a collection from stored records, merging any duplicates in
    /// order. Records are kept as written, even ones with blank fields, so a
    /// later save never drops data.
    #[must_use]
    pub fn from_records(records: Vec<IngredientRecord>) -> Self {
        let mut collection = Self::new();
        for record in records {
            match collection.position_of(&record.identity_key()) {
                Some(position) => {
                    merge_into(&mut collection.records[position], record);
                }
                None => collection.records.push(record),
            }
        }
        collection
    }
}

/// Functional form: consume a collection and return the reconciled one.
pub fn reconcile(
    mut collection: Collection,
    candidate: NewIngredient,
) -> Result<Collection, IngredientError> {
    collection.reconcile(candidate)?;
    Ok(collection)
}

/// Merge `candidate` into `existing` in place. Name and category keep the
/// existing text.
fn merge_into(existing: &mut IngredientRecord, candidate: IngredientRecord) -> QuantityMerge {
    let (quantity, how) = merge_quantity(&existing.quantity, &candidate.quantity);
    existing.quantity = quantity;
    existing.expiration = earliest_expiration(&existing.expiration, &candidate.expiration);
    existing.notes = join_notes(&existing.notes, &candidate.notes);
    if existing.image.is_empty() {
        existing.image = candidate.image;
    }
    existing.bought |= candidate.bought;
    how
}

#[must_use]
pub fn merge_quantity(existing: &str, candidate: &str) -> (String, QuantityMerge) {
    let a = parse_quantity(existing);
    let b = parse_quantity(candidate);
    match (a.num, b.num) {
        (Some(x), Some(y)) => {
            let unit = if a.unit.is_empty() { &b.unit } else { &a.unit };
            (format_quantity(Some(x + y), unit), QuantityMerge::Summed)
        }
        _ => {
            tracing::debug!(existing, candidate, "non-numeric quantity, concatenating");
            (
                format!("{existing}{QUANTITY_FALLBACK_SEPARATOR}{candidate}"),
                QuantityMerge::Concatenated,
            )
        }
    }
}

/// Pick the earlier of two expirations. Empty loses to non-empty and ties
/// keep `existing`. When either side is not a readable date the candidate
/// is taken.
#[must_use]
pub fn earliest_expiration(existing: &str, candidate: &str) -> String {
    if existing.is_empty() {
        return candidate.to_string();
    }
    if candidate.is_empty() {
        return existing.to_string();
    }
    match (parse_expiration(existing), parse_expiration(candidate)) {
        (Some(a), Some(b)) if a <= b => existing.to_string(),
        _ => candidate.to_string(),
    }
}

fn parse_expiration(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").ok()
}

#[must_use]
pub fn join_notes(existing: &str, candidate: &str) -> String {
    [existing, candidate]
        .into_iter()
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(NOTES_SEPARATOR)
}
