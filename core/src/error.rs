use thiserror::Error;

/// Domain failures surfaced to the caller. Storage and serialization
/// problems travel as `anyhow::Error` instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngredientError {
    /// A required field (name, category, quantity) was blank.
    #[error("invalid ingredient: {field} must not be empty")]
    InvalidRecord { field: &'static str },

    #[error("no ingredient at position {0}")]
    NotFound(usize),
}
