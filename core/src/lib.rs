pub mod db;
pub mod error;
pub mod models;
pub mod quantity;
pub mod reconcile;
pub mod service;
pub mod store;

pub use error::IngredientError;
pub use reconcile::{Collection, Reconciliation, reconcile};
