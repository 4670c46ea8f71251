/// Record store for recurring items and their completions
///
/// This module handles all database operations using SQLite. The core
/// components never touch it directly; the service layer loads items and
/// completions here and hands them to the pure calculators.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;
use crate::domain::{CompletionInstance, ItemId, ItemKind, RecurringItem};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the record-store interface
///
/// The core consumes this at its interface boundary only; swapping SQLite
/// for another backend is a matter of implementing this trait.
pub trait RecordStore {
    /// Persist a new recurring item
    fn create_item(&self, item: &RecurringItem) -> Result<(), StorageError>;

    /// Get an item by ID
    fn get_item(&self, item_id: &ItemId) -> Result<RecurringItem, StorageError>;

    /// Update an existing item
    fn update_item(&self, item: &RecurringItem) -> Result<(), StorageError>;

    /// Delete an item (soft delete - mark as inactive)
    fn delete_item(&self, item_id: &ItemId) -> Result<(), StorageError>;

    /// List items with optional kind filtering
    fn list_items(
        &self,
        kind: Option<ItemKind>,
        active_only: bool,
    ) -> Result<Vec<RecurringItem>, StorageError>;

    /// Load all completions for one item, oldest day first
    fn load_completions(&self, owner_id: &ItemId) -> Result<Vec<CompletionInstance>, StorageError>;

    /// Insert or refresh a completion
    ///
    /// At most one completion exists per (owner, epoch day); re-marking an
    /// already-completed day updates its logged-at timestamp.
    fn upsert_completion(&self, completion: &CompletionInstance) -> Result<(), StorageError>;

    /// Remove a completion (user undo)
    fn delete_completion(&self, completion: &CompletionInstance) -> Result<(), StorageError>;
}
