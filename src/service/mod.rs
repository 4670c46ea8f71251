/// Caller-side operations composing the core components
///
/// The recurrence engine, streak calculator, and reminder coordinator never
/// call each other; the functions in this module are the caller that holds
/// an item, asks the engine for the next occurrence, drives the coordinator,
/// and derives streaks for display.

pub mod create;
pub mod update;
pub mod complete;
pub mod status;
pub mod recover;

// Re-export operation functions for easy access
pub use create::*;
pub use update::*;
pub use complete::*;
pub use status::*;
pub use recover::*;

use crate::domain::ItemId;
use crate::storage::StorageError;

/// Parse a raw item ID, mapping malformed input to not-found
pub(crate) fn parse_item_id(raw: &str) -> Result<ItemId, StorageError> {
    ItemId::from_string(raw).map_err(|_| StorageError::ItemNotFound {
        item_id: raw.to_string(),
    })
}
