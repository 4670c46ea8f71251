/// Operation for updating existing recurring items
///
/// An updated item is a new version: the old reminder is cancelled before
/// the changes are applied, and a fresh one is scheduled afterwards.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::domain::RecurrenceRule;
use crate::reminder::{AlarmBackend, ReminderCoordinator};
use crate::service::parse_item_id;
use crate::storage::RecordStore;
use crate::EngineError;

/// Parameters for updating an existing item
#[derive(Debug, Deserialize)]
pub struct UpdateItemParams {
    pub item_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub recurrence: Option<RecurrenceRule>,
    pub notification_offset_ms: Option<i64>,
    pub is_active: Option<bool>,
}

/// Response from updating an item
#[derive(Debug, Serialize)]
pub struct UpdateItemResponse {
    pub success: bool,
    pub next_occurrence: Option<DateTime<Utc>>,
    pub message: String,
}

/// Update an item, replacing its pending reminder
pub fn update_item<S: RecordStore, B: AlarmBackend>(
    store: &S,
    coordinator: &ReminderCoordinator<B>,
    clock: &dyn Clock,
    params: UpdateItemParams,
) -> Result<UpdateItemResponse, EngineError> {
    let item_id = parse_item_id(&params.item_id)?;
    let mut item = store.get_item(&item_id)?;

    item.update(
        params.title,
        params.description.map(Some), // Wrap in Option for the method signature
        params.start_at,
        params.recurrence,
        params.notification_offset_ms,
        params.is_active,
    )?;

    // The old registration may point at an occurrence the new rule no
    // longer produces; drop it before persisting the new version.
    coordinator.cancel(&item);

    store.update_item(&item)?;

    let next_occurrence = if item.is_active {
        coordinator.schedule_next(&item, clock.now())?
    } else {
        None
    };

    let message = if let Some(false) = params.is_active {
        format!("Paused '{}'", item.title)
    } else if let Some(true) = params.is_active {
        format!("Reactivated '{}'", item.title)
    } else {
        format!("Updated '{}'", item.title)
    };

    Ok(UpdateItemResponse {
        success: true,
        next_occurrence,
        message,
    })
}
