/// Operation for creating new recurring items
///
/// Persists a validated item and schedules its first reminder.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::domain::{ItemKind, RecurrenceRule, RecurringItem};
use crate::reminder::{AlarmBackend, ReminderCoordinator};
use crate::storage::RecordStore;
use crate::EngineError;

/// Parameters for creating a new recurring item
#[derive(Debug, Deserialize)]
pub struct CreateItemParams {
    pub kind: ItemKind,
    pub title: String,
    pub description: Option<String>,
    pub start_at: DateTime<Utc>,
    pub recurrence: RecurrenceRule,
    pub notification_offset_ms: Option<i64>, // Optional lead time, defaults to none
}

/// Response from creating an item
#[derive(Debug, Serialize)]
pub struct CreateItemResponse {
    pub success: bool,
    pub item_id: String,
    pub next_occurrence: Option<DateTime<Utc>>,
    pub message: String,
}

/// Create a new recurring item and schedule its first reminder
pub fn create_item<S: RecordStore, B: AlarmBackend>(
    store: &S,
    coordinator: &ReminderCoordinator<B>,
    clock: &dyn Clock,
    params: CreateItemParams,
) -> Result<CreateItemResponse, EngineError> {
    let item = RecurringItem::new(
        params.kind,
        params.title,
        params.description,
        params.start_at,
        params.recurrence,
        params.notification_offset_ms.unwrap_or(0),
    )?;

    store.create_item(&item)?;

    let next_occurrence = coordinator.schedule_next(&item, clock.now())?;

    let message = match next_occurrence {
        Some(at) => format!("Created {} '{}', next due {}", item.kind.display_name().to_lowercase(), item.title, at),
        None => format!("Created {} '{}' with no upcoming occurrence", item.kind.display_name().to_lowercase(), item.title),
    };

    Ok(CreateItemResponse {
        success: true,
        item_id: item.id.to_string(),
        next_occurrence,
        message,
    })
}
