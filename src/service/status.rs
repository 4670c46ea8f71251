/// Operation for inspecting item status and streaks
///
/// Combines the next occurrence with streak statistics for display.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::domain::{calculate_streaks, next_occurrence, ItemKind, RecurringItem};
use crate::service::parse_item_id;
use crate::storage::RecordStore;
use crate::EngineError;

/// Parameters for checking item status
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub item_id: Option<String>, // If omitted, returns all active items
}

/// Status of a single item
#[derive(Debug, Serialize)]
pub struct ItemStatus {
    pub item_id: String,
    pub title: String,
    pub kind: ItemKind,
    pub next_occurrence: Option<DateTime<Utc>>,
    /// Present for habits only
    pub current_streak: Option<u32>,
    /// Present for habits only
    pub best_streak: Option<u32>,
}

/// Response from a status check
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub items: Vec<ItemStatus>,
    pub summary: String,
}

/// Get status for one item or all active items
pub fn get_status<S: RecordStore>(
    store: &S,
    clock: &dyn Clock,
    params: StatusParams,
) -> Result<StatusResponse, EngineError> {
    let items = if let Some(raw_id) = params.item_id {
        let item_id = parse_item_id(&raw_id)?;
        vec![store.get_item(&item_id)?]
    } else {
        store.list_items(None, true)?
    };

    let mut statuses = Vec::new();
    for item in items {
        statuses.push(status_for(store, clock, &item)?);
    }

    let upcoming = statuses.iter().filter(|s| s.next_occurrence.is_some()).count();
    let summary = if statuses.is_empty() {
        "No items found. Create your first habit or event to get started.".to_string()
    } else {
        format!("{} of {} items have an upcoming occurrence", upcoming, statuses.len())
    };

    Ok(StatusResponse {
        items: statuses,
        summary,
    })
}

/// Build the status row for one item
fn status_for<S: RecordStore>(
    store: &S,
    clock: &dyn Clock,
    item: &RecurringItem,
) -> Result<ItemStatus, EngineError> {
    let next = next_occurrence(&item.recurrence, item.start_at, clock.now());

    let (current_streak, best_streak) = if item.is_trackable() {
        let completions = store.load_completions(&item.id)?;
        let streak = calculate_streaks(&item.recurrence, item.start_at, &completions, clock.today());
        (Some(streak.current_streak), Some(streak.best_streak))
    } else {
        (None, None)
    };

    Ok(ItemStatus {
        item_id: item.id.to_string(),
        title: item.title.clone(),
        kind: item.kind,
        next_occurrence: next,
        current_streak,
        best_streak,
    })
}
