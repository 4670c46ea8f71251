/// Operations for marking and unmarking habit completions
///
/// Completions apply to habits only; events are reminder-only. Both
/// operations return freshly recomputed streaks for display.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::clock::Clock;
use crate::domain::{calculate_streaks, CompletionInstance, DomainError, StreakResult};
use crate::service::parse_item_id;
use crate::storage::RecordStore;
use crate::EngineError;

/// Parameters for marking a habit complete
#[derive(Debug, Deserialize)]
pub struct CompleteParams {
    pub item_id: String,
    pub date: Option<NaiveDate>, // Optional day, defaults to today
}

/// Response from marking a habit complete
#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub success: bool,
    pub streak: StreakResult,
    pub message: String,
}

/// Parameters for undoing a completion
#[derive(Debug, Deserialize)]
pub struct UndoCompletionParams {
    pub item_id: String,
    pub date: NaiveDate,
}

/// Response from undoing a completion
#[derive(Debug, Serialize)]
pub struct UndoCompletionResponse {
    pub success: bool,
    pub streak: StreakResult,
    pub message: String,
}

/// Mark a habit complete for a calendar day
pub fn complete_item<S: RecordStore>(
    store: &S,
    clock: &dyn Clock,
    params: CompleteParams,
) -> Result<CompleteResponse, EngineError> {
    let item_id = parse_item_id(&params.item_id)?;
    let item = store.get_item(&item_id)?;

    if !item.is_trackable() {
        return Err(DomainError::Validation {
            message: format!("'{}' is an event; completions apply to habits only", item.title),
        }
        .into());
    }

    let today = clock.today();
    let date = params.date.unwrap_or(today);

    if date > today {
        return Err(DomainError::InvalidDate(
            "Cannot complete future dates".to_string()
        )
        .into());
    }

    // Weekly rules restrict which days may be marked; everything else
    // accepts any day.
    if !item.recurrence.is_date_allowed(date) {
        return Err(DomainError::InvalidDate(format!(
            "{} is not one of this habit's scheduled weekdays",
            date
        ))
        .into());
    }

    store.upsert_completion(&CompletionInstance::new(item_id.clone(), date))?;

    let completions = store.load_completions(&item_id)?;
    let streak = calculate_streaks(&item.recurrence, item.start_at, &completions, today);

    Ok(CompleteResponse {
        success: true,
        streak,
        message: format!(
            "🔥 Completed '{}'! Current streak: {} day{}",
            item.title,
            streak.current_streak,
            if streak.current_streak == 1 { "" } else { "s" }
        ),
    })
}

/// Undo a completion for a calendar day
pub fn undo_completion<S: RecordStore>(
    store: &S,
    clock: &dyn Clock,
    params: UndoCompletionParams,
) -> Result<UndoCompletionResponse, EngineError> {
    let item_id = parse_item_id(&params.item_id)?;
    let item = store.get_item(&item_id)?;

    store.delete_completion(&CompletionInstance::new(item_id.clone(), params.date))?;

    let completions = store.load_completions(&item_id)?;
    let streak = calculate_streaks(&item.recurrence, item.start_at, &completions, clock.today());

    Ok(UndoCompletionResponse {
        success: true,
        streak,
        message: format!("Removed completion of '{}' on {}", item.title, params.date),
    })
}
