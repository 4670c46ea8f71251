/// Boot-time reminder recovery
///
/// One-shot alarm registrations do not survive a device reboot or process
/// restart; this operation re-registers every active item's next occurrence.
/// Per-item failures are reported, never thrown.

use serde::Serialize;

use crate::clock::Clock;
use crate::reminder::{AlarmBackend, ReminderCoordinator};
use crate::storage::RecordStore;
use crate::EngineError;

/// Response from a recovery pass
#[derive(Debug, Serialize)]
pub struct RecoverResponse {
    pub scheduled: usize,
    pub unscheduled: usize,
    pub failures: Vec<String>,
    pub summary: String,
}

/// Re-register reminders for every active item
///
/// Safe to call against a backend that still holds stale registrations:
/// re-registration overwrites by key. Returns an aggregate; a storage error
/// loading the item list is the only way this function fails.
pub fn recover_reminders<S: RecordStore, B: AlarmBackend>(
    store: &S,
    coordinator: &ReminderCoordinator<B>,
    clock: &dyn Clock,
) -> Result<RecoverResponse, EngineError> {
    let items = store.list_items(None, true)?;
    let report = coordinator.recover_all(&items, clock.now());

    let failures: Vec<String> = report
        .failures
        .iter()
        .map(|f| format!("{}: {}", f.item_id.to_string(), f.error))
        .collect();

    let summary = format!(
        "Recovered {} reminder{}, {} exhausted, {} failed",
        report.scheduled.len(),
        if report.scheduled.len() == 1 { "" } else { "s" },
        report.unscheduled.len(),
        failures.len()
    );

    Ok(RecoverResponse {
        scheduled: report.scheduled.len(),
        unscheduled: report.unscheduled.len(),
        failures,
        summary,
    })
}
