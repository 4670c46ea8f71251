/// Reminder coordination: occurrences in, scheduled callbacks out
///
/// The coordinator translates next occurrences into one-shot registrations
/// against an injected alarm backend, and re-registers everything after a
/// process restart. It holds no state of its own beyond the backend handle;
/// the backend's registry is the only record of what is scheduled.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::domain::{next_occurrence, ItemId, ItemKind, RecurringItem};

/// Errors surfaced by an alarm backend's register call
///
/// These are propagated to the caller untouched; a failed registration
/// leaves the item unscheduled, never half-scheduled. Retry policy, if any,
/// belongs to the caller.
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Notification permission denied: {0}")]
    PermissionDenied(String),

    #[error("Scheduling quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Alarm backend error: {0}")]
    Backend(String),
}

/// Registration key: one pending callback per (kind, id)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlarmKey {
    pub kind: ItemKind,
    pub id: ItemId,
}

impl AlarmKey {
    pub fn for_item(item: &RecurringItem) -> Self {
        Self {
            kind: item.kind,
            id: item.id.clone(),
        }
    }
}

/// Payload carried into the eventual notification
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderPayload {
    pub title: String,
    pub body: String,
}

impl ReminderPayload {
    pub fn for_item(item: &RecurringItem) -> Self {
        Self {
            title: item.title.clone(),
            body: item.description.clone().unwrap_or_default(),
        }
    }
}

/// Platform alarm adapters implement this trait
///
/// `register` replaces any pending registration under the same key.
/// `cancel` is idempotent and never errors. Delivery is best-effort at or
/// after the fire instant; the coordinator tolerates both at-least-once and
/// at-most-once delivery.
pub trait AlarmBackend {
    fn register(
        &self,
        key: &AlarmKey,
        fire_at: DateTime<Utc>,
        payload: ReminderPayload,
    ) -> Result<(), SchedulingError>;

    fn cancel(&self, key: &AlarmKey);
}

/// In-process alarm backend
///
/// Keeps registrations in a map so the recovery shell and tests can inspect
/// what would fire and when. Not a delivery mechanism.
#[derive(Default)]
pub struct MemoryAlarmBackend {
    registrations: Mutex<HashMap<AlarmKey, (DateTime<Utc>, ReminderPayload)>>,
}

impl MemoryAlarmBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending registrations
    pub fn pending(&self) -> usize {
        self.registrations.lock().map(|map| map.len()).unwrap_or(0)
    }

    /// Look up the pending fire instant for a key
    pub fn fire_at(&self, key: &AlarmKey) -> Option<DateTime<Utc>> {
        self.registrations
            .lock()
            .ok()
            .and_then(|map| map.get(key).map(|(at, _)| *at))
    }
}

impl AlarmBackend for MemoryAlarmBackend {
    fn register(
        &self,
        key: &AlarmKey,
        fire_at: DateTime<Utc>,
        payload: ReminderPayload,
    ) -> Result<(), SchedulingError> {
        let mut map = self
            .registrations
            .lock()
            .map_err(|_| SchedulingError::Backend("registration map poisoned".to_string()))?;
        tracing::debug!("Registered alarm for '{}' at {}", payload.title, fire_at);
        map.insert(key.clone(), (fire_at, payload));
        Ok(())
    }

    fn cancel(&self, key: &AlarmKey) {
        if let Ok(mut map) = self.registrations.lock() {
            if map.remove(key).is_some() {
                tracing::debug!("Cancelled alarm for item {}", key.id.to_string());
            }
        }
    }
}

/// One item's failure during a recovery pass
#[derive(Debug)]
pub struct RecoveryFailure {
    pub item_id: ItemId,
    pub error: SchedulingError,
}

/// Outcome of a restart recovery pass
///
/// Failures are collected, never thrown: one item's bad registration must
/// not stop the rest of the batch from being re-registered.
#[derive(Debug, Default)]
pub struct RecoveryReport {
    /// Items whose next occurrence was re-registered
    pub scheduled: Vec<ItemId>,
    /// Items with no future occurrence (exhausted Once rules)
    pub unscheduled: Vec<ItemId>,
    /// Items whose registration failed
    pub failures: Vec<RecoveryFailure>,
}

/// Schedules, cancels, and recovers reminders for recurring items
///
/// The backend is an injected capability; the coordinator provides no
/// internal locking, so operations on the same item must be serialized by
/// the caller.
pub struct ReminderCoordinator<B: AlarmBackend> {
    backend: B,
}

impl<B: AlarmBackend> ReminderCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Access the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Register a callback for the item's next occurrence
    ///
    /// Returns the occurrence instant that was scheduled, or None when the
    /// rule has no future occurrence (terminal state for exhausted Once
    /// items). The callback fires at the occurrence minus the item's
    /// notification offset.
    pub fn schedule_next(
        &self,
        item: &RecurringItem,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, SchedulingError> {
        match next_occurrence(&item.recurrence, item.start_at, now) {
            Some(occurs_at) => {
                let fire_at = occurs_at - Duration::milliseconds(item.notification_offset_ms);
                self.backend
                    .register(&AlarmKey::for_item(item), fire_at, ReminderPayload::for_item(item))?;
                tracing::debug!(
                    "Scheduled '{}' for {} (alert at {})",
                    item.title,
                    occurs_at,
                    fire_at
                );
                Ok(Some(occurs_at))
            }
            None => Ok(None),
        }
    }

    /// Remove any pending callback for the item
    ///
    /// A no-op when nothing is scheduled.
    pub fn cancel(&self, item: &RecurringItem) {
        self.backend.cancel(&AlarmKey::for_item(item));
    }

    /// Handle a fired callback
    ///
    /// Recurring rules immediately re-register against the current clock, so
    /// the chain self-heals even after the device slept through several
    /// cycles - missed firings are skipped, not replayed. Once items end
    /// their chain here.
    pub fn on_fired(
        &self,
        item: &RecurringItem,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, SchedulingError> {
        if item.recurrence.is_recurring() {
            self.schedule_next(item, now)
        } else {
            Ok(None)
        }
    }

    /// Re-register every item after a process restart
    ///
    /// Idempotent: re-registration overwrites stale backend entries by key.
    /// Each item's recovery is independent and best-effort.
    pub fn recover_all(&self, items: &[RecurringItem], now: DateTime<Utc>) -> RecoveryReport {
        let mut report = RecoveryReport::default();

        for item in items {
            match self.schedule_next(item, now) {
                Ok(Some(_)) => report.scheduled.push(item.id.clone()),
                Ok(None) => report.unscheduled.push(item.id.clone()),
                Err(error) => {
                    tracing::warn!(
                        "Failed to recover reminder for '{}': {}",
                        item.title,
                        error
                    );
                    report.failures.push(RecoveryFailure {
                        item_id: item.id.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            "Recovery pass: {} scheduled, {} unscheduled, {} failed",
            report.scheduled.len(),
            report.unscheduled.len(),
            report.failures.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecurrenceRule;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn item(rule: RecurrenceRule, offset_ms: i64) -> RecurringItem {
        RecurringItem::new(
            ItemKind::Habit,
            "Stretch".to_string(),
            Some("Five minutes of stretching".to_string()),
            utc(2024, 1, 1, 9, 0, 0),
            rule,
            offset_ms,
        )
        .unwrap()
    }

    /// Backend whose register always fails, for isolation tests
    struct FailingBackend;

    impl AlarmBackend for FailingBackend {
        fn register(
            &self,
            _key: &AlarmKey,
            _fire_at: DateTime<Utc>,
            _payload: ReminderPayload,
        ) -> Result<(), SchedulingError> {
            Err(SchedulingError::PermissionDenied("revoked".to_string()))
        }

        fn cancel(&self, _key: &AlarmKey) {}
    }

    /// Backend that fails for one specific key and delegates the rest
    struct SelectiveBackend {
        poison: AlarmKey,
        inner: MemoryAlarmBackend,
    }

    impl AlarmBackend for SelectiveBackend {
        fn register(
            &self,
            key: &AlarmKey,
            fire_at: DateTime<Utc>,
            payload: ReminderPayload,
        ) -> Result<(), SchedulingError> {
            if *key == self.poison {
                return Err(SchedulingError::QuotaExceeded("alarm limit".to_string()));
            }
            self.inner.register(key, fire_at, payload)
        }

        fn cancel(&self, key: &AlarmKey) {
            self.inner.cancel(key);
        }
    }

    #[test]
    fn schedule_applies_the_notification_offset() {
        let coordinator = ReminderCoordinator::new(MemoryAlarmBackend::new());
        let item = item(RecurrenceRule::EveryNDays(1), 15 * 60 * 1000);
        let now = utc(2024, 2, 1, 12, 0, 0);

        let occurs_at = coordinator.schedule_next(&item, now).unwrap().unwrap();
        assert_eq!(occurs_at, utc(2024, 2, 2, 9, 0, 0));

        let fire_at = coordinator
            .backend()
            .fire_at(&AlarmKey::for_item(&item))
            .unwrap();
        assert_eq!(fire_at, utc(2024, 2, 2, 8, 45, 0));
    }

    #[test]
    fn exhausted_once_item_registers_nothing() {
        let coordinator = ReminderCoordinator::new(MemoryAlarmBackend::new());
        let item = item(RecurrenceRule::Once, 0);
        let now = utc(2024, 2, 1, 12, 0, 0); // start has passed

        let result = coordinator.schedule_next(&item, now).unwrap();
        assert_eq!(result, None);
        assert_eq!(coordinator.backend().pending(), 0);
    }

    #[test]
    fn cancel_is_idempotent() {
        let coordinator = ReminderCoordinator::new(MemoryAlarmBackend::new());
        let item = item(RecurrenceRule::EveryNDays(1), 0);

        // Never scheduled: cancelling must be a silent no-op.
        coordinator.cancel(&item);
        coordinator.cancel(&item);
        assert_eq!(coordinator.backend().pending(), 0);
    }

    #[test]
    fn on_fired_reschedules_recurring_rules() {
        let coordinator = ReminderCoordinator::new(MemoryAlarmBackend::new());
        let item = item(RecurrenceRule::EveryNDays(1), 0);
        // Device was off for three cycles; the chain jumps straight to the
        // next future occurrence instead of replaying missed ones.
        let now = utc(2024, 2, 4, 10, 0, 0);

        let next = coordinator.on_fired(&item, now).unwrap().unwrap();
        assert_eq!(next, utc(2024, 2, 5, 9, 0, 0));
        assert_eq!(coordinator.backend().pending(), 1);
    }

    #[test]
    fn on_fired_ends_the_chain_for_once() {
        let coordinator = ReminderCoordinator::new(MemoryAlarmBackend::new());
        let item = item(RecurrenceRule::Once, 0);
        let now = utc(2024, 2, 1, 12, 0, 0);

        assert_eq!(coordinator.on_fired(&item, now).unwrap(), None);
        assert_eq!(coordinator.backend().pending(), 0);
    }

    #[test]
    fn register_failure_propagates() {
        let coordinator = ReminderCoordinator::new(FailingBackend);
        let item = item(RecurrenceRule::EveryNDays(1), 0);
        let result = coordinator.schedule_next(&item, utc(2024, 2, 1, 12, 0, 0));
        assert!(matches!(result, Err(SchedulingError::PermissionDenied(_))));
    }

    #[test]
    fn recovery_isolates_per_item_failures() {
        let items: Vec<RecurringItem> = (0..5)
            .map(|_| item(RecurrenceRule::EveryNDays(1), 0))
            .collect();
        let poison = AlarmKey::for_item(&items[2]);
        let coordinator = ReminderCoordinator::new(SelectiveBackend {
            poison,
            inner: MemoryAlarmBackend::new(),
        });

        let report = coordinator.recover_all(&items, utc(2024, 2, 1, 12, 0, 0));

        assert_eq!(report.scheduled.len(), 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].item_id, items[2].id);
        assert_eq!(coordinator.backend().inner.pending(), 4);
    }

    #[test]
    fn recovery_leaves_exhausted_items_unscheduled() {
        let coordinator = ReminderCoordinator::new(MemoryAlarmBackend::new());
        let items = vec![
            item(RecurrenceRule::Once, 0),
            item(RecurrenceRule::EveryNDays(2), 0),
        ];

        let report = coordinator.recover_all(&items, utc(2024, 2, 1, 12, 0, 0));

        assert_eq!(report.scheduled.len(), 1);
        assert_eq!(report.unscheduled.len(), 1);
        assert_eq!(report.unscheduled[0], items[0].id);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn reregistration_overwrites_by_key() {
        let coordinator = ReminderCoordinator::new(MemoryAlarmBackend::new());
        let item = item(RecurrenceRule::EveryNDays(1), 0);

        coordinator.schedule_next(&item, utc(2024, 2, 1, 12, 0, 0)).unwrap();
        coordinator.schedule_next(&item, utc(2024, 2, 3, 12, 0, 0)).unwrap();

        // Still a single registration, now for the later occurrence.
        assert_eq!(coordinator.backend().pending(), 1);
        assert_eq!(
            coordinator.backend().fire_at(&AlarmKey::for_item(&item)),
            Some(utc(2024, 2, 4, 9, 0, 0))
        );
    }
}
