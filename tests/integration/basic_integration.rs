/// End-to-end tests driving the service layer against a real SQLite store
use habit_reminder_core::*;
use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    // Wednesday noon; the sample habit starts the Monday before at 08:00.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap()
    }

    fn fixtures() -> (
        NamedTempFile,
        SqliteStore,
        ReminderCoordinator<MemoryAlarmBackend>,
        FixedClock,
    ) {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let store =
            SqliteStore::new(temp_file.path().to_path_buf()).expect("Failed to create store");
        let coordinator = ReminderCoordinator::new(MemoryAlarmBackend::new());
        let clock = FixedClock::new(now());
        (temp_file, store, coordinator, clock)
    }

    fn create_daily_habit(
        store: &SqliteStore,
        coordinator: &ReminderCoordinator<MemoryAlarmBackend>,
        clock: &FixedClock,
    ) -> CreateItemResponse {
        create_item(
            store,
            coordinator,
            clock,
            CreateItemParams {
                kind: ItemKind::Habit,
                title: "Meditate".to_string(),
                description: Some("Ten quiet minutes".to_string()),
                start_at: Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap(),
                recurrence: RecurrenceRule::EveryNDays(1),
                notification_offset_ms: Some(10 * 60 * 1000),
            },
        )
        .expect("create should succeed")
    }

    #[test]
    fn test_create_schedules_first_reminder() {
        let (_file, store, coordinator, clock) = fixtures();

        let response = create_daily_habit(&store, &coordinator, &clock);

        // Today's 08:00 has passed, so the next occurrence is tomorrow.
        assert_eq!(
            response.next_occurrence,
            Some(Utc.with_ymd_and_hms(2024, 3, 7, 8, 0, 0).unwrap())
        );
        assert_eq!(coordinator.backend().pending(), 1);
    }

    #[test]
    fn test_complete_and_undo_round_trip() {
        let (_file, store, coordinator, clock) = fixtures();
        let created = create_daily_habit(&store, &coordinator, &clock);

        // Complete yesterday, then today.
        complete_item(
            &store,
            &clock,
            CompleteParams {
                item_id: created.item_id.clone(),
                date: Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
            },
        )
        .expect("completing yesterday should succeed");

        let completed_today = complete_item(
            &store,
            &clock,
            CompleteParams {
                item_id: created.item_id.clone(),
                date: None,
            },
        )
        .expect("completing today should succeed");
        assert_eq!(completed_today.streak.current_streak, 2);
        assert_eq!(completed_today.streak.best_streak, 2);

        // Undoing today's completion falls back to the grace window: the
        // run built through yesterday survives.
        let undone = undo_completion(
            &store,
            &clock,
            UndoCompletionParams {
                item_id: created.item_id.clone(),
                date: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            },
        )
        .expect("undo should succeed");
        assert_eq!(undone.streak.current_streak, 1);
    }

    #[test]
    fn test_completions_rejected_for_events() {
        let (_file, store, coordinator, clock) = fixtures();

        let created = create_item(
            &store,
            &coordinator,
            &clock,
            CreateItemParams {
                kind: ItemKind::Event,
                title: "Trash pickup".to_string(),
                description: None,
                start_at: Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap(),
                recurrence: RecurrenceRule::Weekly(vec![Weekday::Tue]),
                notification_offset_ms: None,
            },
        )
        .expect("create should succeed");

        let result = complete_item(
            &store,
            &clock,
            CompleteParams {
                item_id: created.item_id,
                date: None,
            },
        );
        assert!(matches!(result, Err(EngineError::Domain(_))));
    }

    #[test]
    fn test_weekly_habits_reject_off_schedule_days() {
        let (_file, store, coordinator, clock) = fixtures();

        let created = create_item(
            &store,
            &coordinator,
            &clock,
            CreateItemParams {
                kind: ItemKind::Habit,
                title: "Long run".to_string(),
                description: None,
                start_at: Utc.with_ymd_and_hms(2024, 3, 4, 6, 30, 0).unwrap(),
                recurrence: RecurrenceRule::Weekly(vec![Weekday::Mon]),
                notification_offset_ms: None,
            },
        )
        .expect("create should succeed");

        // 2024-03-05 is a Tuesday; the habit only runs Mondays.
        let result = complete_item(
            &store,
            &clock,
            CompleteParams {
                item_id: created.item_id.clone(),
                date: Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
            },
        );
        assert!(matches!(result, Err(EngineError::Domain(_))));

        // Monday itself is fine.
        let result = complete_item(
            &store,
            &clock,
            CompleteParams {
                item_id: created.item_id,
                date: Some(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()),
            },
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_update_replaces_the_pending_reminder() {
        let (_file, store, coordinator, clock) = fixtures();
        let created = create_daily_habit(&store, &coordinator, &clock);

        let updated = update_item(
            &store,
            &coordinator,
            &clock,
            UpdateItemParams {
                item_id: created.item_id,
                title: None,
                description: None,
                start_at: None,
                recurrence: Some(RecurrenceRule::Weekly(vec![Weekday::Fri])),
                notification_offset_ms: None,
                is_active: None,
            },
        )
        .expect("update should succeed");

        // Friday 2024-03-08 at the original 08:00 start time.
        assert_eq!(
            updated.next_occurrence,
            Some(Utc.with_ymd_and_hms(2024, 3, 8, 8, 0, 0).unwrap())
        );
        assert_eq!(coordinator.backend().pending(), 1);
    }

    #[test]
    fn test_deactivating_cancels_the_reminder() {
        let (_file, store, coordinator, clock) = fixtures();
        let created = create_daily_habit(&store, &coordinator, &clock);
        assert_eq!(coordinator.backend().pending(), 1);

        let updated = update_item(
            &store,
            &coordinator,
            &clock,
            UpdateItemParams {
                item_id: created.item_id,
                title: None,
                description: None,
                start_at: None,
                recurrence: None,
                notification_offset_ms: None,
                is_active: Some(false),
            },
        )
        .expect("update should succeed");

        assert_eq!(updated.next_occurrence, None);
        assert_eq!(coordinator.backend().pending(), 0);
    }

    #[test]
    fn test_recovery_reregisters_active_items() {
        let (_file, store, coordinator, clock) = fixtures();
        create_daily_habit(&store, &coordinator, &clock);
        create_item(
            &store,
            &coordinator,
            &clock,
            CreateItemParams {
                kind: ItemKind::Event,
                title: "Rent".to_string(),
                description: None,
                start_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
                recurrence: RecurrenceRule::Monthly,
                notification_offset_ms: None,
            },
        )
        .expect("create should succeed");

        // Simulate a reboot: a brand-new coordinator with an empty backend.
        let fresh = ReminderCoordinator::new(MemoryAlarmBackend::new());
        let response = recover_reminders(&store, &fresh, &clock).expect("recover should succeed");

        assert_eq!(response.scheduled, 2);
        assert_eq!(response.unscheduled, 0);
        assert!(response.failures.is_empty());
        assert_eq!(fresh.backend().pending(), 2);
    }

    #[test]
    fn test_status_reports_streaks_for_habits_only() {
        let (_file, store, coordinator, clock) = fixtures();
        let habit = create_daily_habit(&store, &coordinator, &clock);
        create_item(
            &store,
            &coordinator,
            &clock,
            CreateItemParams {
                kind: ItemKind::Event,
                title: "Rent".to_string(),
                description: None,
                start_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
                recurrence: RecurrenceRule::Monthly,
                notification_offset_ms: None,
            },
        )
        .expect("create should succeed");

        complete_item(
            &store,
            &clock,
            CompleteParams {
                item_id: habit.item_id.clone(),
                date: None,
            },
        )
        .expect("complete should succeed");

        let status =
            get_status(&store, &clock, StatusParams { item_id: None }).expect("status should succeed");
        assert_eq!(status.items.len(), 2);

        let habit_row = status
            .items
            .iter()
            .find(|s| s.item_id == habit.item_id)
            .expect("habit should be listed");
        assert_eq!(habit_row.current_streak, Some(1));
        assert!(habit_row.next_occurrence.is_some());

        let event_row = status
            .items
            .iter()
            .find(|s| s.item_id != habit.item_id)
            .expect("event should be listed");
        assert_eq!(event_row.current_streak, None);
    }

    #[test]
    fn test_database_persists_across_store_instances() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();
        let clock = FixedClock::new(now());

        let item_id = {
            let store = SqliteStore::new(db_path.clone()).expect("Failed to create first store");
            let coordinator = ReminderCoordinator::new(MemoryAlarmBackend::new());
            create_daily_habit(&store, &coordinator, &clock).item_id
        };

        // A second store over the same file sees the item.
        let store = SqliteStore::new(db_path).expect("Failed to create second store");
        let status = get_status(
            &store,
            &clock,
            StatusParams {
                item_id: Some(item_id),
            },
        )
        .expect("status should succeed");
        assert_eq!(status.items.len(), 1);
        assert_eq!(status.items[0].title, "Meditate");
    }
}
