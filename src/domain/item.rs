/// RecurringItem entity and related functionality
///
/// This module defines the RecurringItem struct that represents a habit or
/// event the user wants reminders for, along with its validation rules.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{DomainError, ItemId, ItemKind, RecurrenceRule};

/// Upper bound on the notification lead time, in milliseconds (7 days)
const MAX_NOTIFICATION_OFFSET_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// A recurring habit or event definition
///
/// The start instant anchors both the time-of-day every future occurrence
/// uses and, for Monthly/Yearly rules, the anchor day-of-month / month-day.
/// An item is immutable except through `update`; callers treat an updated
/// item as a new version (cancel the old reminder, schedule a new one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringItem {
    /// Unique identifier for this item
    pub id: ItemId,
    /// Habit (tracked, streaked) or plain event (reminded only)
    pub kind: ItemKind,
    /// Display title (e.g., "Morning Run", "Water the plants")
    pub title: String,
    /// Optional detailed description, carried into reminder payloads
    pub description: Option<String>,
    /// First occurrence; anchors time-of-day and month/day for all later ones
    pub start_at: DateTime<Utc>,
    /// How the item repeats
    pub recurrence: RecurrenceRule,
    /// Lead time subtracted from an occurrence to get the alert instant
    pub notification_offset_ms: i64,
    /// When this item was created
    pub created_at: DateTime<Utc>,
    /// Whether this item is currently active (soft-delete flag)
    pub is_active: bool,
}

impl RecurringItem {
    /// Create a new item with validation
    ///
    /// This is the main constructor that validates all fields and returns
    /// an error if any validation fails.
    pub fn new(
        kind: ItemKind,
        title: String,
        description: Option<String>,
        start_at: DateTime<Utc>,
        recurrence: RecurrenceRule,
        notification_offset_ms: i64,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        Self::validate_description(&description)?;
        recurrence.validate()?;
        Self::validate_offset(notification_offset_ms)?;

        Ok(Self {
            id: ItemId::new(),
            kind,
            title,
            description,
            start_at,
            recurrence,
            notification_offset_ms,
            created_at: Utc::now(),
            is_active: true,
        })
    }

    /// Create an item from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated and is mainly used
    /// by the storage layer when loading items from the database.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: ItemId,
        kind: ItemKind,
        title: String,
        description: Option<String>,
        start_at: DateTime<Utc>,
        recurrence: RecurrenceRule,
        notification_offset_ms: i64,
        created_at: DateTime<Utc>,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            kind,
            title,
            description,
            start_at,
            recurrence,
            notification_offset_ms,
            created_at,
            is_active,
        }
    }

    /// Update the item's properties with validation
    ///
    /// Every changed field is validated before any of them is applied, so a
    /// failed update leaves the item untouched.
    pub fn update(
        &mut self,
        title: Option<String>,
        description: Option<Option<String>>,
        start_at: Option<DateTime<Utc>>,
        recurrence: Option<RecurrenceRule>,
        notification_offset_ms: Option<i64>,
        is_active: Option<bool>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_title) = title {
            Self::validate_title(new_title)?;
        }
        if let Some(ref new_desc) = description {
            Self::validate_description(new_desc)?;
        }
        if let Some(ref new_rule) = recurrence {
            new_rule.validate()?;
        }
        if let Some(new_offset) = notification_offset_ms {
            Self::validate_offset(new_offset)?;
        }

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_start_at) = start_at {
            self.start_at = new_start_at;
        }
        if let Some(new_recurrence) = recurrence {
            self.recurrence = new_recurrence;
        }
        if let Some(new_offset) = notification_offset_ms {
            self.notification_offset_ms = new_offset;
        }
        if let Some(new_is_active) = is_active {
            self.is_active = new_is_active;
        }

        Ok(())
    }

    /// Whether completion records apply to this item
    pub fn is_trackable(&self) -> bool {
        self.kind == ItemKind::Habit
    }

    // Validation helper methods

    /// Validate the title according to business rules
    fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle(
                "Title cannot be empty".to_string()
            ));
        }

        if trimmed.len() > 100 {
            return Err(DomainError::InvalidTitle(
                "Title cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(())
    }

    /// Validate optional description
    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.len() > 500 {
                return Err(DomainError::Validation {
                    message: "Description cannot be longer than 500 characters".to_string()
                });
            }
        }
        Ok(())
    }

    /// Validate the notification lead time
    fn validate_offset(offset_ms: i64) -> Result<(), DomainError> {
        if offset_ms < 0 {
            return Err(DomainError::InvalidOffset {
                message: "Notification offset cannot be negative".to_string()
            });
        }
        if offset_ms > MAX_NOTIFICATION_OFFSET_MS {
            return Err(DomainError::InvalidOffset {
                message: "Notification offset cannot exceed 7 days".to_string()
            });
        }
        Ok(())
    }
}
