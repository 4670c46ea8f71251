/// Core identifier and recurrence types shared across the domain layer
///
/// This module defines the ID newtype, the item kind, and the RecurrenceRule
/// enum that drives occurrence computation and calendar-marking checks.

use serde::{Deserialize, Serialize};
use chrono::{Datelike, NaiveDate, Weekday};
use uuid::Uuid;

/// Unique identifier for a recurring item
///
/// This is a wrapper around UUID to provide type safety - an item ID cannot
/// be confused with any other string-shaped key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Generate a new random item ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an item ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Convert to string representation
    pub fn to_string(&self) -> String {
        self.0.to_string()
    }
}

/// Whether a recurring item is a trackable habit or a plain calendar event
///
/// Habits accumulate completion records and streaks; events only produce
/// reminders. Both share the same recurrence machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// A habit the user tracks day by day
    Habit,
    /// A one-off or repeating calendar event
    Event,
}

impl ItemKind {
    /// Get the display name for this kind
    pub fn display_name(&self) -> &str {
        match self {
            ItemKind::Habit => "Habit",
            ItemKind::Event => "Event",
        }
    }
}

/// How often a recurring item comes due
///
/// This is a closed set: every consumer matches exhaustively, so adding a
/// variant is a compile-time-checked exercise across the whole crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceRule {
    /// Fires exactly once, at the item's start instant
    Once,
    /// Fires every N days counted from the start instant's date
    EveryNDays(u32),
    /// Fires on the given weekdays (Monday=0 .. Sunday=6 ordering)
    Weekly(Vec<Weekday>),
    /// Fires on the start instant's day-of-month, clamped to shorter months
    Monthly,
    /// Fires on the start instant's month/day, Feb-29 folding in non-leap years
    Yearly,
}

impl RecurrenceRule {
    /// Validate that a rule's parameters are usable
    pub fn validate(&self) -> Result<(), crate::domain::DomainError> {
        match self {
            RecurrenceRule::EveryNDays(interval) => {
                if *interval == 0 {
                    return Err(crate::domain::DomainError::InvalidRule(
                        "Interval must be at least 1 day".to_string()
                    ));
                }
                if *interval > 365 {
                    return Err(crate::domain::DomainError::InvalidRule(
                        "Interval cannot be longer than 365 days".to_string()
                    ));
                }
            }
            RecurrenceRule::Weekly(days) => {
                if days.is_empty() {
                    return Err(crate::domain::DomainError::InvalidRule(
                        "Weekly rule must specify at least one day".to_string()
                    ));
                }
                if days.len() > 7 {
                    return Err(crate::domain::DomainError::InvalidRule(
                        "Weekly rule cannot have more than 7 days".to_string()
                    ));
                }
            }
            RecurrenceRule::Once | RecurrenceRule::Monthly | RecurrenceRule::Yearly => {}
        }
        Ok(())
    }

    /// Check whether a calendar date may be marked for an item with this rule
    ///
    /// Only Weekly restricts marking to its weekday set. Once, EveryNDays,
    /// Monthly, and Yearly allow any date: manual marking is unrestricted for
    /// those rules even though their occurrence cadence is narrower.
    pub fn is_date_allowed(&self, date: NaiveDate) -> bool {
        match self {
            RecurrenceRule::Weekly(days) => days.contains(&date.weekday()),
            RecurrenceRule::Once
            | RecurrenceRule::EveryNDays(_)
            | RecurrenceRule::Monthly
            | RecurrenceRule::Yearly => true,
        }
    }

    /// Whether this rule produces more than one occurrence
    pub fn is_recurring(&self) -> bool {
        !matches!(self, RecurrenceRule::Once)
    }
}
