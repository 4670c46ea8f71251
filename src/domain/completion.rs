/// CompletionInstance entity for tracking habit completions
///
/// A completion records that a recurring item was satisfied on one calendar
/// day. Days are keyed by epoch day (whole days since 1970-01-01) so the key
/// is independent of time zone and clock drift.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use crate::domain::ItemId;

/// Days from 0001-01-01 (chrono's CE epoch) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Convert a calendar date to its epoch-day count
pub fn epoch_day_from_date(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert an epoch-day count back to a calendar date
///
/// Returns None for counts outside chrono's representable range.
pub fn date_from_epoch_day(epoch_day: i64) -> Option<NaiveDate> {
    i32::try_from(epoch_day + UNIX_EPOCH_DAYS_FROM_CE)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// A record marking that an item was completed on a specific calendar day
///
/// Created by user action, deleted by user action (undo), never mutated.
/// At most one instance exists per (owner, epoch day) pair; the storage
/// layer enforces the uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionInstance {
    /// Which recurring item this completion belongs to
    pub owner_id: ItemId,
    /// Which calendar day was completed, as days since 1970-01-01
    pub epoch_day: i64,
    /// When this completion was recorded
    pub logged_at: DateTime<Utc>,
}

impl CompletionInstance {
    /// Create a completion for the given calendar day
    pub fn new(owner_id: ItemId, date: NaiveDate) -> Self {
        Self {
            owner_id,
            epoch_day: epoch_day_from_date(date),
            logged_at: Utc::now(),
        }
    }

    /// Create a completion from existing data (used when loading from database)
    pub fn from_existing(owner_id: ItemId, epoch_day: i64, logged_at: DateTime<Utc>) -> Self {
        Self {
            owner_id,
            epoch_day,
            logged_at,
        }
    }

    /// The calendar day this completion covers
    pub fn date(&self) -> Option<NaiveDate> {
        date_from_epoch_day(self.epoch_day)
    }
}
