/// Public library interface for the habit reminder core
///
/// This crate is the computational heart of a habit/event reminder app:
/// recurrence arithmetic, streak statistics, and reminder scheduling with
/// restart recovery. Surrounding concerns (UI, notification delivery,
/// import/export) live outside.

use thiserror::Error;

// Internal modules
mod clock;
mod domain;
mod reminder;
mod service;
mod storage;

// Re-export public modules and types
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::*;
pub use reminder::{
    AlarmBackend, AlarmKey, MemoryAlarmBackend, RecoveryFailure, RecoveryReport,
    ReminderCoordinator, ReminderPayload, SchedulingError,
};
pub use service::*;
pub use storage::{RecordStore, SqliteStore, StorageError};

/// Errors that can reach a caller of the service layer
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Scheduling error: {0}")]
    Scheduling(#[from] reminder::SchedulingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
