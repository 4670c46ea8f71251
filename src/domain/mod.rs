/// Domain module containing core business logic and data types
///
/// This module defines the core entities (RecurringItem, CompletionInstance,
/// StreakResult) together with the recurrence engine and streak calculator
/// that operate on them. Everything here is pure: no I/O, no ambient clock.

pub mod types;
pub mod item;
pub mod completion;
pub mod recurrence;
pub mod streak;

// Re-export public types for easy access
pub use types::*;
pub use item::*;
pub use completion::*;
pub use recurrence::*;
pub use streak::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid title: {0}")]
    InvalidTitle(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid notification offset: {message}")]
    InvalidOffset { message: String },
}
