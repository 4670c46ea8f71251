/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    // Check current version
    let current_version = get_current_version(conn)?;

    // Run migrations if needed
    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // Default to version 0 if no version record exists

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// This creates the core tables for recurring items and completions
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    // Create items table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            start_at TEXT NOT NULL,
            recurrence_data TEXT NOT NULL,
            notification_offset_ms INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            is_active BOOLEAN DEFAULT TRUE
        )",
        [],
    )?;

    // Create completions table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS completions (
            owner_id TEXT NOT NULL,
            epoch_day INTEGER NOT NULL,
            logged_at TEXT NOT NULL,
            FOREIGN KEY (owner_id) REFERENCES items (id)
        )",
        [],
    )?;

    // Create indexes for better query performance
    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // One completion per item per day; also the main lookup path
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_completions_owner_day
         ON completions (owner_id, epoch_day)",
        [],
    )?;

    // Index for filtering items by kind
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_items_kind
         ON items (kind)",
        [],
    )?;

    // Index for filtering active items
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_items_active
         ON items (is_active)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
