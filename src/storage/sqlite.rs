/// SQLite implementation of the record-store interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving recurring items and their completions. Recurrence rules
/// are stored as a JSON column; timestamps as RFC 3339 text.

use std::path::PathBuf;
use rusqlite::{params, Connection};

use crate::domain::{CompletionInstance, ItemId, ItemKind, RecurringItem};
use crate::storage::{migrations, RecordStore, StorageError};

/// SQLite-based record store
///
/// Holds a connection to the SQLite database and implements all the
/// operations defined in the RecordStore trait.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SQLite store
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        // Open the SQLite database
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        // Initialize/migrate the database schema
        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite store initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Helper method to convert ItemKind to string for database storage
    fn kind_to_string(kind: ItemKind) -> &'static str {
        match kind {
            ItemKind::Habit => "habit",
            ItemKind::Event => "event",
        }
    }

    /// Helper method to convert string from database to ItemKind
    fn string_to_kind(s: &str) -> Result<ItemKind, StorageError> {
        match s {
            "habit" => Ok(ItemKind::Habit),
            "event" => Ok(ItemKind::Event),
            _ => Err(StorageError::Query(rusqlite::Error::InvalidColumnType(
                0, "Invalid item kind".to_string(), rusqlite::types::Type::Text
            ))),
        }
    }

    /// Row-mapping closure body shared by get_item and list_items
    fn item_from_row(row: &rusqlite::Row<'_>) -> Result<RecurringItem, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = ItemId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let kind_str: String = row.get(1)?;
        let kind = Self::string_to_kind(&kind_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "Invalid item kind".to_string(), rusqlite::types::Type::Text)
        })?;

        let start_at_str: String = row.get(4)?;
        let start_at = chrono::DateTime::parse_from_rfc3339(&start_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(4, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
            })?
            .with_timezone(&chrono::Utc);

        let recurrence_json: String = row.get(5)?;
        let recurrence = serde_json::from_str(&recurrence_json).map_err(|_| {
            rusqlite::Error::InvalidColumnType(5, "Invalid recurrence".to_string(), rusqlite::types::Type::Text)
        })?;

        let created_at_str: String = row.get(7)?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| {
                rusqlite::Error::InvalidColumnType(7, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
            })?
            .with_timezone(&chrono::Utc);

        Ok(RecurringItem::from_existing(
            id,
            kind,
            row.get(2)?, // title
            row.get(3)?, // description
            start_at,
            recurrence,
            row.get(6)?, // notification_offset_ms
            created_at,
            row.get(8)?, // is_active
        ))
    }
}

const ITEM_COLUMNS: &str =
    "id, kind, title, description, start_at, recurrence_data, notification_offset_ms, created_at, is_active";

impl RecordStore for SqliteStore {
    /// Persist a new recurring item
    fn create_item(&self, item: &RecurringItem) -> Result<(), StorageError> {
        let recurrence_json = serde_json::to_string(&item.recurrence)?;

        self.conn.execute(
            "INSERT INTO items (
                id, kind, title, description, start_at, recurrence_data,
                notification_offset_ms, created_at, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                item.id.to_string(),
                Self::kind_to_string(item.kind),
                item.title,
                item.description,
                item.start_at.to_rfc3339(),
                recurrence_json,
                item.notification_offset_ms,
                item.created_at.to_rfc3339(),
                item.is_active
            ],
        )?;

        tracing::debug!("Created item: {} ({})", item.title, item.id.to_string());
        Ok(())
    }

    /// Get an item by its ID
    fn get_item(&self, item_id: &ItemId) -> Result<RecurringItem, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM items WHERE id = ?1",
            ITEM_COLUMNS
        ))?;

        let result = stmt.query_row(params![item_id.to_string()], Self::item_from_row);

        match result {
            Ok(item) => Ok(item),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StorageError::ItemNotFound {
                    item_id: item_id.to_string(),
                })
            },
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Update an existing item
    fn update_item(&self, item: &RecurringItem) -> Result<(), StorageError> {
        let recurrence_json = serde_json::to_string(&item.recurrence)?;

        let rows_affected = self.conn.execute(
            "UPDATE items SET
                kind = ?2,
                title = ?3,
                description = ?4,
                start_at = ?5,
                recurrence_data = ?6,
                notification_offset_ms = ?7,
                is_active = ?8
             WHERE id = ?1",
            params![
                item.id.to_string(),
                Self::kind_to_string(item.kind),
                item.title,
                item.description,
                item.start_at.to_rfc3339(),
                recurrence_json,
                item.notification_offset_ms,
                item.is_active
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::ItemNotFound {
                item_id: item.id.to_string(),
            });
        }

        tracing::debug!("Updated item: {} ({})", item.title, item.id.to_string());
        Ok(())
    }

    /// Soft delete an item (mark as inactive)
    fn delete_item(&self, item_id: &ItemId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE items SET is_active = 0 WHERE id = ?1",
            params![item_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::ItemNotFound {
                item_id: item_id.to_string(),
            });
        }

        tracing::debug!("Soft deleted item: {}", item_id.to_string());
        Ok(())
    }

    /// List items with optional kind filtering
    fn list_items(
        &self,
        kind: Option<ItemKind>,
        active_only: bool,
    ) -> Result<Vec<RecurringItem>, StorageError> {
        let mut sql = format!("SELECT {} FROM items", ITEM_COLUMNS);
        let mut clauses = Vec::new();

        if kind.is_some() {
            clauses.push("kind = ?1");
        }
        if active_only {
            clauses.push("is_active = 1");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut items = Vec::new();

        if let Some(kind) = kind {
            let item_iter =
                stmt.query_map(params![Self::kind_to_string(kind)], Self::item_from_row)?;
            for item in item_iter {
                items.push(item?);
            }
        } else {
            let item_iter = stmt.query_map([], Self::item_from_row)?;
            for item in item_iter {
                items.push(item?);
            }
        }

        Ok(items)
    }

    /// Load all completions for one item, oldest day first
    fn load_completions(&self, owner_id: &ItemId) -> Result<Vec<CompletionInstance>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT owner_id, epoch_day, logged_at
             FROM completions WHERE owner_id = ?1
             ORDER BY epoch_day ASC"
        )?;

        let completion_iter = stmt.query_map(params![owner_id.to_string()], |row| {
            let owner_str: String = row.get(0)?;
            let owner = ItemId::from_string(&owner_str).map_err(|_| {
                rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
            })?;

            let logged_at_str: String = row.get(2)?;
            let logged_at = chrono::DateTime::parse_from_rfc3339(&logged_at_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(2, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
                })?
                .with_timezone(&chrono::Utc);

            Ok(CompletionInstance::from_existing(
                owner,
                row.get(1)?, // epoch_day
                logged_at,
            ))
        })?;

        let mut completions = Vec::new();
        for completion in completion_iter {
            completions.push(completion?);
        }

        Ok(completions)
    }

    /// Insert or refresh a completion
    fn upsert_completion(&self, completion: &CompletionInstance) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO completions (owner_id, epoch_day, logged_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (owner_id, epoch_day) DO UPDATE SET logged_at = excluded.logged_at",
            params![
                completion.owner_id.to_string(),
                completion.epoch_day,
                completion.logged_at.to_rfc3339()
            ],
        )?;

        tracing::debug!(
            "Upserted completion for item {} on day {}",
            completion.owner_id.to_string(),
            completion.epoch_day
        );
        Ok(())
    }

    /// Remove a completion (user undo)
    fn delete_completion(&self, completion: &CompletionInstance) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM completions WHERE owner_id = ?1 AND epoch_day = ?2",
            params![completion.owner_id.to_string(), completion.epoch_day],
        )?;

        tracing::debug!(
            "Deleted completion for item {} on day {}",
            completion.owner_id.to_string(),
            completion.epoch_day
        );
        Ok(())
    }
}
