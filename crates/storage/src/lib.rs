use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use subburn_transcript::{Config, Preset, PresetRepository};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid preset name: {0:?}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        tracing::debug!(path = %path.display(), "preset_database_opened");
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS presets (
                name TEXT PRIMARY KEY,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                config_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_presets_updated_at ON presets(updated_at);
            "#,
        )?;
        Ok(())
    }
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn preset_from_row(
    name: String,
    created_at: i64,
    updated_at: i64,
    config_json: &str,
) -> Result<Preset> {
    let config: Config = serde_json::from_str(config_json)?;
    Ok(Preset {
        name,
        config,
        created_at: timestamp(created_at),
        updated_at: timestamp(updated_at),
    })
}

impl PresetRepository for Database {
    type Error = StorageError;

    /// Insert or overwrite by name. The original creation time survives overwrites.
    fn save(&self, preset: &Preset) -> Result<()> {
        let name = preset.name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidName(preset.name.clone()));
        }
        let json = serde_json::to_string(&preset.config)?;
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT INTO presets (name, created_at, updated_at, config_json) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET updated_at = excluded.updated_at, config_json = excluded.config_json",
            (
                name,
                preset.created_at.timestamp_millis(),
                preset.updated_at.timestamp_millis(),
                json,
            ),
        )?;
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Preset> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let row: Option<(String, i64, i64, String)> = conn
            .query_row(
                "SELECT name, created_at, updated_at, config_json FROM presets WHERE name = ?1",
                [name.trim()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;
        let (name, created_at, updated_at, json) =
            row.ok_or_else(|| StorageError::NotFound(format!("preset {name}")))?;
        preset_from_row(name, created_at, updated_at, &json)
    }

    fn list(&self) -> Result<Vec<Preset>> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT name, created_at, updated_at, config_json FROM presets ORDER BY name ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let created_at: i64 = row.get(1)?;
            let updated_at: i64 = row.get(2)?;
            let json: String = row.get(3)?;
            Ok((name, created_at, updated_at, json))
        })?;

        let mut presets = Vec::new();
        for row in rows {
            let (name, created_at, updated_at, json) = row?;
            match preset_from_row(name, created_at, updated_at, &json) {
                Ok(preset) => presets.push(preset),
                Err(e) => tracing::warn!("Skipping unreadable preset: {}", e),
            }
        }
        Ok(presets)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        let affected = conn.execute("DELETE FROM presets WHERE name = ?1", [name.trim()])?;
        if affected == 0 {
            return Err(StorageError::NotFound(format!("preset {name}")));
        }
        Ok(())
    }
}
