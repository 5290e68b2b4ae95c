//! Integration tests for the storage crate.
//!
//! Uses in-memory SQLite for fast, isolated tests.

use subburn_storage::{Database, StorageError};
use subburn_transcript::{Config, Direction, Preset, PresetRepository};

fn create_test_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn create_test_preset(name: &str) -> Preset {
    Preset::new(
        name,
        Config {
            max_words_per_line: 4,
            direction: Direction::Rtl,
            ..Config::default()
        },
    )
}

// =============================================================================
// Database Initialization Tests
// =============================================================================

mod initialization {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_open_file_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("presets.db");

        let db = Database::open(&db_path);
        assert!(db.is_ok(), "Should create file-based database");
        assert!(db_path.exists(), "Database file should exist");
    }

    #[test]
    fn test_reopen_existing_database() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("presets.db");

        {
            let db = Database::open(&db_path).unwrap();
            db.save(&create_test_preset("reels")).unwrap();
        }

        {
            let db = Database::open(&db_path).unwrap();
            let presets = db.list().unwrap();
            assert_eq!(presets.len(), 1, "Preset should persist after reopen");
        }
    }

    #[test]
    fn test_invalid_path_fails() {
        let result = Database::open(&PathBuf::from("/nonexistent/path/db.sqlite"));
        assert!(result.is_err(), "Should fail with invalid path");
    }
}

// =============================================================================
// Preset Repository Tests
// =============================================================================

mod presets {
    use super::*;

    #[test]
    fn test_save_and_get_preset() {
        let db = create_test_db();
        let preset = create_test_preset("arabic shorts");

        db.save(&preset).unwrap();

        let retrieved = db.get("arabic shorts").unwrap();
        assert_eq!(retrieved.name, "arabic shorts");
        assert_eq!(retrieved.config, preset.config);
        assert_eq!(
            retrieved.created_at.timestamp_millis(),
            preset.created_at.timestamp_millis()
        );
    }

    #[test]
    fn test_get_nonexistent_preset() {
        let db = create_test_db();
        let result = db.get("missing");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_list_presets_empty() {
        let db = create_test_db();
        assert!(db.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_presets_ordered_by_name() {
        let db = create_test_db();
        for name in ["vertical", "broadcast", "karaoke"] {
            db.save(&create_test_preset(name)).unwrap();
        }

        let names: Vec<String> = db.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["broadcast", "karaoke", "vertical"]);
    }

    #[test]
    fn test_overwrite_keeps_created_at() {
        let db = create_test_db();
        let original = create_test_preset("default");
        db.save(&original).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(10));

        let mut updated = Preset::new("default", Config::default());
        updated.config.max_chars_per_line = 32;
        db.save(&updated).unwrap();

        let retrieved = db.get("default").unwrap();
        assert_eq!(retrieved.config.max_chars_per_line, 32);
        assert_eq!(
            retrieved.created_at.timestamp_millis(),
            original.created_at.timestamp_millis()
        );
        assert!(retrieved.updated_at > retrieved.created_at);
        assert_eq!(db.list().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_preset() {
        let db = create_test_db();
        db.save(&create_test_preset("temp")).unwrap();

        db.delete("temp").unwrap();

        assert!(matches!(db.get("temp"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_delete_nonexistent_preset() {
        let db = create_test_db();
        let result = db.delete("ghost");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_blank_name_rejected() {
        let db = create_test_db();
        let result = db.save(&create_test_preset("   "));
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
    }
}

// =============================================================================
// Concurrency Tests
// =============================================================================

mod concurrency {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_writes() {
        let db = Arc::new(create_test_db());

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let db_clone = Arc::clone(&db);
                thread::spawn(move || {
                    for j in 0..10 {
                        let preset = create_test_preset(&format!("thread-{i}-preset-{j}"));
                        db_clone.save(&preset).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(db.list().unwrap().len(), 50, "All 50 presets should be saved");
    }

    #[test]
    fn test_concurrent_reads() {
        let db = Arc::new(create_test_db());
        db.save(&create_test_preset("shared")).unwrap();

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let db_clone = Arc::clone(&db);
                thread::spawn(move || {
                    for _ in 0..10 {
                        let preset = db_clone.get("shared").unwrap();
                        assert_eq!(preset.config.direction, Direction::Rtl);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }
    }
}

// =============================================================================
// Edge Cases
// =============================================================================

mod edge_cases {
    use super::*;

    #[test]
    fn test_unicode_preset_name() {
        let db = create_test_db();
        db.save(&create_test_preset("עברית 字幕")).unwrap();
        assert_eq!(db.get("עברית 字幕").unwrap().name, "עברית 字幕");
    }

    #[test]
    fn test_name_is_trimmed() {
        let db = create_test_db();
        db.save(&create_test_preset("  padded  ")).unwrap();
        assert!(db.get("padded").is_ok());
    }
}
