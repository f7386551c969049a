//! Integration tests for the file-backed store.
//!
//! These use a real directory under the system temp dir, so they exercise
//! the actual `tokio::fs` calls rather than a mock.

#[cfg(feature = "fs")]
mod file_store {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    use rollcall_store::{FileStore, KeyValueStore, StorageError};

    static NEXT_DIR: AtomicU32 = AtomicU32::new(0);

    /// A fresh, not-yet-existing directory per test.
    fn scratch_dir(name: &str) -> PathBuf {
        let n = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "rollcall-store-{name}-{}-{n}",
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_open_creates_missing_directory() {
        let dir = scratch_dir("open").join("nested");

        let store = FileStore::open(&dir).await.expect("should open");

        assert!(store.dir().is_dir());
        let _ = tokio::fs::remove_dir_all(dir.parent().unwrap()).await;
    }

    #[tokio::test]
    async fn test_set_get_remove_cycle() {
        let dir = scratch_dir("cycle");
        let store = FileStore::open(&dir).await.unwrap();

        assert_eq!(store.get("session").await.unwrap(), None);

        store.set("session", b"first".to_vec()).await.unwrap();
        store.set("session", b"second".to_vec()).await.unwrap();
        assert_eq!(
            store.get("session").await.unwrap(),
            Some(b"second".to_vec())
        );

        store.remove("session").await.unwrap();
        assert_eq!(store.get("session").await.unwrap(), None);

        // Removing again is not an error.
        store.remove("session").await.unwrap();

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        // Two FileStore instances over one directory stand in for two
        // runs of the application.
        let dir = scratch_dir("reopen");
        {
            let store = FileStore::open(&dir).await.unwrap();
            store.set("rollcall.current_user", b"{}".to_vec()).await.unwrap();
        }

        let reopened = FileStore::open(&dir).await.unwrap();

        assert_eq!(
            reopened.get("rollcall.current_user").await.unwrap(),
            Some(b"{}".to_vec())
        );
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_set_leaves_no_temp_files() {
        let dir = scratch_dir("temp");
        let store = FileStore::open(&dir).await.unwrap();

        store.set("k", b"v".to_vec()).await.unwrap();

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["k".to_string()]);
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_open_removes_stale_temp_files() {
        let dir = scratch_dir("stale");
        {
            let store = FileStore::open(&dir).await.unwrap();
            store.set("session", b"kept".to_vec()).await.unwrap();
        }
        // What a crash between the write and the rename leaves behind.
        tokio::fs::write(dir.join(".session.7.tmp"), b"half")
            .await
            .unwrap();

        let reopened = FileStore::open(&dir).await.unwrap();

        assert!(!dir.join(".session.7.tmp").exists());
        assert_eq!(
            reopened.get("session").await.unwrap(),
            Some(b"kept".to_vec())
        );
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_invalid_key_rejected_on_every_operation() {
        let dir = scratch_dir("badkey");
        let store = FileStore::open(&dir).await.unwrap();

        assert!(matches!(
            store.get("../x").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("a/b", Vec::new()).await,
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.remove("").await,
            Err(StorageError::InvalidKey(_))
        ));
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
