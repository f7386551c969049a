//! Integration tests for the session store against instrumented stores.
//!
//! `RecordingStore` counts every call and can be told to fail, which lets
//! these tests check what the unit tests can't: whether a rejected
//! operation touched storage at all, and what happens when storage breaks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use rollcall_profile::{ProfileFields, field};
use rollcall_session::{Outcome, SessionConfig, SessionError, SessionStore};
use rollcall_store::{KeyValueStore, MemoryStore, StorageError};
use tokio::sync::Notify;

// =========================================================================
// Instrumented stores
// =========================================================================

/// Wraps a `MemoryStore`, counting reads and writes (`set` + `remove`),
/// with switches to make either kind fail.
#[derive(Clone, Default)]
struct RecordingStore {
    inner: MemoryStore,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl RecordingStore {
    fn over(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn injected() -> StorageError {
        StorageError::Unavailable("injected failure".into())
    }
}

impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }
        self.inner.remove(key).await
    }
}

/// A store whose `set` doesn't finish until the test opens the gate.
#[derive(Clone, Default)]
struct GatedStore {
    inner: MemoryStore,
    gate: Arc<Notify>,
}

impl KeyValueStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.gate.notified().await;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key).await
    }
}

// =========================================================================
// Helpers
// =========================================================================

async fn ready<S: KeyValueStore>(store: S) -> SessionStore<S> {
    let session = SessionStore::new(store, SessionConfig::default());
    session.initialize().await;
    session
}

/// A second "run of the app" over the same durable storage.
async fn restart(memory: &MemoryStore) -> SessionStore<MemoryStore> {
    ready(memory.clone()).await
}

// =========================================================================
// Rejected operations never touch storage
// =========================================================================

#[tokio::test]
async fn test_invalid_sign_in_makes_no_persistence_call() {
    let store = RecordingStore::default();
    let session = ready(store.clone()).await;

    for candidate in [
        ProfileFields::student("A"),
        ProfileFields::new().set(field::NAME, 5),
        ProfileFields::student("Jo").with_year(0),
        ProfileFields::admin(" "),
    ] {
        let result = session.sign_in(candidate).await;
        assert!(matches!(result, Err(SessionError::Invalid(_))));
    }

    assert_eq!(store.writes(), 0);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_update_while_signed_out_makes_no_persistence_call() {
    let store = RecordingStore::default();
    let session = ready(store.clone()).await;

    let outcome = Outcome::from(session.update_profile(ProfileFields::student("Jo")).await);

    assert_eq!(
        outcome,
        Outcome {
            success: false,
            errors: None
        }
    );
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_invalid_update_makes_no_persistence_call() {
    let store = RecordingStore::default();
    let session = ready(store.clone()).await;
    session.sign_in(ProfileFields::student("Jo")).await.unwrap();
    let writes_after_sign_in = store.writes();
    let before = session.profile();

    let outcome = Outcome::from(session.update_profile(ProfileFields::new().with_year(5)).await);

    assert!(!outcome.success);
    assert!(outcome.errors.unwrap().contains(field::YEAR));
    assert_eq!(store.writes(), writes_after_sign_in);
    assert_eq!(session.profile(), before);
}

// =========================================================================
// Successful operations persist exactly once
// =========================================================================

#[tokio::test]
async fn test_each_mutation_persists_once() {
    let store = RecordingStore::default();
    let session = ready(store.clone()).await;

    session.sign_in(ProfileFields::student("Jo")).await.unwrap();
    assert_eq!(store.writes(), 1);

    session
        .update_profile(ProfileFields::new().with_branch("ECE"))
        .await
        .unwrap();
    assert_eq!(store.writes(), 2);

    session.sign_out().await;
    assert_eq!(store.writes(), 3);
}

// =========================================================================
// Restart round-trips
// =========================================================================

#[tokio::test]
async fn test_sign_in_survives_restart() {
    let memory = MemoryStore::new();
    let first = ready(memory.clone()).await;
    let signed_in = first
        .sign_in(
            ProfileFields::student("Priya")
                .with_roll_number("21CS042")
                .with_year(4),
        )
        .await
        .unwrap();

    let second = restart(&memory).await;

    assert!(!second.is_loading());
    assert_eq!(second.profile(), Some(signed_in));
    assert!(second.is_student());
}

#[tokio::test]
async fn test_admin_survives_restart() {
    let memory = MemoryStore::new();
    let first = ready(memory.clone()).await;
    let admin = first.sign_in(ProfileFields::admin("Dean")).await.unwrap();

    let second = restart(&memory).await;

    assert_eq!(second.profile(), Some(admin));
    assert_eq!(second.role_label(), "Admin");
}

#[tokio::test]
async fn test_update_survives_restart() {
    let memory = MemoryStore::new();
    let first = ready(memory.clone()).await;
    first.sign_in(ProfileFields::student("Jo")).await.unwrap();
    let updated = first
        .update_profile(ProfileFields::new().with_year(2))
        .await
        .unwrap();

    let second = restart(&memory).await;

    assert_eq!(second.profile(), Some(updated));
}

#[tokio::test]
async fn test_sign_out_survives_restart() {
    let memory = MemoryStore::new();
    let first = ready(memory.clone()).await;
    first.sign_in(ProfileFields::student("Jo")).await.unwrap();
    first.sign_out().await;

    let second = restart(&memory).await;

    assert!(!second.is_authenticated());
    assert_eq!(second.display_name(), "Guest");
    assert!(memory.is_empty().await);
}

#[tokio::test]
async fn test_custom_storage_key_is_used() {
    let memory = MemoryStore::new();
    let config = SessionConfig {
        storage_key: "campus.session".into(),
    };
    let session = SessionStore::new(memory.clone(), config);
    session.initialize().await;

    session.sign_in(ProfileFields::student("Jo")).await.unwrap();

    assert!(memory.contains("campus.session").await);
    assert!(!memory.contains(rollcall_session::DEFAULT_STORAGE_KEY).await);
}

// =========================================================================
// Storage failures
// =========================================================================

#[tokio::test]
async fn test_read_failure_restores_nobody() {
    let memory = MemoryStore::new();
    ready(memory.clone())
        .await
        .sign_in(ProfileFields::student("Jo"))
        .await
        .unwrap();

    let failing = RecordingStore::over(memory);
    failing.fail_reads();
    let session = ready(failing.clone()).await;

    assert_eq!(failing.reads(), 1);
    assert!(!session.is_loading());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_corrupt_record_restores_nobody() {
    let memory = MemoryStore::new();
    memory
        .set(rollcall_session::DEFAULT_STORAGE_KEY, b"{\"name\":".to_vec())
        .await
        .unwrap();

    let session = restart(&memory).await;

    assert!(!session.is_loading());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_write_failure_still_signs_in_but_diverges() {
    let store = RecordingStore::default();
    store.fail_writes();
    let session = ready(store.clone()).await;

    let outcome = Outcome::from(session.sign_in(ProfileFields::student("Jo")).await);

    // The caller is told it worked, and for this run it did...
    assert!(outcome.success);
    assert!(session.is_student());
    // ...but nothing reached storage, so the next run starts signed out.
    let next_run = restart(&store.inner).await;
    assert!(!next_run.is_authenticated());
}

#[tokio::test]
async fn test_sign_out_with_failing_storage_still_signs_out() {
    let store = RecordingStore::default();
    let session = ready(store.clone()).await;
    session.sign_in(ProfileFields::student("Jo")).await.unwrap();
    store.fail_writes();

    assert!(session.sign_out().await);

    assert!(!session.is_authenticated());
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test]
async fn test_reads_are_not_blocked_by_slow_save() {
    let store = GatedStore::default();
    let session = Arc::new(ready(store.clone()).await);

    let task = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.sign_in(ProfileFields::student("Jo")).await })
    };

    // The save is parked on the gate, yet the new user is already visible.
    tokio::time::timeout(Duration::from_secs(5), async {
        while !session.is_authenticated() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("memory should update before the save completes");
    assert!(!task.is_finished());
    assert!(!store.inner.contains(rollcall_session::DEFAULT_STORAGE_KEY).await);

    store.gate.notify_one();
    let profile = task.await.unwrap().unwrap();

    assert_eq!(session.profile(), Some(profile));
    assert!(store.inner.contains(rollcall_session::DEFAULT_STORAGE_KEY).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sign_ins_leave_memory_and_storage_agreeing() {
    let memory = MemoryStore::new();
    let session = Arc::new(ready(memory.clone()).await);

    let mut tasks = Vec::new();
    for i in 0..16 {
        let session = Arc::clone(&session);
        tasks.push(tokio::spawn(async move {
            session
                .sign_in(ProfileFields::student(format!("Student {i}")))
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let next_run = restart(&memory).await;
    assert_eq!(next_run.profile(), session.profile());
}
