use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::sync::OwnedMutexGuard;

/// A guarded create found its natural key already taken.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Duplicate key: {0}")]
pub struct DuplicateKey(pub String);

/// Per-key mutual exclusion around "check existence, then insert".
///
/// Creations sharing a key are serialized; creations on different keys never
/// wait on each other. An entry lives in the table only while some caller
/// holds or awaits its lock, so distinct keys do not accumulate.
#[derive(Debug, Default)]
pub struct CreationGuard {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Exclusive hold on one key. Dropping it releases the key.
pub struct KeyLease<'a> {
    permit: Option<OwnedMutexGuard<()>>,
    slot: KeySlot<'a>,
}

/// Interest in one table entry, registered before waiting on its lock.
///
/// Dropping it evicts the entry once nobody else references the lock, both
/// after a release and when a waiting caller is cancelled.
struct KeySlot<'a> {
    table: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
}

impl CreationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds `key`, then hold it.
    pub async fn lock(&self, key: &str) -> KeyLease<'_> {
        let slot = KeySlot {
            table: &self.locks,
            key: key.to_owned(),
        };
        // The shard lock must not be held across the await below.
        let handle = Arc::clone(self.locks.entry(key.to_owned()).or_default().value());
        // On cancellation the pending acquire (and its handle) drops before `slot`.
        let permit = handle.lock_owned().await;

        KeyLease {
            permit: Some(permit),
            slot,
        }
    }

    /// Run `check_exists` then `do_insert` while holding `key`.
    ///
    /// # Errors
    /// * `DuplicateKey` (converted into `E`) - `check_exists` returned true
    /// * Any error from `check_exists` or `do_insert`, unchanged
    pub async fn guarded_create<T, E, C, CF, I, IF>(
        &self,
        key: &str,
        check_exists: C,
        do_insert: I,
    ) -> Result<T, E>
    where
        E: From<DuplicateKey>,
        C: FnOnce() -> CF,
        CF: Future<Output = Result<bool, E>>,
        I: FnOnce() -> IF,
        IF: Future<Output = Result<T, E>>,
    {
        let _lease = self.lock(key).await;

        if check_exists().await? {
            tracing::debug!(key = %key, "Guarded create rejected duplicate");
            return Err(DuplicateKey(key.to_owned()).into());
        }

        do_insert().await
    }

    /// Number of keys currently held or awaited.
    pub fn tracked_keys(&self) -> usize {
        self.locks.len()
    }
}

impl KeyLease<'_> {
    pub fn key(&self) -> &str {
        &self.slot.key
    }
}

impl Drop for KeyLease<'_> {
    fn drop(&mut self) {
        // Release before `slot` drops so its eviction check sees the permit gone.
        drop(self.permit.take());
    }
}

impl Drop for KeySlot<'_> {
    fn drop(&mut self) {
        // Only the table itself still references the lock: nobody is waiting.
        self.table
            .remove_if(&self.key, |_, handle| Arc::strong_count(handle) == 1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use std::time::Instant;

    use tokio::sync::Barrier;

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum TestError {
        Duplicate,
        Insert,
    }

    impl From<DuplicateKey> for TestError {
        fn from(_: DuplicateKey) -> Self {
            TestError::Duplicate
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_key_admits_exactly_one_insert() {
        const CALLERS: usize = 16;

        let guard = Arc::new(CreationGuard::new());
        let rows = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(CALLERS));

        let tasks: Vec<_> = (0..CALLERS)
            .map(|_| {
                let guard = Arc::clone(&guard);
                let rows = Arc::clone(&rows);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    guard
                        .guarded_create(
                            "category:skincare",
                            || async { Ok::<_, TestError>(rows.load(Ordering::SeqCst) > 0) },
                            || async {
                                // Widen the window between check and insert.
                                tokio::time::sleep(Duration::from_millis(5)).await;
                                rows.fetch_add(1, Ordering::SeqCst);
                                Ok::<_, TestError>(())
                            },
                        )
                        .await
                })
            })
            .collect();

        let mut created = 0;
        let mut duplicates = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => created += 1,
                Err(TestError::Duplicate) => duplicates += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, CALLERS - 1);
        assert_eq!(rows.load(Ordering::SeqCst), 1);
        assert_eq!(guard.tracked_keys(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_keys_run_in_parallel() {
        const KEYS: usize = 8;
        let delay = Duration::from_millis(100);

        let guard = Arc::new(CreationGuard::new());
        let started = Instant::now();

        let tasks: Vec<_> = (0..KEYS)
            .map(|i| {
                let guard = Arc::clone(&guard);
                tokio::spawn(async move {
                    guard
                        .guarded_create(
                            &format!("category:name{}", i),
                            || async { Ok::<_, TestError>(false) },
                            || async {
                                tokio::time::sleep(delay).await;
                                Ok::<_, TestError>(i)
                            },
                        )
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        // Serialized execution would take KEYS * delay.
        assert!(started.elapsed() < delay * 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_at_most_one_caller_inside_per_key() {
        let guard = Arc::new(CreationGuard::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..12)
            .map(|_| {
                let guard = Arc::clone(&guard);
                let inside = Arc::clone(&inside);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    let _lease = guard.lock("account:alice@example.com").await;
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lock_released_after_insert_error() {
        let guard = CreationGuard::new();

        let failed: Result<(), TestError> = guard
            .guarded_create(
                "category:makeup",
                || async { Ok(false) },
                || async { Err(TestError::Insert) },
            )
            .await;
        assert_eq!(failed, Err(TestError::Insert));
        assert_eq!(guard.tracked_keys(), 0);

        // A second attempt is not blocked by the first.
        let retried = tokio::time::timeout(
            Duration::from_secs(1),
            guard.guarded_create(
                "category:makeup",
                || async { Ok::<_, TestError>(false) },
                || async { Ok(()) },
            ),
        )
        .await;
        assert_eq!(retried.unwrap(), Ok(()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_lock_released_after_panic() {
        let guard = Arc::new(CreationGuard::new());

        let panicking = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move {
                let _lease = guard.lock("category:haircare").await;
                panic!("insert blew up");
            })
        };
        assert!(panicking.await.is_err());

        let lease = tokio::time::timeout(Duration::from_secs(1), guard.lock("category:haircare"))
            .await
            .expect("lock leaked after panic");
        assert_eq!(lease.key(), "category:haircare");
        drop(lease);
        assert_eq!(guard.tracked_keys(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_shares_one_lock() {
        let guard = Arc::new(CreationGuard::new());
        let barrier = Arc::new(Barrier::new(8));
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let guard = Arc::clone(&guard);
                let barrier = Arc::clone(&barrier);
                let inside = Arc::clone(&inside);
                let peak = Arc::clone(&peak);
                tokio::spawn(async move {
                    barrier.wait().await;
                    let _lease = guard.lock("category:fresh").await;
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(guard.tracked_keys(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_leak_entry() {
        let guard = Arc::new(CreationGuard::new());
        let holder = guard.lock("account:jane@example.com").await;

        let waiter = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move {
                let _lease = guard.lock("account:jane@example.com").await;
            })
        };
        // Let the waiter queue behind the holder.
        tokio::task::yield_now().await;
        assert_eq!(guard.tracked_keys(), 1);

        drop(holder);
        // The waiter still holds a handle, so the entry survives the release.
        assert_eq!(guard.tracked_keys(), 1);

        waiter.abort();
        let _ = waiter.await;

        assert_eq!(guard.tracked_keys(), 0);
    }

    #[tokio::test]
    async fn test_waiter_cancelled_while_key_held() {
        let guard = Arc::new(CreationGuard::new());
        let holder = guard.lock("category:skincare").await;

        let waiter = {
            let guard = Arc::clone(&guard);
            tokio::spawn(async move {
                let _lease = guard.lock("category:skincare").await;
            })
        };
        tokio::task::yield_now().await;

        waiter.abort();
        assert!(waiter.await.unwrap_err().is_cancelled());
        assert_eq!(guard.tracked_keys(), 1);

        drop(holder);
        assert_eq!(guard.tracked_keys(), 0);

        let lease = tokio::time::timeout(Duration::from_secs(1), guard.lock("category:skincare"))
            .await
            .expect("key still held after cancelled waiter");
        drop(lease);
        assert_eq!(guard.tracked_keys(), 0);
    }
}
