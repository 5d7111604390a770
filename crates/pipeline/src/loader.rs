//! Storage-first fetch strategy.
//!
//! [`StorageFirstLoader::load`] serves whatever the local store holds and
//! only consults the remote source when the store is empty (cold start),
//! persisting what it fetched before returning it. Once any data exists
//! locally the remote is never asked again by this operation.
//!
//! Loads are single-flight: a call made while another is running returns
//! `Ok(None)` immediately instead of waiting for or duplicating the work.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

/// The storage and remote halves a [`StorageFirstLoader`] coordinates.
///
/// `fetch_stored` must return records ascending by identity.
#[async_trait]
pub trait DataLoader: Send + Sync {
    /// Record shape held in the local store.
    type Stored: Send + Sync;
    /// Record shape returned by the remote source.
    type Remote: Send;
    /// Display model handed to callers.
    type View: Send;
    type Error: Send;

    async fn fetch_stored(&self) -> Result<Vec<Self::Stored>, Self::Error>;

    async fn fetch_remote(&self) -> Result<Vec<Self::Remote>, Self::Error>;

    async fn store(&self, items: &[Self::Stored]) -> Result<(), Self::Error>;

    fn to_view(&self, item: &Self::Stored) -> Self::View;

    fn to_stored(&self, item: Self::Remote) -> Self::Stored;
}

/// Holds the loading flag for the lifetime of one load and clears it on
/// drop, whichever way the load exits.
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoadingGuard<'a> {
    /// Set the flag, or return `None` if it is already set.
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Single-flight storage-first loader over a [`DataLoader`].
pub struct StorageFirstLoader<L> {
    loader: L,
    loading: AtomicBool,
}

impl<L: DataLoader> StorageFirstLoader<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            loading: AtomicBool::new(false),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Whether a load is currently running.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Run one storage-first load.
    ///
    /// Returns `Ok(None)` when another load is already in flight. Storage
    /// and remote failures propagate; nothing is silently replaced by an
    /// empty result.
    pub async fn load(&self) -> Result<Option<Vec<L::View>>, L::Error> {
        let Some(_guard) = LoadingGuard::acquire(&self.loading) else {
            tracing::debug!("Load already in progress, skipping");
            return Ok(None);
        };

        let stored = self.loader.fetch_stored().await?;
        if !stored.is_empty() {
            tracing::debug!(count = stored.len(), "Serving records from storage");
            return Ok(Some(self.views(&stored)));
        }

        tracing::info!("Storage empty, fetching from remote");
        let remote = self.loader.fetch_remote().await?;
        let fetched: Vec<L::Stored> = remote
            .into_iter()
            .map(|item| self.loader.to_stored(item))
            .collect();

        self.loader.store(&fetched).await?;
        tracing::info!(count = fetched.len(), "Persisted remote records");

        Ok(Some(self.views(&fetched)))
    }

    fn views(&self, items: &[L::Stored]) -> Vec<L::View> {
        items.iter().map(|item| self.loader.to_view(item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};

    use tokio::sync::Notify;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum FakeError {
        Storage,
        Remote,
    }

    /// In-memory store of ids with a scriptable remote.
    #[derive(Default)]
    struct FakeLoader {
        stored: Mutex<Vec<i64>>,
        remote: Vec<i64>,
        remote_fails: bool,
        storage_fails: bool,
        remote_calls: AtomicUsize,
        /// When set, `fetch_remote` signals `entered` and parks on `release`.
        gated: bool,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl DataLoader for FakeLoader {
        type Stored = i64;
        type Remote = i64;
        type View = String;
        type Error = FakeError;

        async fn fetch_stored(&self) -> Result<Vec<i64>, FakeError> {
            if self.storage_fails {
                return Err(FakeError::Storage);
            }
            let mut stored = self.stored.lock().unwrap().clone();
            stored.sort_unstable();
            Ok(stored)
        }

        async fn fetch_remote(&self) -> Result<Vec<i64>, FakeError> {
            self.remote_calls.fetch_add(1, Ordering::SeqCst);
            if self.gated {
                self.entered.notify_one();
                self.release.notified().await;
            }
            if self.remote_fails {
                return Err(FakeError::Remote);
            }
            Ok(self.remote.clone())
        }

        async fn store(&self, items: &[i64]) -> Result<(), FakeError> {
            self.stored.lock().unwrap().extend_from_slice(items);
            Ok(())
        }

        fn to_view(&self, item: &i64) -> String {
            format!("#{item}")
        }

        fn to_stored(&self, item: i64) -> i64 {
            item
        }
    }

    fn views(ids: &[i64]) -> Vec<String> {
        ids.iter().map(|id| format!("#{id}")).collect()
    }

    #[tokio::test]
    async fn storage_wins_over_remote() {
        let loader = StorageFirstLoader::new(FakeLoader {
            stored: Mutex::new(vec![3, 1]),
            remote: vec![7, 8, 9],
            ..FakeLoader::default()
        });

        let result = loader.load().await.unwrap();

        assert_eq!(result, Some(views(&[1, 3])));
        assert_eq!(loader.loader().remote_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cold_start_fetches_and_persists() {
        let loader = StorageFirstLoader::new(FakeLoader {
            remote: vec![1, 2],
            ..FakeLoader::default()
        });

        assert_eq!(loader.load().await.unwrap(), Some(views(&[1, 2])));
        assert_eq!(*loader.loader().stored.lock().unwrap(), vec![1, 2]);

        // Second load is served from storage.
        assert_eq!(loader.load().await.unwrap(), Some(views(&[1, 2])));
        assert_eq!(loader.loader().remote_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_remote_yields_empty_views() {
        let loader = StorageFirstLoader::new(FakeLoader::default());

        assert_eq!(loader.load().await.unwrap(), Some(vec![]));
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn failures_propagate_and_reset_flag() {
        let remote_down = StorageFirstLoader::new(FakeLoader {
            remote_fails: true,
            ..FakeLoader::default()
        });
        assert_eq!(remote_down.load().await, Err(FakeError::Remote));
        assert!(!remote_down.is_loading());
        assert!(remote_down.loader().stored.lock().unwrap().is_empty());

        // The flag was released, so a retry runs again.
        assert_eq!(remote_down.load().await, Err(FakeError::Remote));
        assert_eq!(remote_down.loader().remote_calls.load(Ordering::SeqCst), 2);

        let storage_down = StorageFirstLoader::new(FakeLoader {
            storage_fails: true,
            remote: vec![1],
            ..FakeLoader::default()
        });
        assert_eq!(storage_down.load().await, Err(FakeError::Storage));
        assert!(!storage_down.is_loading());
        assert_eq!(storage_down.loader().remote_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_load_is_skipped() {
        let loader = Arc::new(StorageFirstLoader::new(FakeLoader {
            remote: vec![4, 5],
            gated: true,
            ..FakeLoader::default()
        }));

        let first = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load().await }
        });
        loader.loader().entered.notified().await;

        assert!(loader.is_loading());
        assert_eq!(loader.load().await, Ok(None));

        loader.loader().release.notify_one();
        assert_eq!(first.await.unwrap(), Ok(Some(views(&[4, 5]))));
        assert!(!loader.is_loading());
        assert_eq!(loader.loader().remote_calls.load(Ordering::SeqCst), 1);
    }
}
