//! Sync coordinator.
//!
//! Drives one operation at a time through
//! `FetchingCollection → DecodingCollection → FetchingImages → Persisting →
//! ReadingBack` and reports a single terminal outcome. Poster fetches are
//! best effort and run concurrently, at most [`POSTER_CONCURRENCY`] at a
//! time; all of them settle before anything is written.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::stream::{self, StreamExt};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::codec::{decode_many_bytes, decode_one_bytes};
use crate::fetch::Fetcher;
use crate::model::Movie;
use crate::storage::{SqliteStorage, StoreError, StoreResult};

use super::types::{AddOutcome, PersistMode, SyncError, SyncPhase, SyncResult};

/// Maximum number of poster requests in flight during one sync.
pub const POSTER_CONCURRENCY: usize = 8;

/// Coordinates fetch, decode, image loading and persistence.
///
/// The store handle is injected; the coordinator never opens a database on
/// its own. Only one `sync_*` / `add_single` call may be outstanding at a
/// time; overlapping calls fail with [`SyncError::Busy`].
pub struct SyncCoordinator<F: Fetcher> {
    store: Arc<Mutex<SqliteStorage>>,
    fetcher: F,
    in_flight: AtomicBool,
    phase: Mutex<SyncPhase>,
}

/// Clears the in-flight flag when an operation ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> SyncResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<F: Fetcher> SyncCoordinator<F> {
    /// Create a coordinator that owns `store`.
    pub fn new(store: SqliteStorage, fetcher: F) -> Self {
        Self::with_shared_store(Arc::new(Mutex::new(store)), fetcher)
    }

    /// Create a coordinator over a store handle shared with other readers.
    pub fn with_shared_store(store: Arc<Mutex<SqliteStorage>>, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            in_flight: AtomicBool::new(false),
            phase: Mutex::new(SyncPhase::Idle),
        }
    }

    /// Handle to the underlying store.
    pub fn store(&self) -> Arc<Mutex<SqliteStorage>> {
        Arc::clone(&self.store)
    }

    /// The fetcher this coordinator was built with.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Phase of the current (or most recent) operation.
    pub fn phase(&self) -> SyncPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True while an operation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Bulk load: fetch the collection at `endpoint`, store every movie and
    /// return the full stored collection.
    ///
    /// # Errors
    ///
    /// `FetchFailed` / `DecodeFailed` leave the store untouched.
    /// `StoreFailed` if writing fails, `ReadFailed` if reading back fails,
    /// `Busy` if another operation is running. Poster failures are never errors.
    pub async fn sync_all(&self, endpoint: &str) -> SyncResult<Vec<Movie>> {
        self.sync_collection(endpoint, PersistMode::All).await
    }

    /// Fetch the collection at `endpoint` and persist it according to `mode`.
    ///
    /// # Errors
    ///
    /// See [`Self::sync_all`].
    pub async fn sync_collection(
        &self,
        endpoint: &str,
        mode: PersistMode,
    ) -> SyncResult<Vec<Movie>> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        info!(endpoint, ?mode, "Starting collection sync");

        let result = self.run_collection(endpoint, mode).await;
        self.finish(result)
    }

    /// Fetch one movie document, load its poster and upsert it.
    ///
    /// Does not read the collection back.
    ///
    /// # Errors
    ///
    /// `FetchFailed`, `DecodeFailed`, `StoreFailed` or `Busy`.
    pub async fn sync_single(&self, record_url: &str) -> SyncResult<Movie> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        info!(url = record_url, "Starting single-movie sync");

        let result = self.run_single(record_url).await;
        self.finish(result)
    }

    /// Add a movie from a scanned QR payload.
    ///
    /// The payload must be an absolute http(s) URL; anything else is rejected
    /// before any request is made. On success the stored collection is read
    /// back alongside the added movie.
    ///
    /// # Errors
    ///
    /// `InvalidLocator` for a bad payload, otherwise as [`Self::sync_single`].
    pub async fn add_single(&self, payload: &str) -> SyncResult<AddOutcome> {
        let url = parse_locator(payload)?;
        let _guard = InFlight::acquire(&self.in_flight)?;
        info!(%url, "Adding movie from scanned locator");

        let result = async {
            let added = self.run_single(url.as_str()).await?;
            self.set_phase(SyncPhase::ReadingBack);
            let movies = self.read_store(|store| store.read_all())?;
            Ok::<_, SyncError>(AddOutcome { added, movies })
        }
        .await;

        self.finish(result)
    }

    /// Read whatever is already stored, newest release first.
    ///
    /// Works offline and while a sync is running.
    ///
    /// # Errors
    ///
    /// `ReadFailed` if the store cannot be read. An empty store is `Ok(vec![])`.
    pub fn load_local(&self) -> SyncResult<Vec<Movie>> {
        self.read_store(|store| store.read_all())
            .inspect_err(|e| warn!(error = %e, "Local store unavailable"))
    }

    /// Look up one stored movie by title.
    ///
    /// # Errors
    ///
    /// `ReadFailed` if the store cannot be read.
    pub fn load_one(&self, title: &str) -> SyncResult<Option<Movie>> {
        self.read_store(|store| store.get(title))
    }

    /// Remove every stored movie. Maintenance only; refused while a sync runs.
    ///
    /// # Errors
    ///
    /// `Busy` or `StoreFailed`.
    pub fn reset(&self) -> SyncResult<usize> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let removed = self.with_store(SqliteStorage::delete_all)?;
        info!(removed, "Cleared local store");
        Ok(removed)
    }

    async fn run_collection(&self, endpoint: &str, mode: PersistMode) -> SyncResult<Vec<Movie>> {
        self.set_phase(SyncPhase::FetchingCollection);
        let body = self
            .fetcher
            .fetch(endpoint)
            .await
            .map_err(|source| SyncError::FetchFailed {
                url: endpoint.to_string(),
                source,
            })?;

        self.set_phase(SyncPhase::DecodingCollection);
        let mut movies = decode_many_bytes(&body).map_err(|source| SyncError::DecodeFailed {
            url: endpoint.to_string(),
            source,
        })?;
        debug!(count = movies.len(), "Decoded collection");

        self.set_phase(SyncPhase::FetchingImages);
        self.attach_images(&mut movies).await;

        self.set_phase(SyncPhase::Persisting);
        let written = match mode {
            PersistMode::All => self.with_store(|store| store.upsert_many(&movies))?,
            PersistMode::FirstOnly => match movies.first() {
                Some(first) => {
                    self.with_store(|store| store.upsert(first))?;
                    1
                }
                None => 0,
            },
        };

        self.set_phase(SyncPhase::ReadingBack);
        let stored = self.read_store(|store| store.read_all())?;
        info!(fetched = movies.len(), written, stored = stored.len(), "Collection sync complete");

        Ok(stored)
    }

    async fn run_single(&self, record_url: &str) -> SyncResult<Movie> {
        self.set_phase(SyncPhase::FetchingCollection);
        let body = self
            .fetcher
            .fetch(record_url)
            .await
            .map_err(|source| SyncError::FetchFailed {
                url: record_url.to_string(),
                source,
            })?;

        self.set_phase(SyncPhase::DecodingCollection);
        let mut movie = decode_one_bytes(&body).map_err(|source| SyncError::DecodeFailed {
            url: record_url.to_string(),
            source,
        })?;

        self.set_phase(SyncPhase::FetchingImages);
        movie.image = self.load_image(&movie).await;

        self.set_phase(SyncPhase::Persisting);
        self.with_store(|store| store.upsert(&movie))?;
        info!(title = %movie.title, has_image = movie.image.is_some(), "Stored movie");

        Ok(movie)
    }

    /// Fetch posters with bounded concurrency and attach whatever arrived.
    /// Returns only after every fetch has settled.
    async fn attach_images(&self, movies: &mut [Movie]) {
        let fetches: Vec<_> = movies.iter().map(|movie| self.load_image(movie)).collect();
        let images: Vec<Option<Vec<u8>>> = stream::iter(fetches)
            .buffered(POSTER_CONCURRENCY)
            .collect()
            .await;

        let mut loaded = 0usize;
        for (movie, image) in movies.iter_mut().zip(images) {
            loaded += usize::from(image.is_some());
            movie.image = image;
        }
        debug!(loaded, total = movies.len(), "Posters settled");
    }

    async fn load_image(&self, movie: &Movie) -> Option<Vec<u8>> {
        let Some(location) = movie.image_location.as_deref() else {
            debug!(title = %movie.title, "No poster locator, using placeholder");
            return None;
        };

        match self.fetcher.fetch(location).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(title = %movie.title, url = location, error = %e, "Failed to load poster");
                None
            }
        }
    }

    fn with_store<R>(&self, f: impl FnOnce(&mut SqliteStorage) -> StoreResult<R>) -> StoreResult<R> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        f(&mut store)
    }

    fn read_store<R>(&self, f: impl FnOnce(&mut SqliteStorage) -> StoreResult<R>) -> SyncResult<R> {
        self.with_store(f).map_err(SyncError::ReadFailed)
    }

    fn set_phase(&self, phase: SyncPhase) {
        debug!(%phase, "Sync phase");
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    fn finish<T>(&self, result: SyncResult<T>) -> SyncResult<T> {
        match &result {
            Ok(_) => self.set_phase(SyncPhase::Done),
            Err(e) => {
                warn!(error = %e, "Sync failed");
                self.set_phase(SyncPhase::Failed);
            }
        }
        result
    }
}

impl<F: Fetcher + 'static> SyncCoordinator<F> {
    /// Run [`Self::sync_all`] as a tokio task; the outcome arrives on the
    /// returned channel exactly once.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_sync_all(self: &Arc<Self>, endpoint: String) -> oneshot::Receiver<SyncResult<Vec<Movie>>> {
        let (tx, rx) = oneshot::channel();
        let this = Arc::clone(self);

        tokio::spawn(async move {
            let outcome = this.sync_all(&endpoint).await;
            if tx.send(outcome).is_err() {
                debug!("Sync outcome receiver dropped");
            }
        });

        rx
    }

    /// Run [`Self::add_single`] as a tokio task; the outcome arrives on the
    /// returned channel exactly once.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_add_single(self: &Arc<Self>, payload: String) -> oneshot::Receiver<SyncResult<AddOutcome>> {
        let (tx, rx) = oneshot::channel();
        let this = Arc::clone(self);

        tokio::spawn(async move {
            let outcome = this.add_single(&payload).await;
            if tx.send(outcome).is_err() {
                debug!("Add outcome receiver dropped");
            }
        });

        rx
    }
}

/// Validate a scanned payload as an absolute http(s) URL.
fn parse_locator(payload: &str) -> SyncResult<reqwest::Url> {
    let invalid = || SyncError::InvalidLocator {
        payload: payload.to_string(),
    };

    let url = reqwest::Url::parse(payload.trim()).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(invalid()),
    }
}
