//! Temp-storage backed content table
//!
//! [`ContentStore`] maps a [`ContentId`] to a file inside a private temp
//! directory. A [`FileValue`] only carries the identity; resolving it back to
//! bytes goes through [`ContentStore::materialize`].
//!
//! # Consistency
//!
//! - The identity table sits behind one mutex that is never held across an
//!   `.await`.
//! - `store` registers an identity only after its backing file has been fully
//!   written and renamed into place. Dropping the future earlier leaves the
//!   table untouched and removes the staging file.
//! - Each entry owns an async once-cell. Concurrent `materialize` calls for the
//!   same identity wait on a single backing read; later calls are served from
//!   the cell.

use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::hash_map::Entry as Slot;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use varinterop_value::{ContentId, FileValue};

use crate::config::ContentStoreConfig;
use crate::error::{ContentError, Result};
use crate::identity::content_id;

/// Counters reported by [`ContentStore::stats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentStats {
    /// Registered identities
    pub entries: usize,
    /// Sum of the registered content sizes
    pub stored_bytes: u64,
    /// Reads that went to the backing file
    pub backing_reads: u64,
    /// `materialize` calls answered from an already-filled cache
    pub cache_hits: u64,
}

struct Entry {
    path: PathBuf,
    size: u64,
    content: OnceCell<Bytes>,
}

impl Entry {
    fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            content: OnceCell::new(),
        }
    }
}

struct Inner {
    config: ContentStoreConfig,
    entries: Mutex<HashMap<ContentId, Arc<Entry>>>,
    backing_reads: AtomicU64,
    cache_hits: AtomicU64,
    // Dropped last: removes every backing file.
    dir: TempDir,
}

/// Owner of file-backed value content
///
/// Cloning is cheap and every clone shares the same table. The temp directory
/// is deleted when the last clone is dropped.
#[derive(Clone)]
pub struct ContentStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("dir", &self.inner.dir.path())
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

/// Removes a staging file unless disarmed.
struct Staging {
    path: Option<PathBuf>,
}

impl Staging {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    fn disarm(&mut self) {
        self.path = None;
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        // Drop runs on a runtime worker when a store future is abandoned.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_staging(&path));
            }
            Err(_) => remove_staging(&path),
        }
    }
}

fn remove_staging(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove staging file");
        }
    }
}

async fn remove_backing(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove backing file");
        }
    }
}

impl ContentStore {
    /// Create a store with a fresh private temp directory
    pub fn new(config: ContentStoreConfig) -> Result<Self> {
        config.validate()?;

        let dir = tempfile::Builder::new()
            .prefix(&config.prefix)
            .tempdir_in(config.resolved_root())
            .map_err(|e| ContentError::io("create temp directory", e))?;

        tracing::debug!(dir = %dir.path().display(), "Content store created");

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                entries: Mutex::new(HashMap::new()),
                backing_reads: AtomicU64::new(0),
                cache_hits: AtomicU64::new(0),
                dir,
            }),
        })
    }

    /// Private temp directory holding the backing files
    pub fn dir(&self) -> &Path {
        self.inner.dir.path()
    }

    /// Active configuration
    pub fn config(&self) -> &ContentStoreConfig {
        &self.inner.config
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: &ContentId) -> bool {
        self.inner.entries.lock().contains_key(id)
    }

    /// Number of registered identities
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.inner.entries.lock().is_empty()
    }

    /// Snapshot of the store counters
    pub fn stats(&self) -> ContentStats {
        let (entries, stored_bytes) = {
            let entries = self.inner.entries.lock();
            (entries.len(), entries.values().map(|e| e.size).sum())
        };

        ContentStats {
            entries,
            stored_bytes,
            backing_reads: self.inner.backing_reads.load(Ordering::Relaxed),
            cache_hits: self.inner.cache_hits.load(Ordering::Relaxed),
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        io: impl Future<Output = std::io::Result<T>>,
    ) -> Result<T> {
        let result = match self.inner.config.io_timeout {
            Some(after) => tokio::time::timeout(after, io)
                .await
                .map_err(|_| ContentError::Timeout { operation, after })?,
            None => io.await,
        };
        result.map_err(|source| ContentError::io(operation, source))
    }

    // ========================================================================
    // Store
    // ========================================================================

    /// Persist `data` and return a value referencing it
    ///
    /// The identity is the SHA-256 of the bytes. Storing content that is
    /// already registered writes nothing and returns a value carrying the
    /// requested MIME type.
    pub async fn store(
        &self,
        data: impl Into<Bytes>,
        mime_type: impl Into<String>,
    ) -> Result<FileValue> {
        let data: Bytes = data.into();
        let file = FileValue::new(content_id(&data), mime_type);
        let id = *file.id();

        if self.contains(&id) {
            tracing::debug!(id = %id.short(12), "Content already stored");
            return Ok(file);
        }

        let name = format!("{}.{}", id.to_hex(), Uuid::new_v4().simple());
        let target = self.dir().join(&name);
        let mut staging = Staging::new(self.dir().join(format!("{name}.partial")));

        self.bounded("write", tokio::fs::write(staging.path(), &data))
            .await?;
        self.bounded("rename", tokio::fs::rename(staging.path(), &target))
            .await?;
        staging.disarm();

        let registered = match self.inner.entries.lock().entry(id) {
            Slot::Occupied(_) => false,
            Slot::Vacant(slot) => {
                slot.insert(Arc::new(Entry::new(target.clone(), data.len() as u64)));
                true
            }
        };

        if registered {
            tracing::debug!(id = %id.short(12), size = data.len(), "Stored content");
        } else {
            // Lost a race with a concurrent store of the same bytes.
            remove_backing(&target).await;
        }

        Ok(file)
    }

    /// Store the contents of an existing file
    pub async fn import_file(
        &self,
        path: impl AsRef<Path>,
        mime_type: impl Into<String>,
    ) -> Result<FileValue> {
        let data = self.bounded("import", tokio::fs::read(path.as_ref())).await?;
        self.store(data, mime_type).await
    }

    // ========================================================================
    // Materialize
    // ========================================================================

    /// Resolve `file` to its bytes
    ///
    /// Fails with [`ContentError::ContentUnavailable`] when the identity is not
    /// registered or its backing file has disappeared.
    pub async fn materialize(&self, file: &FileValue) -> Result<Bytes> {
        let id = *file.id();
        let entry = self.inner.entries.lock().get(&id).cloned();
        let Some(entry) = entry else {
            return Err(ContentError::ContentUnavailable { id });
        };

        if let Some(bytes) = entry.content.get() {
            self.inner.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(bytes.clone());
        }

        let loaded = entry
            .content
            .get_or_try_init(|| async {
                self.inner.backing_reads.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(id = %id.short(12), "Reading backing file");
                self.bounded("read", tokio::fs::read(&entry.path))
                    .await
                    .map(Bytes::from)
            })
            .await;

        match loaded {
            Ok(bytes) => Ok(bytes.clone()),
            Err(ContentError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::warn!(id = %id.short(12), "Backing file vanished, evicting");
                self.evict_if_same(&id, &entry);
                Err(ContentError::ContentUnavailable { id })
            }
            Err(e) => Err(e),
        }
    }

    /// [`materialize`](Self::materialize), abandoned when `cancel` fires
    ///
    /// An abandoned read leaves the entry as it was; a later call starts over
    /// or hits whatever another caller cached.
    pub async fn materialize_with_cancel(
        &self,
        file: &FileValue,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ContentError::Cancelled { operation: "materialize" }),
            result = self.materialize(file) => result,
        }
    }

    /// Write the content of `file` to `dest`
    pub async fn export(&self, file: &FileValue, dest: impl AsRef<Path>) -> Result<u64> {
        let bytes = self.materialize(file).await?;
        self.bounded("export", tokio::fs::write(dest.as_ref(), &bytes))
            .await?;
        Ok(bytes.len() as u64)
    }

    // ========================================================================
    // Eviction
    // ========================================================================

    fn evict_if_same(&self, id: &ContentId, entry: &Arc<Entry>) {
        let mut entries = self.inner.entries.lock();
        if entries.get(id).is_some_and(|current| Arc::ptr_eq(current, entry)) {
            entries.remove(id);
        }
    }

    /// Drop `id` and delete its backing file
    ///
    /// Advisory: returns `false` when nothing was registered. Readers already
    /// holding the cached bytes keep them.
    pub async fn release(&self, id: &ContentId) -> bool {
        let removed = self.inner.entries.lock().remove(id);
        match removed {
            Some(entry) => {
                remove_backing(&entry.path).await;
                tracing::debug!(id = %id.short(12), "Released content");
                true
            }
            None => false,
        }
    }

    /// Evict every identity not in `live` and return how many were evicted
    pub async fn sweep(&self, live: &HashSet<ContentId>) -> usize {
        let evicted: Vec<Arc<Entry>> = {
            let mut entries = self.inner.entries.lock();
            let dead: Vec<ContentId> = entries
                .keys()
                .filter(|id| !live.contains(id))
                .copied()
                .collect();
            dead.iter().filter_map(|id| entries.remove(id)).collect()
        };

        for entry in &evicted {
            remove_backing(&entry.path).await;
        }

        tracing::info!(evicted = evicted.len(), remaining = self.len(), "Swept content store");
        evicted.len()
    }
}
