//! Concurrency, cancellation and eviction through the public API

use std::collections::HashSet;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;
use varinterop_content::{ContentError, ContentStore, ContentStoreConfig, content_id};
use varinterop_value::{FileValue, Value};

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn new_store() -> (tempfile::TempDir, ContentStore) {
    varinterop_log::init_test();
    let root = tempfile::tempdir().unwrap();
    let config = ContentStoreConfig::default()
        .with_root(root.path())
        .with_prefix("lifecycle-")
        .with_io_timeout(Duration::from_secs(30));
    (root, ContentStore::new(config).unwrap())
}

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

// ----------------------------------------------------------------------------
// Coalescing
// ----------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_materialize_reads_backing_file_once() {
    let (_root, store) = new_store();
    let data = payload(1 << 20);
    let file = store.store(data.clone(), FileValue::BINARY_MIME_TYPE).await.unwrap();

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            let file = file.clone();
            tokio::spawn(async move { store.materialize(&file).await })
        })
        .collect();

    for task in tasks {
        let bytes = task.await.unwrap().unwrap();
        assert_eq!(bytes.len(), data.len());
        assert!(bytes[..] == data[..]);
    }

    assert_eq!(store.stats().backing_reads, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_store_of_same_bytes_registers_once() {
    let (_root, store) = new_store();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.store(&b"shared"[..], "text/plain").await })
        })
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        ids.insert(*task.await.unwrap().unwrap().id());
    }

    assert_eq!(ids.len(), 1);
    assert_eq!(store.len(), 1);
    assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 1);
}

// ----------------------------------------------------------------------------
// Cancellation
// ----------------------------------------------------------------------------

#[tokio::test]
async fn cancelled_materialize_leaves_table_intact() {
    let (_root, store) = new_store();
    let file = store.store(&b"keep me"[..], "").await.unwrap();

    let token = CancellationToken::new();
    token.cancel();
    let err = store.materialize_with_cancel(&file, &token).await.unwrap_err();
    assert!(matches!(err, ContentError::Cancelled { operation: "materialize" }));

    assert!(store.contains(file.id()));
    let live = CancellationToken::new();
    let bytes = store.materialize_with_cancel(&file, &live).await.unwrap();
    assert_eq!(&bytes[..], b"keep me");
}

#[tokio::test]
async fn dropped_store_future_can_be_retried() {
    let (_root, store) = new_store();
    let data = payload(4 << 20);
    let id = content_id(&data);

    // Abandoned after at most one poll.
    let pending = store.store(data.clone(), "");
    let _ = tokio::time::timeout(Duration::from_nanos(1), pending).await;

    let file = store.store(data.clone(), "").await.unwrap();
    assert_eq!(file.id(), &id);
    assert_eq!(store.len(), 1);
    assert!(store.contains(&id));
    assert!(store.materialize(&file).await.unwrap()[..] == data[..]);
    assert_eq!(store.stats().backing_reads, 1);
}

// ----------------------------------------------------------------------------
// Failures
// ----------------------------------------------------------------------------

#[tokio::test]
async fn failed_write_registers_nothing() {
    let (_root, store) = new_store();
    let kept = store.store(&b"before"[..], "").await.unwrap();
    std::fs::remove_dir_all(store.dir()).unwrap();

    let err = store.store(&b"after"[..], "").await.unwrap_err();
    assert!(matches!(err, ContentError::Io { operation: "write", .. }), "{err}");
    assert!(!store.contains(&content_id(b"after")));
    assert_eq!(store.len(), 1);

    let err = store.materialize(&kept).await.unwrap_err();
    assert!(matches!(err, ContentError::ContentUnavailable { .. }));
    assert!(store.is_empty());
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn io_timeout_bounds_slow_imports() {
    varinterop_log::init_test();
    let root = tempfile::tempdir().unwrap();
    let limit = Duration::from_millis(50);
    let store = ContentStore::new(
        ContentStoreConfig::default()
            .with_root(root.path())
            .with_io_timeout(limit),
    )
    .unwrap();
    let kept = store.store(&b"still here"[..], "").await.unwrap();

    // Opening a FIFO for reading blocks until a writer shows up.
    let fifo = root.path().join("stalled");
    let status = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
    assert!(status.success());

    let err = store.import_file(&fifo, "").await.unwrap_err();
    assert!(
        matches!(err, ContentError::Timeout { operation: "import", after } if after == limit),
        "{err}"
    );
    assert!(err.is_retryable());

    // Release the abandoned blocking read so the runtime can shut down.
    let writer = fifo.clone();
    tokio::task::spawn_blocking(move || drop(std::fs::OpenOptions::new().write(true).open(writer)))
        .await
        .unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(&store.materialize(&kept).await.unwrap()[..], b"still here");
}

// ----------------------------------------------------------------------------
// Eviction
// ----------------------------------------------------------------------------

#[tokio::test]
async fn release_is_advisory() {
    let (_root, store) = new_store();
    let file = store.store(&b"transient"[..], "").await.unwrap();

    assert!(store.release(file.id()).await);
    assert!(!store.release(file.id()).await);

    let err = store.materialize(&file).await.unwrap_err();
    assert!(matches!(err, ContentError::ContentUnavailable { .. }));
    assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn sweep_keeps_only_live_references() {
    let (_root, store) = new_store();
    let keep = store.store(&b"keep"[..], "").await.unwrap();
    let drop_a = store.store(&b"drop a"[..], "").await.unwrap();
    let drop_b = store.store(&b"drop b"[..], "").await.unwrap();

    let values = [Value::File(keep.clone()), Value::Integer(3)];
    let live: HashSet<_> = values
        .iter()
        .filter_map(Value::as_file)
        .map(|f| *f.id())
        .collect();

    assert_eq!(store.sweep(&live).await, 2);
    assert!(store.contains(keep.id()));
    assert!(!store.contains(drop_a.id()));
    assert!(!store.contains(drop_b.id()));
    assert_eq!(store.sweep(&live).await, 0);
}

// ----------------------------------------------------------------------------
// Import / export
// ----------------------------------------------------------------------------

#[tokio::test]
async fn import_then_export_round_trips() {
    let (root, store) = new_store();
    let source = root.path().join("input.json");
    std::fs::write(&source, br#"{"x": [1, 2]}"#).unwrap();

    let file = store.import_file(&source, "application/json").await.unwrap();
    assert!(file.is_text_based());

    let dest = root.path().join("output.json");
    let written = store.export(&file, &dest).await.unwrap();
    assert_eq!(written, 13);
    assert_eq!(std::fs::read(&dest).unwrap(), std::fs::read(&source).unwrap());
}

#[tokio::test]
async fn import_of_missing_file_is_io_error() {
    let (root, store) = new_store();
    let err = store
        .import_file(root.path().join("missing.bin"), "")
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Io { operation: "import", .. }));
    assert!(store.is_empty());
}
