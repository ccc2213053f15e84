//! Single-object transfer operations

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::StorageBackend;

/// Outcome of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    /// Entity tag assigned by the service
    pub etag: String,
    pub size_bytes: u64,
}

/// Upload the file at `source` to `bucket`/`key`.
///
/// An unreadable source path fails with `NotFound` before any remote
/// call. The content type is guessed from the file name.
pub async fn put_object(
    store: &impl StorageBackend,
    bucket: &str,
    key: &str,
    source: &Path,
) -> Result<PutReceipt> {
    info!(bucket, key, file = %source.display(), "uploading object");

    let body = tokio::fs::read(source).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(format!("source file {}", source.display()))
        } else {
            Error::Io(e)
        }
    })?;
    let size_bytes = body.len() as u64;
    let content_type = mime_guess::from_path(source).first_raw();

    let etag = store.put_object(bucket, key, body, content_type).await?;
    info!(bucket, key, etag = %etag, size_bytes, "upload complete");

    Ok(PutReceipt { etag, size_bytes })
}

/// Download the current version of `bucket`/`key`.
///
/// With a destination path the full body is written there, overwriting
/// any existing file. Without one the body is fetched and discarded, a
/// diagnostic mode for checking that an object is readable.
pub async fn get_object(
    store: &impl StorageBackend,
    bucket: &str,
    key: &str,
    dest: Option<&Path>,
) -> Result<u64> {
    let body = store.get_object(bucket, key, None).await?;
    let size_bytes = body.len() as u64;

    match dest {
        Some(path) => {
            tokio::fs::write(path, &body).await?;
            info!(bucket, key, file = %path.display(), size_bytes, "object downloaded");
        }
        None => {
            debug!(bucket, key, size_bytes, "object fetched and discarded");
        }
    }

    Ok(size_bytes)
}

/// Download one specific version of `bucket`/`key` to `dest`.
///
/// The body is fetched before the destination is opened, so a missing
/// version id fails with `NotFound` and leaves the destination untouched.
pub async fn get_object_version(
    store: &impl StorageBackend,
    bucket: &str,
    key: &str,
    version_id: &str,
    dest: &Path,
) -> Result<u64> {
    let body = store.get_object(bucket, key, Some(version_id)).await?;
    let size_bytes = body.len() as u64;

    tokio::fs::write(dest, &body).await?;
    info!(bucket, key, version_id, file = %dest.display(), size_bytes, "object version downloaded");

    Ok(size_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockStorageBackend;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_put_missing_source_is_not_found() {
        let mut store = MockStorageBackend::new();
        store.expect_put_object().never();

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.bin");

        let err = put_object(&store, "demo", "k", &missing).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_put_reports_etag_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("report.txt");
        std::fs::write(&source, b"hello world").unwrap();

        let mut store = MockStorageBackend::new();
        store
            .expect_put_object()
            .withf(|bucket, key, body, content_type| {
                bucket == "demo"
                    && key == "report.txt"
                    && body == b"hello world"
                    && *content_type == Some("text/plain")
            })
            .times(1)
            .returning(|_, _, _, _| Ok("d41d8cd98f".to_string()));

        let receipt = put_object(&store, "demo", "report.txt", &source).await.unwrap();
        assert_eq!(receipt.etag, "d41d8cd98f");
        assert_eq!(receipt.size_bytes, 11);
    }

    #[tokio::test]
    async fn test_put_then_versioned_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("blob.bin");
        let content: Vec<u8> = (0u16..512).map(|i| (i % 251) as u8).collect();
        std::fs::write(&source, &content).unwrap();

        // Backend that remembers the uploaded body under a version id.
        let stored: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let mut store = MockStorageBackend::new();
        let put_copy = stored.clone();
        store.expect_put_object().times(1).returning(move |_, _, body, _| {
            *put_copy.lock().unwrap() = body;
            Ok("etag-1".to_string())
        });
        let get_copy = stored.clone();
        store
            .expect_get_object()
            .withf(|_, _, version_id| *version_id == Some("ver-1"))
            .times(1)
            .returning(move |_, _, _| Ok(get_copy.lock().unwrap().clone()));

        put_object(&store, "demo", "blob.bin", &source).await.unwrap();

        let dest = dir.path().join("blob.out");
        let size = get_object_version(&store, "demo", "blob.bin", "ver-1", &dest)
            .await
            .unwrap();

        assert_eq!(size, content.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), content);
    }

    #[tokio::test]
    async fn test_get_overwrites_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.txt");
        std::fs::write(&dest, b"stale and much longer content").unwrap();

        let mut store = MockStorageBackend::new();
        store
            .expect_get_object()
            .withf(|_, _, version_id| version_id.is_none())
            .times(1)
            .returning(|_, _, _| Ok(b"fresh".to_vec()));

        let size = get_object(&store, "demo", "k", Some(&dest)).await.unwrap();
        assert_eq!(size, 5);
        assert_eq!(std::fs::read(&dest).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_get_without_destination_discards_body() {
        let mut store = MockStorageBackend::new();
        store
            .expect_get_object()
            .times(1)
            .returning(|_, _, _| Ok(vec![0u8; 42]));

        let size = get_object(&store, "demo", "k", None).await.unwrap();
        assert_eq!(size, 42);
    }

    #[tokio::test]
    async fn test_missing_version_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = MockStorageBackend::new();
        store
            .expect_get_object()
            .returning(|_, key, _| Err(Error::NotFound(format!("version of {key}"))));

        // No pre-existing destination: the file must not be created.
        let dest = dir.path().join("never-written");
        let err = get_object_version(&store, "demo", "k", "nope", &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(!dest.exists());

        // Pre-existing destination: the content must survive.
        let existing = dir.path().join("existing");
        std::fs::write(&existing, b"keep me").unwrap();
        let err = get_object_version(&store, "demo", "k", "nope", &existing)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(std::fs::read(&existing).unwrap(), b"keep me");
    }
}
