//! Bucket lifecycle operations
//!
//! Creation is idempotent; deletion is versioning-aware and recursive.
//! A versioned bucket must have every object *version* (and every delete
//! marker) removed individually: plain deletes only insert delete
//! markers, which leaves unreachable data behind and a bucket the
//! service refuses to delete.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::page::Paginated;
use crate::store::{StorageBackend, VersioningState};

/// Create `bucket`, optionally with versioning enabled.
///
/// Returns `true` if the bucket was created, `false` if it already
/// existed (a no-op, not an error). If creation succeeds but the
/// follow-up versioning call fails, the bucket is left unversioned and
/// the error is surfaced to the caller.
pub async fn create_bucket(
    store: &impl StorageBackend,
    bucket: &str,
    versioning: bool,
) -> Result<bool> {
    if store.bucket_exists(bucket).await? {
        info!(bucket, "bucket already exists");
        return Ok(false);
    }

    info!(bucket, versioning, "creating bucket");
    store.create_bucket(bucket).await?;

    if versioning {
        if let Err(e) = store.set_versioning(bucket, true).await {
            warn!(bucket, error = %e, "bucket created but versioning could not be enabled");
            return Err(e);
        }
    }

    info!(bucket, "bucket created");
    Ok(true)
}

/// Delete `bucket` together with everything it contains.
///
/// The versioning state is re-queried on every call; it is externally
/// mutable and must not be cached. Returns the number of entries
/// (objects or versions) removed before the bucket delete. Any
/// individual delete failure aborts the remaining loop and propagates,
/// so partial deletion is reported rather than hidden.
pub async fn delete_bucket(store: &impl StorageBackend, bucket: &str) -> Result<u64> {
    let state = store.bucket_versioning(bucket).await?;
    info!(bucket, state = ?state, "deleting bucket");

    let mut removed = 0u64;

    match state {
        VersioningState::Enabled => {
            let mut pages = Paginated::new(|marker| store.list_versions_page(bucket, marker));
            while let Some(entries) = pages.next_page().await? {
                for entry in entries {
                    store
                        .delete_object_version(bucket, &entry.key, &entry.version_id)
                        .await?;
                    debug!(
                        key = %entry.key,
                        version_id = %entry.version_id,
                        delete_marker = entry.delete_marker,
                        "removed object version"
                    );
                    removed += 1;
                }
            }
        }
        VersioningState::Unversioned | VersioningState::Suspended => {
            let mut pages = Paginated::new(|token| store.list_objects_page(bucket, token));
            while let Some(entries) = pages.next_page().await? {
                for entry in entries {
                    store.delete_object(bucket, &entry.key).await?;
                    debug!(key = %entry.key, "removed object");
                    removed += 1;
                }
            }
        }
    }

    info!(bucket, removed, "bucket emptied");
    store.delete_bucket(bucket).await?;

    // The existence probe after a delete may read stale state; log the
    // outcome but never fail the operation on it.
    match store.bucket_exists(bucket).await {
        Ok(false) => info!(bucket, removed, "bucket deleted"),
        Ok(true) => warn!(bucket, "bucket still listed after delete"),
        Err(e) => warn!(bucket, error = %e, "existence check after delete failed"),
    }

    Ok(removed)
}

/// Delete the current object under `key`.
///
/// On a versioned bucket this inserts a delete marker and leaves prior
/// versions in place.
pub async fn delete_object(store: &impl StorageBackend, bucket: &str, key: &str) -> Result<()> {
    store.delete_object(bucket, key).await?;
    info!(bucket, key, "object deleted");
    Ok(())
}

/// Delete one specific version of an object.
///
/// Only meaningful on a versioning-enabled bucket; anywhere else the
/// request is skipped with a log line and `false` is returned.
pub async fn delete_object_version(
    store: &impl StorageBackend,
    bucket: &str,
    key: &str,
    version_id: &str,
) -> Result<bool> {
    if store.bucket_versioning(bucket).await? != VersioningState::Enabled {
        info!(bucket, "bucket is not versioning-enabled, skipping version delete");
        return Ok(false);
    }

    store.delete_object_version(bucket, key, version_id).await?;
    info!(bucket, key, version_id, "object version deleted");
    Ok(true)
}
