//! Storage backend abstraction
//!
//! The operation modules (lifecycle, transfer, export) are written
//! against this trait rather than a concrete SDK client, so the
//! pagination and branching logic can be tested without a server and the
//! backend can be swapped out.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use crate::page::{ListingPage, VersionMarker};

/// Versioning configuration of a bucket, as reported by the service.
///
/// Externally mutable; callers must re-query it before every delete
/// rather than caching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersioningState {
    /// Versioning has never been configured on the bucket
    Unversioned,
    Enabled,
    Suspended,
}

/// One entry of a plain object listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: String,
}

/// One entry of a version listing.
///
/// Version listings interleave real versions and delete markers; both
/// occupy a version id and both must be removed before a bucket delete
/// can succeed. `version_id` is the literal `"null"` for entries written
/// while the bucket was unversioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectVersionEntry {
    pub key: String,
    pub version_id: String,
    pub delete_marker: bool,
}

/// Primitive remote operations against an S3-compatible service.
///
/// Implementations own the transport and are expected to run every call
/// through the retry layer; callers of this trait see only the final
/// outcome of each request.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Current versioning configuration of the bucket.
    async fn bucket_versioning(&self, bucket: &str) -> Result<VersioningState>;

    /// Enable or suspend versioning on an existing bucket.
    async fn set_versioning(&self, bucket: &str, enabled: bool) -> Result<()>;

    /// One page of the plain object listing.
    async fn list_objects_page(
        &self,
        bucket: &str,
        token: Option<String>,
    ) -> Result<ListingPage<ObjectEntry, String>>;

    /// One page of the version listing, delete markers included.
    async fn list_versions_page(
        &self,
        bucket: &str,
        marker: Option<VersionMarker>,
    ) -> Result<ListingPage<ObjectVersionEntry, VersionMarker>>;

    /// Delete the current object; on a versioned bucket this only
    /// inserts a delete marker.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete one specific version of an object.
    async fn delete_object_version(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> Result<()>;

    /// Upload a full object body; returns the entity tag.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String>;

    /// Fetch a full object body, optionally version-addressed.
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> Result<Vec<u8>>;
}
