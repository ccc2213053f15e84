//! slc-core: Core library for the slc S3 lifecycle client
//!
//! This crate provides the storage-facing core of the slc CLI:
//! - Configuration and named-environment handling
//! - Retry classification and backoff
//! - The StorageBackend trait the operations are written against
//! - Bucket lifecycle, object transfer, and inventory export operations
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other
//! backends.

pub mod config;
pub mod error;
pub mod export;
pub mod lifecycle;
pub mod page;
pub mod retry;
pub mod store;
pub mod transfer;

pub use config::{Config, Environment, RetryConfig};
pub use error::{Error, Result};
pub use page::{ListingPage, Paginated, VersionMarker};
pub use retry::{retry_with_backoff, should_retry};
pub use store::{ObjectEntry, ObjectVersionEntry, StorageBackend, VersioningState};
pub use transfer::PutReceipt;
