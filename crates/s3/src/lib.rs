//! slc-s3: aws-sdk-s3 implementation of the slc-core StorageBackend trait

pub mod client;

pub use client::S3Store;
