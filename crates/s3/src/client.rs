//! S3 storage backend
//!
//! Wraps aws-sdk-s3 and implements the StorageBackend trait from
//! slc-core. The SDK's built-in retry is disabled; every request runs
//! through the crate's own retry loop so the classifier decides what is
//! worth a second attempt.

use async_trait::async_trait;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketVersioningStatus, VersioningConfiguration};
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;

use slc_core::{
    Environment, Error, ListingPage, ObjectEntry, ObjectVersionEntry, Result, RetryConfig,
    StorageBackend, VersionMarker, VersioningState, retry_with_backoff, should_retry,
};

/// Handle to one S3-compatible service.
///
/// Owns the SDK client and the credentials baked into it; configuration
/// is immutable after [`S3Store::connect`]. No network I/O happens until
/// the first operation call.
pub struct S3Store {
    inner: aws_sdk_s3::Client,
    retry: RetryConfig,
}

impl S3Store {
    /// Build a client handle for the given environment.
    ///
    /// Empty credentials fail fast with a configuration error and a
    /// malformed endpoint with a connection error, both before any
    /// request is made.
    pub async fn connect(env: &Environment, retry: RetryConfig) -> Result<Self> {
        if env.access_key.trim().is_empty() || env.secret_key.trim().is_empty() {
            return Err(Error::Config(
                "access key and/or secret key is empty".to_string(),
            ));
        }

        let endpoint = url::Url::parse(&env.endpoint).map_err(|e| {
            Error::Connection(format!("invalid endpoint '{}': {e}", env.endpoint))
        })?;

        let credentials = aws_credential_types::Credentials::new(
            env.access_key.clone(),
            env.secret_key.clone(),
            None, // session token
            None, // expiry
            "slc-static-credentials",
        );

        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(env.region.clone()))
            .endpoint_url(endpoint.as_str())
            .load()
            .await;

        // Path-style addressing for compatibility with non-AWS services;
        // retries are handled by retry_with_backoff, not the SDK.
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .retry_config(aws_smithy_types::retry::RetryConfig::disabled())
            .build();

        tracing::debug!(endpoint = %endpoint, region = %env.region, "storage client configured");

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            retry,
        })
    }
}

/// Translate an SDK error into the crate error model.
///
/// Service rejections keep their status, error code, and request id so
/// the caller can report them without digging through the SDK types;
/// 404-class rejections become `NotFound`.
fn map_sdk_err<E>(operation: &'static str, err: SdkError<E, HttpResponse>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(ctx) => {
            let status = ctx.raw().status().as_u16();
            let code = ctx.err().code().map(str::to_string);
            let message = ctx
                .err()
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| ctx.err().to_string());

            let mut request_id = None;
            if let Some(value) = ctx.raw().headers().get("x-amz-request-id")
                && let Ok(id) = std::str::from_utf8(value.as_bytes())
            {
                request_id = Some(id.to_string());
            }

            tracing::debug!(
                operation,
                status,
                code = code.as_deref().unwrap_or("-"),
                request_id = request_id.as_deref().unwrap_or("-"),
                "service rejected request: {message}"
            );

            let not_found = status == 404
                || matches!(
                    code.as_deref(),
                    Some("NoSuchBucket" | "NoSuchKey" | "NoSuchVersion" | "NotFound")
                );
            if not_found {
                Error::NotFound(format!("{operation}: {message}"))
            } else {
                Error::Service {
                    status,
                    code,
                    request_id,
                    message: format!("{operation}: {message}"),
                }
            }
        }
        SdkError::TimeoutError(_) => Error::Transport(format!("{operation}: request timed out")),
        SdkError::DispatchFailure(e) => {
            Error::Transport(format!("{operation}: network dispatch error: {e:?}"))
        }
        SdkError::ResponseError(e) => {
            Error::Transport(format!("{operation}: malformed response: {e:?}"))
        }
        SdkError::ConstructionFailure(e) => {
            Error::Connection(format!("{operation}: request construction failed: {e:?}"))
        }
        other => Error::Transport(format!("{operation}: {other}")),
    }
}

#[async_trait]
impl StorageBackend for S3Store {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        retry_with_backoff(
            &self.retry,
            || async {
                match self.inner.head_bucket().bucket(bucket).send().await {
                    Ok(_) => Ok(true),
                    Err(e) => match map_sdk_err("HeadBucket", e) {
                        Error::NotFound(_) => Ok(false),
                        other => Err(other),
                    },
                }
            },
            |e, attempt| should_retry("HeadBucket", e, attempt),
        )
        .await
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        retry_with_backoff(
            &self.retry,
            || async {
                self.inner
                    .create_bucket()
                    .bucket(bucket)
                    .send()
                    .await
                    .map_err(|e| map_sdk_err("CreateBucket", e))?;
                Ok(())
            },
            |e, attempt| should_retry("CreateBucket", e, attempt),
        )
        .await
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        retry_with_backoff(
            &self.retry,
            || async {
                self.inner
                    .delete_bucket()
                    .bucket(bucket)
                    .send()
                    .await
                    .map_err(|e| map_sdk_err("DeleteBucket", e))?;
                Ok(())
            },
            |e, attempt| should_retry("DeleteBucket", e, attempt),
        )
        .await
    }

    async fn bucket_versioning(&self, bucket: &str) -> Result<VersioningState> {
        retry_with_backoff(
            &self.retry,
            || async {
                let response = self
                    .inner
                    .get_bucket_versioning()
                    .bucket(bucket)
                    .send()
                    .await
                    .map_err(|e| map_sdk_err("GetBucketVersioning", e))?;

                Ok(match response.status() {
                    Some(BucketVersioningStatus::Enabled) => VersioningState::Enabled,
                    Some(BucketVersioningStatus::Suspended) => VersioningState::Suspended,
                    _ => VersioningState::Unversioned,
                })
            },
            |e, attempt| should_retry("GetBucketVersioning", e, attempt),
        )
        .await
    }

    async fn set_versioning(&self, bucket: &str, enabled: bool) -> Result<()> {
        let status = if enabled {
            BucketVersioningStatus::Enabled
        } else {
            BucketVersioningStatus::Suspended
        };

        retry_with_backoff(
            &self.retry,
            || {
                let status = status.clone();
                async move {
                    let config = VersioningConfiguration::builder().status(status).build();
                    self.inner
                        .put_bucket_versioning()
                        .bucket(bucket)
                        .versioning_configuration(config)
                        .send()
                        .await
                        .map_err(|e| map_sdk_err("PutBucketVersioning", e))?;
                    Ok(())
                }
            },
            |e, attempt| should_retry("PutBucketVersioning", e, attempt),
        )
        .await
    }

    async fn list_objects_page(
        &self,
        bucket: &str,
        token: Option<String>,
    ) -> Result<ListingPage<ObjectEntry, String>> {
        retry_with_backoff(
            &self.retry,
            || {
                let token = token.clone();
                async move {
                    let mut request = self.inner.list_objects_v2().bucket(bucket);
                    if let Some(t) = token {
                        request = request.continuation_token(t);
                    }

                    let response = request
                        .send()
                        .await
                        .map_err(|e| map_sdk_err("ListObjectsV2", e))?;

                    let entries = response
                        .contents()
                        .iter()
                        .map(|o| ObjectEntry {
                            key: o.key().unwrap_or_default().to_string(),
                        })
                        .collect();

                    Ok(ListingPage {
                        entries,
                        truncated: response.is_truncated().unwrap_or(false),
                        next: response.next_continuation_token().map(str::to_string),
                    })
                }
            },
            |e, attempt| should_retry("ListObjectsV2", e, attempt),
        )
        .await
    }

    async fn list_versions_page(
        &self,
        bucket: &str,
        marker: Option<VersionMarker>,
    ) -> Result<ListingPage<ObjectVersionEntry, VersionMarker>> {
        retry_with_backoff(
            &self.retry,
            || {
                let marker = marker.clone();
                async move {
                    let mut request = self.inner.list_object_versions().bucket(bucket);
                    if let Some(m) = marker {
                        request = request.key_marker(m.key);
                        if let Some(v) = m.version_id {
                            request = request.version_id_marker(v);
                        }
                    }

                    let response = request
                        .send()
                        .await
                        .map_err(|e| map_sdk_err("ListObjectVersions", e))?;

                    // Versions and delete markers arrive as separate
                    // sequences; both belong to the listing. Page order is
                    // preserved, never re-sorted.
                    let mut entries = Vec::new();
                    for v in response.versions() {
                        entries.push(ObjectVersionEntry {
                            key: v.key().unwrap_or_default().to_string(),
                            version_id: v.version_id().unwrap_or("null").to_string(),
                            delete_marker: false,
                        });
                    }
                    for m in response.delete_markers() {
                        entries.push(ObjectVersionEntry {
                            key: m.key().unwrap_or_default().to_string(),
                            version_id: m.version_id().unwrap_or("null").to_string(),
                            delete_marker: true,
                        });
                    }

                    let next = response.next_key_marker().map(|k| VersionMarker {
                        key: k.to_string(),
                        version_id: response.next_version_id_marker().map(str::to_string),
                    });

                    Ok(ListingPage {
                        entries,
                        truncated: response.is_truncated().unwrap_or(false),
                        next,
                    })
                }
            },
            |e, attempt| should_retry("ListObjectVersions", e, attempt),
        )
        .await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        retry_with_backoff(
            &self.retry,
            || async {
                self.inner
                    .delete_object()
                    .bucket(bucket)
                    .key(key)
                    .send()
                    .await
                    .map_err(|e| map_sdk_err("DeleteObject", e))?;
                Ok(())
            },
            |e, attempt| should_retry("DeleteObject", e, attempt),
        )
        .await
    }

    async fn delete_object_version(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> Result<()> {
        retry_with_backoff(
            &self.retry,
            || async {
                self.inner
                    .delete_object()
                    .bucket(bucket)
                    .key(key)
                    .version_id(version_id)
                    .send()
                    .await
                    .map_err(|e| map_sdk_err("DeleteObjectVersion", e))?;
                Ok(())
            },
            |e, attempt| should_retry("DeleteObjectVersion", e, attempt),
        )
        .await
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String> {
        retry_with_backoff(
            &self.retry,
            || {
                let body = body.clone();
                async move {
                    let mut request = self
                        .inner
                        .put_object()
                        .bucket(bucket)
                        .key(key)
                        .body(ByteStream::from(body));

                    if let Some(ct) = content_type {
                        request = request.content_type(ct);
                    }

                    let response = request
                        .send()
                        .await
                        .map_err(|e| map_sdk_err("PutObject", e))?;

                    Ok(response
                        .e_tag()
                        .map(|t| t.trim_matches('"').to_string())
                        .unwrap_or_default())
                }
            },
            |e, attempt| should_retry("PutObject", e, attempt),
        )
        .await
    }

    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        version_id: Option<&str>,
    ) -> Result<Vec<u8>> {
        retry_with_backoff(
            &self.retry,
            || async {
                let mut request = self.inner.get_object().bucket(bucket).key(key);
                if let Some(v) = version_id {
                    request = request.version_id(v);
                }

                let response = request
                    .send()
                    .await
                    .map_err(|e| map_sdk_err("GetObject", e))?;

                let data = response
                    .body
                    .collect()
                    .await
                    .map_err(|e| Error::Transport(format!("GetObject: body read failed: {e}")))?
                    .into_bytes()
                    .to_vec();

                Ok(data)
            },
            |e, attempt| should_retry("GetObject", e, attempt),
        )
        .await
    }
}
