//! Error types shared across the slc crates

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by storage operations.
///
/// `Service` and `Transport` are the only variants the retry layer will
/// ever reconsider; everything else is terminal for the requested
/// operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration (credentials, config keys,
    /// operation parameters). Fails the operation before any network I/O.
    #[error("configuration error: {0}")]
    Config(String),

    /// The storage client handle itself could not be built, e.g. a
    /// malformed endpoint. Distinct from a later per-request failure.
    #[error("cannot build storage client: {0}")]
    Connection(String),

    /// The remote service rejected a request with a structured error.
    #[error("service error (status {status}): {message}")]
    Service {
        status: u16,
        code: Option<String>,
        request_id: Option<String>,
        message: String,
    },

    /// Transport-level failure: the request never produced a well-formed
    /// service response (dispatch error, timeout, connection reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// A referenced bucket, object, version, or local source file does
    /// not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Local file I/O failure outside the transport.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Remote error code, when the service supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Request id of the failed remote call, when available.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Error::Service { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }
}
