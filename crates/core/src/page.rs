//! Generic pagination over truncated listings
//!
//! Object listings and version listings share the same shape: a page of
//! entries, a truncation flag, and a continuation token for the next
//! call. [`Paginated`] owns the token threading and the termination rule
//! (stop exactly when `truncated` is false) so the delete and export
//! loops cannot get it wrong independently.

use std::future::Future;

use crate::error::{Error, Result};

/// One page of a listing.
///
/// `K` is the continuation-token type: a plain string for object
/// listings, a [`VersionMarker`] for version listings. When `truncated`
/// is false the enumeration is complete; callers must not assume any
/// bound on the page count before that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage<T, K> {
    pub entries: Vec<T>,
    pub truncated: bool,
    pub next: Option<K>,
}

/// Continuation marker for version listings, which resume from a
/// key/version pair rather than a single opaque token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMarker {
    pub key: String,
    pub version_id: Option<String>,
}

/// Drives a paginated fetch to completion, one page per call.
///
/// ```ignore
/// let mut pages = Paginated::new(|marker| store.list_versions_page(bucket, marker));
/// while let Some(entries) = pages.next_page().await? {
///     for entry in entries { /* ... */ }
/// }
/// ```
pub struct Paginated<F, K> {
    fetch: F,
    token: Option<K>,
    done: bool,
}

impl<F, K> Paginated<F, K> {
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            token: None,
            done: false,
        }
    }

    /// Fetch the next page, or `None` once the listing reported
    /// `truncated == false`.
    ///
    /// A page that claims to be truncated but carries no continuation
    /// token would re-fetch the first page forever; that is reported as
    /// an error instead.
    pub async fn next_page<T, Fut>(&mut self) -> Result<Option<Vec<T>>>
    where
        F: FnMut(Option<K>) -> Fut,
        Fut: Future<Output = Result<ListingPage<T, K>>>,
    {
        if self.done {
            return Ok(None);
        }

        let page = (self.fetch)(self.token.take()).await?;

        if page.truncated {
            match page.next {
                Some(next) => self.token = Some(next),
                None => {
                    self.done = true;
                    return Err(Error::Transport(
                        "listing reported truncated but no continuation token".to_string(),
                    ));
                }
            }
        } else {
            self.done = true;
        }

        Ok(Some(page.entries))
    }
}
