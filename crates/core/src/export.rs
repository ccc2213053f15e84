//! Bucket inventory export
//!
//! Writes one `key;version_id` line per object-version entry, in page
//! enumeration order, to a freshly truncated file. The file is only
//! flushed after the final page; a failed export leaves a partial file
//! behind that callers must treat as untrustworthy and regenerate.

use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use crate::error::Result;
use crate::page::Paginated;
use crate::store::StorageBackend;

/// Export the full object/version inventory of `bucket` to `output`.
///
/// Returns the number of entries written.
pub async fn export_inventory(
    store: &impl StorageBackend,
    bucket: &str,
    output: &Path,
) -> Result<u64> {
    info!(bucket, file = %output.display(), "exporting bucket inventory");

    let file = tokio::fs::File::create(output).await?;
    let mut writer = BufWriter::new(file);

    let mut exported = 0u64;
    let mut pages = Paginated::new(|marker| store.list_versions_page(bucket, marker));
    while let Some(entries) = pages.next_page().await? {
        for entry in entries {
            let line = format!("{};{}\n", entry.key, entry.version_id);
            writer.write_all(line.as_bytes()).await?;
            exported += 1;
        }
    }

    writer.flush().await?;
    info!(bucket, exported, "inventory export finished");

    Ok(exported)
}
