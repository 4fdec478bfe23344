//! Dataset loading collaborator
//!
//! Loading is the only asynchronous operation in the viewer. The trait seam
//! lets tests substitute canned responses; the shipped implementation reads
//! datasets from the filesystem.

use crate::domain::LoadFailure;
use crate::trace_data::TraceDataset;

/// Fetches a dataset from a URL-like location.
///
/// On failure the viewer displays an inline error carrying the reported
/// status and message verbatim.
pub trait DatasetLoader {
    fn load(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<TraceDataset, LoadFailure>> + Send;
}

/// Loads datasets from local JSON files. The status of an I/O failure is the
/// raw OS error code; parse and validation failures report status 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl DatasetLoader for FileLoader {
    async fn load(&self, url: &str) -> Result<TraceDataset, LoadFailure> {
        let content = tokio::fs::read_to_string(url).await.map_err(|e| LoadFailure {
            status: e.raw_os_error().unwrap_or(-1),
            message: e.to_string(),
        })?;
        TraceDataset::from_json(&content)
            .map_err(|e| LoadFailure { status: 0, message: e.to_string() })
    }
}
