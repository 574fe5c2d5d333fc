//! Staged uploads.
//!
//! An image is written to disk before the post row exists. `StagedUpload`
//! carries the obligation to either keep the file (`commit`) once the row is
//! in place, or remove it (`discard`) when the post is rejected. One dropped
//! unresolved (a cancelled request) removes its file in the background.

use std::sync::Arc;

use domains::{MediaStorage, Result, Upload};
use tracing::{debug, warn};

#[must_use = "a staged upload must be committed or discarded"]
pub struct StagedUpload {
    filename: String,
    storage: Arc<dyn MediaStorage>,
    resolved: bool,
}

impl StagedUpload {
    /// Writes the upload through `storage` and takes ownership of the result.
    pub async fn stage(storage: Arc<dyn MediaStorage>, upload: Upload) -> Result<Self> {
        let filename = storage.save(upload).await?;
        debug!(%filename, "upload staged");
        Ok(Self {
            filename,
            storage,
            resolved: false,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Keeps the file; the post referencing it has been stored.
    pub fn commit(mut self) {
        self.resolved = true;
    }

    /// Removes the file. A failed removal is logged and otherwise ignored.
    pub async fn discard(mut self) {
        self.resolved = true;
        if let Err(err) = self.storage.delete(&self.filename).await {
            warn!(filename = %self.filename, error = %err, "could not remove orphaned upload");
        }
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }

        let filename = std::mem::take(&mut self.filename);
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(%filename, "staged upload dropped outside a runtime; file left behind");
            return;
        };

        warn!(%filename, "staged upload dropped without commit or discard; removing");
        let storage = Arc::clone(&self.storage);
        runtime.spawn(async move {
            if let Err(err) = storage.delete(&filename).await {
                warn!(%filename, error = %err, "could not remove orphaned upload");
            }
        });
    }
}

impl std::fmt::Debug for StagedUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedUpload")
            .field("filename", &self.filename)
            .field("resolved", &self.resolved)
            .finish()
    }
}
