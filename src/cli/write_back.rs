use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::workflow::AcceptEffect;

/// Writes accepted text to a file, replacing what was there.
pub struct FileWriteBack {
    path: PathBuf,
}

impl FileWriteBack {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl AcceptEffect for FileWriteBack {
    async fn apply(&self, content: &str) -> Result<()> {
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "Saved accepted suggestion");
        Ok(())
    }
}
