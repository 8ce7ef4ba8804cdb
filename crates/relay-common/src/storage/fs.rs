//! Filesystem attachment store
//!
//! Attachments are addressed by relative path under a single upload
//! directory. Paths that escape the directory are rejected.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use relay_core::{AttachmentStore, DomainError, RepoResult};

/// Attachment store backed by a local directory
#[derive(Debug, Clone)]
pub struct FsAttachmentStore {
    root: PathBuf,
}

impl FsAttachmentStore {
    #[must_use]
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: upload_dir.into(),
        }
    }

    /// Resolve a stored path against the upload root.
    ///
    /// Rejects absolute paths and any path containing `..` components.
    fn resolve(&self, path: &str) -> RepoResult<PathBuf> {
        let relative = Path::new(path);
        let safe = relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return Err(DomainError::StorageUnavailable(format!(
                "invalid attachment path: {path}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AttachmentStore for FsAttachmentStore {
    async fn exists(&self, path: &str) -> RepoResult<bool> {
        let full = self.resolve(path)?;
        tokio::fs::try_exists(&full)
            .await
            .map_err(|e| DomainError::StorageUnavailable(e.to_string()))
    }

    async fn delete(&self, path: &str) -> RepoResult<()> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::StorageUnavailable(e.to_string())),
        }
    }
}
