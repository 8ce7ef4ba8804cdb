//! Attachment storage port

use async_trait::async_trait;

use crate::traits::repositories::RepoResult;

/// Blob storage for message attachments, addressed by relative path
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Whether a stored attachment exists at `path`
    async fn exists(&self, path: &str) -> RepoResult<bool>;

    /// Delete the attachment at `path`; deleting a missing file is not an
    /// error
    async fn delete(&self, path: &str) -> RepoResult<()>;
}
