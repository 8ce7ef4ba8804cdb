//! Attachment storage backends

mod fs;

pub use fs::FsAttachmentStore;
