//! Ports - repository and storage traits implemented by infrastructure

mod repositories;
mod storage;

pub use repositories::{
    ChannelRepository, MembershipRepository, MessagePage, MessageQuery, MessageRepository,
    RepoResult, StatusRepository, UserFilter, UserRepository,
};
pub use storage::AttachmentStore;
