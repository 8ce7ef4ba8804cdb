//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    AddMemberRequest, ChangeRoleRequest, CreateChannelRequest, CreateMessageRequest,
    ListUsersQuery, RemoveMemberRequest, SetActiveRequest, SetBanRequest, UpdateChannelRequest,
    UpdateMessageRequest, UpdateStatusRequest,
};

// Re-export commonly used response types
pub use responses::{
    AdminUserResponse, ApiResponse, AuthorResponse, ChannelResponse, ChannelUnread,
    HealthChecks, HealthResponse, MemberResponse, MessagePreviewResponse, MessageResponse,
    OnlineUserResponse, PaginatedResponse, PaginationMeta, ReadinessResponse, StatusResponse,
    UnreadCountsResponse, UserCounts, UserListResponse, UserSummaryResponse,
};

// Re-export mappers and helper structs
pub use mappers::{ChannelWithDetails, MessageWithAuthor};
