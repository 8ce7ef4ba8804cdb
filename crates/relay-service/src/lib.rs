//! # relay-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    AddMemberRequest, AdminUserResponse, ApiResponse, ChangeRoleRequest, ChannelResponse,
    CreateChannelRequest, CreateMessageRequest, HealthResponse, ListUsersQuery, MemberResponse,
    MessageResponse, OnlineUserResponse, PaginatedResponse, ReadinessResponse, RemoveMemberRequest,
    SetActiveRequest, SetBanRequest, StatusResponse, UnreadCountsResponse, UpdateChannelRequest,
    UpdateMessageRequest, UpdateStatusRequest, UserListResponse, UserSummaryResponse,
};
pub use services::{
    AccessGuard, AdminService, ChannelService, CreateChannelOutcome, MessageService,
    PresenceService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    UnreadService,
};
