//! Test fixtures and data generators
//!
//! The API has no registration endpoint, so tests seed users straight
//! into the database and mint their tokens locally.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use anyhow::Result;
use chrono::{DateTime, Utc};
use relay_common::JwtService;
use relay_core::{Snowflake, SnowflakeGenerator};
use relay_db::PgPool;
use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

// Worker id well away from the one the server under test uses
fn id_generator() -> &'static SnowflakeGenerator {
    static GENERATOR: OnceLock<SnowflakeGenerator> = OnceLock::new();
    GENERATOR.get_or_init(|| SnowflakeGenerator::new(999))
}

/// Connect to the test database and apply migrations
pub async fn test_pool() -> Result<PgPool> {
    dotenvy::dotenv().ok();
    let pool = relay_db::create_pool_from_env().await?;
    relay_db::run_migrations(&pool).await?;
    Ok(pool)
}

/// A seeded user with a valid bearer token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Snowflake,
    pub name: String,
    pub token: String,
}

/// Insert a user row and mint a token for it
pub async fn seed_user(pool: &PgPool, role: &str) -> Result<TestUser> {
    let suffix = unique_suffix();
    let id = id_generator().generate();
    let name = format!("testuser{suffix}");
    let email = format!("test{suffix}@example.com");

    sqlx::query(
        "INSERT INTO users (id, name, first_name, last_name, email, role) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(i64::from(id))
    .bind(&name)
    .bind(format!("Test{suffix}"))
    .bind("User")
    .bind(&email)
    .bind(role)
    .execute(pool)
    .await?;

    Ok(TestUser {
        id,
        token: mint_token(id)?,
        name,
    })
}

/// Seed a regular user
pub async fn seed_member(pool: &PgPool) -> Result<TestUser> {
    seed_user(pool, "user").await
}

/// Seed a global admin
pub async fn seed_admin(pool: &PgPool) -> Result<TestUser> {
    seed_user(pool, "admin").await
}

/// Issue a token the way the server validates them
pub fn mint_token(user_id: Snowflake) -> Result<String> {
    let secret = std::env::var("JWT_SECRET")?;
    let jwt = JwtService::new(&secret, 3600);
    jwt.issue_token(user_id)
        .map_err(|e| anyhow::anyhow!("Token error: {}", e))
}

// ============================================================================
// Request bodies
// ============================================================================

/// Create channel request
#[derive(Debug, Serialize)]
pub struct CreateChannelRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_group: bool,
    pub member_ids: Vec<Snowflake>,
}

impl CreateChannelRequest {
    pub fn direct(other: Snowflake) -> Self {
        Self {
            name: None,
            description: None,
            is_group: false,
            member_ids: vec![other],
        }
    }

    pub fn group(members: Vec<Snowflake>) -> Self {
        let suffix = unique_suffix();
        Self {
            name: Some(format!("Test Group {suffix}")),
            description: Some("A test group".to_string()),
            is_group: true,
            member_ids: members,
        }
    }
}

/// Update channel request
#[derive(Debug, Serialize)]
pub struct UpdateChannelRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Add or remove member request
#[derive(Debug, Serialize)]
pub struct MemberRequest {
    pub user_id: Snowflake,
}

/// Create message request
#[derive(Debug, Serialize)]
pub struct CreateMessageRequest {
    pub content: Option<String>,
    pub attachment: Option<String>,
    pub attachment_type: Option<String>,
}

impl CreateMessageRequest {
    pub fn simple(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            attachment: None,
            attachment_type: None,
        }
    }
}

/// Update message request
#[derive(Debug, Serialize)]
pub struct UpdateMessageRequest {
    pub content: String,
}

/// Update status request
#[derive(Debug, Serialize)]
pub struct UpdateStatusRequest {
    pub status_id: Snowflake,
    pub status_message: Option<String>,
}

/// Change role request
#[derive(Debug, Serialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

/// Ban request
#[derive(Debug, Serialize)]
pub struct SetBanRequest {
    pub banned: bool,
    pub reason: Option<String>,
}

/// Activation request
#[derive(Debug, Serialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

// ============================================================================
// Response bodies
// ============================================================================

/// Channel response
#[derive(Debug, Deserialize)]
pub struct ChannelResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_group: bool,
    pub is_active: bool,
    pub created_by: String,
    pub members: Vec<MemberResponse>,
    #[serde(default)]
    pub last_message: Option<MessagePreviewResponse>,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: i64,
    #[serde(default)]
    pub last_read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Channel member response
#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub user: UserSummaryResponse,
    pub is_admin: bool,
    pub is_muted: bool,
    pub joined_at: DateTime<Utc>,
}

/// User summary response
#[derive(Debug, Deserialize)]
pub struct UserSummaryResponse {
    pub id: String,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub is_online: bool,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
}

/// Message preview response
#[derive(Debug, Deserialize)]
pub struct MessagePreviewResponse {
    pub id: String,
    pub author_name: String,
    pub preview: String,
    pub has_attachment: bool,
    pub created_at: DateTime<Utc>,
}

/// Message response
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub channel_id: String,
    pub author: AuthorResponse,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub attachment_type: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
}

/// Message author response
#[derive(Debug, Deserialize)]
pub struct AuthorResponse {
    pub id: String,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub is_deleted: bool,
}

/// Paginated message page
#[derive(Debug, Deserialize)]
pub struct MessagePage {
    pub data: Vec<MessageResponse>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Deserialize)]
pub struct PaginationMeta {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
    pub has_more: bool,
    pub limit: i64,
}

/// Unread counts response
#[derive(Debug, Deserialize)]
pub struct UnreadCountsResponse {
    pub total: i64,
    pub channels: Vec<ChannelUnread>,
}

/// Per-channel unread count
#[derive(Debug, Deserialize)]
pub struct ChannelUnread {
    pub channel_id: String,
    pub count: i64,
}

/// Mark-as-read response
#[derive(Debug, Deserialize)]
pub struct MarkReadResponse {
    pub last_read_at: DateTime<Utc>,
}

/// Status catalog entry
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub sort_order: i32,
}

/// Online user response
#[derive(Debug, Deserialize)]
pub struct OnlineUserResponse {
    pub id: String,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: Option<StatusResponse>,
    #[serde(default)]
    pub status_message: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

/// Admin user response
#[derive(Debug, Deserialize)]
pub struct AdminUserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub is_banned: bool,
    #[serde(default)]
    pub ban_reason: Option<String>,
}

/// Admin user listing
#[derive(Debug, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<AdminUserResponse>,
    pub total: i64,
    pub counts: UserCounts,
}

/// Aggregate user counts
#[derive(Debug, Deserialize)]
pub struct UserCounts {
    pub admins: i64,
    pub users: i64,
    pub online: i64,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
