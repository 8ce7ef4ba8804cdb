//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, check_test_env, fixtures::*, TestServer};
use relay_core::Snowflake;
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/channels").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get_auth("/api/v1/channels", "not-a-real-token")
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Direct Channel Tests
// ============================================================================

#[tokio::test]
async fn test_create_direct_channel_idempotent() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    // First creation returns 201
    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let created: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(!created.is_group);
    assert_eq!(created.members.len(), 2);

    // Same pair from the other side returns the existing channel with 200
    let response = server
        .post_auth(
            "/api/v1/channels",
            &bob.token,
            &CreateChannelRequest::direct(alice.id),
        )
        .await
        .unwrap();
    let existing: ChannelResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(existing.id, created.id);
}

#[tokio::test]
async fn test_direct_channel_with_self_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(alice.id),
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(err.error.code, "SELF_DIRECT_CHANNEL");
}

#[tokio::test]
async fn test_direct_channel_members_immutable() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();
    let carol = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Adding a third participant is rejected
    let response = server
        .post_auth(
            &format!("/api/v1/channels/{}/members", channel.id),
            &alice.token,
            &MemberRequest { user_id: carol.id },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.error.code, "DIRECT_CHANNEL_IMMUTABLE");
}

#[tokio::test]
async fn test_leave_direct_channel() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Anyone may walk away from a conversation
    let response = server
        .post_auth(
            &format!("/api/v1/channels/{}/leave", channel.id),
            &alice.token,
            &(),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/channels/{}", channel.id), &alice.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Group Channel Tests
// ============================================================================

#[tokio::test]
async fn test_create_group_channel() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let request = CreateChannelRequest::group(vec![bob.id]);
    let response = server
        .post_auth("/api/v1/channels", &alice.token, &request)
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert!(channel.is_group);
    assert_eq!(channel.name, request.name.unwrap());
    assert_eq!(channel.members.len(), 2);

    // Creator holds channel admin
    let creator = channel
        .members
        .iter()
        .find(|m| m.user.id == alice.id.to_string())
        .expect("creator missing from members");
    assert!(creator.is_admin);
}

#[tokio::test]
async fn test_group_channel_requires_name() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let request = CreateChannelRequest {
        name: None,
        description: None,
        is_group: true,
        member_ids: vec![bob.id],
    };
    let response = server
        .post_auth("/api/v1/channels", &alice.token, &request)
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_channel_requires_admin() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::group(vec![bob.id]),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let update = UpdateChannelRequest {
        name: Some("Renamed".to_string()),
        description: None,
        is_active: None,
    };

    // Plain member cannot rename
    let response = server
        .put_auth(
            &format!("/api/v1/channels/{}", channel.id),
            &bob.token,
            &update,
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(err.error.code, "NOT_CHANNEL_ADMIN");

    // Creator can
    let response = server
        .put_auth(
            &format!("/api/v1/channels/{}", channel.id),
            &alice.token,
            &update,
        )
        .await
        .unwrap();
    let updated: ChannelResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.name, "Renamed");

    // Archiving goes through the same endpoint
    let response = server
        .put_auth(
            &format!("/api/v1/channels/{}", channel.id),
            &alice.token,
            &UpdateChannelRequest {
                name: None,
                description: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
    let archived: ChannelResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!archived.is_active);
}

#[tokio::test]
async fn test_add_and_remove_member() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();
    let carol = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::group(vec![bob.id]),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Add carol
    let response = server
        .post_auth(
            &format!("/api/v1/channels/{}/members", channel.id),
            &alice.token,
            &MemberRequest { user_id: carol.id },
        )
        .await
        .unwrap();
    let member: MemberResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(member.user.id, carol.id.to_string());
    assert!(!member.is_admin);

    // Carol can now read the channel
    let response = server
        .get_auth(&format!("/api/v1/channels/{}", channel.id), &carol.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // Remove carol
    let response = server
        .delete_auth_json(
            &format!("/api/v1/channels/{}/members", channel.id),
            &alice.token,
            &MemberRequest { user_id: carol.id },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Access is gone
    let response = server
        .get_auth(&format!("/api/v1/channels/{}", channel.id), &carol.token)
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(err.error.code, "NOT_CHANNEL_MEMBER");
}

#[tokio::test]
async fn test_leave_group_channel() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::group(vec![bob.id]),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/channels/{}/leave", channel.id),
            &bob.token,
            &(),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Leaving twice reports the membership conflict
    let response = server
        .post_auth(
            &format!("/api/v1/channels/{}/leave", channel.id),
            &bob.token,
            &(),
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(err.error.code, "NOT_A_MEMBER");
}

#[tokio::test]
async fn test_non_member_and_missing_channel_look_identical() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();
    let outsider = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Existing channel the outsider does not belong to
    let response = server
        .get_auth(&format!("/api/v1/channels/{}", channel.id), &outsider.token)
        .await
        .unwrap();
    let existing_err: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();

    // Channel id that does not exist at all
    let bogus = Snowflake::from(1_234_567_890_123_456_789_i64);
    let response = server
        .get_auth(&format!("/api/v1/channels/{}", bogus), &outsider.token)
        .await
        .unwrap();
    let missing_err: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();

    assert_eq!(existing_err.error.code, missing_err.error.code);
    assert_eq!(existing_err.error.message, missing_err.error.message);
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_message_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let messages_path = format!("/api/v1/channels/{}/messages", channel.id);

    // Send
    let response = server
        .post_auth(
            &messages_path,
            &alice.token,
            &CreateMessageRequest::simple("Hello, Bob!"),
        )
        .await
        .unwrap();
    let message: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(message.content.as_deref(), Some("Hello, Bob!"));
    assert_eq!(message.author.id, alice.id.to_string());
    assert!(message.edited_at.is_none());

    // The counterpart sees it
    let response = server.get_auth(&messages_path, &bob.token).await.unwrap();
    let page: MessagePage = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(page.data.iter().any(|m| m.id == message.id));

    // Only the author may edit
    let message_path = format!("{}/{}", messages_path, message.id);
    let response = server
        .put_auth(
            &message_path,
            &bob.token,
            &UpdateMessageRequest {
                content: "hijacked".to_string(),
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(err.error.code, "NOT_MESSAGE_AUTHOR");

    let response = server
        .put_auth(
            &message_path,
            &alice.token,
            &UpdateMessageRequest {
                content: "Hello again, Bob!".to_string(),
            },
        )
        .await
        .unwrap();
    let edited: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(edited.content.as_deref(), Some("Hello again, Bob!"));
    assert!(edited.edited_at.is_some());

    // Delete and verify it is gone
    let response = server.delete_auth(&message_path, &alice.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_auth(&message_path, &alice.token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_empty_message_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Whitespace-only content with no attachment
    let response = server
        .post_auth(
            &format!("/api/v1/channels/{}/messages", channel.id),
            &alice.token,
            &CreateMessageRequest::simple("   "),
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(err.error.code, "CONTENT_REQUIRED");
}

#[tokio::test]
async fn test_oversized_message_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/channels/{}/messages", channel.id),
            &alice.token,
            &CreateMessageRequest::simple(&"x".repeat(5001)),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_outsider_cannot_post_message() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();
    let outsider = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Membership is checked before the body, so even an invalid message
    // yields the access error
    let response = server
        .post_auth(
            &format!("/api/v1/channels/{}/messages", channel.id),
            &outsider.token,
            &CreateMessageRequest::simple(""),
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(err.error.code, "NOT_CHANNEL_MEMBER");
}

// ============================================================================
// Unread / Read Cursor Tests
// ============================================================================

#[tokio::test]
async fn test_unread_counts_and_mark_read() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    for i in 0..3 {
        server
            .post_auth(
                &format!("/api/v1/channels/{}/messages", channel.id),
                &alice.token,
                &CreateMessageRequest::simple(&format!("Message {i}")),
            )
            .await
            .unwrap();
    }

    // Bob has three unread in this channel
    let response = server
        .get_auth("/api/v1/messages/unread-count", &bob.token)
        .await
        .unwrap();
    let counts: UnreadCountsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let entry = counts
        .channels
        .iter()
        .find(|c| c.channel_id == channel.id)
        .expect("channel missing from unread counts");
    assert_eq!(entry.count, 3);
    assert!(counts.total >= 3);

    // Mark read
    let response = server
        .post_auth(
            &format!("/api/v1/channels/{}/messages/mark-as-read", channel.id),
            &bob.token,
            &(),
        )
        .await
        .unwrap();
    let marked: MarkReadResponse = assert_json(response, StatusCode::OK).await.unwrap();

    // Cursor cleared the channel
    let response = server
        .get_auth("/api/v1/messages/unread-count", &bob.token)
        .await
        .unwrap();
    let counts: UnreadCountsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    let count = counts
        .channels
        .iter()
        .find(|c| c.channel_id == channel.id)
        .map_or(0, |c| c.count);
    assert_eq!(count, 0);

    // Cursor is visible on the channel itself
    let response = server
        .get_auth(&format!("/api/v1/channels/{}", channel.id), &bob.token)
        .await
        .unwrap();
    let refreshed: ChannelResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(refreshed.last_read_at, Some(marked.last_read_at));
    assert_eq!(refreshed.unread_count, 0);
}

#[tokio::test]
async fn test_last_message_at_tracks_newest_message() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(channel.last_message_at.is_none());

    let channel_path = format!("/api/v1/channels/{}", channel.id);
    let messages_path = format!("{channel_path}/messages");

    let response = server
        .post_auth(
            &messages_path,
            &alice.token,
            &CreateMessageRequest::simple("first"),
        )
        .await
        .unwrap();
    let first: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    // Read the stored message back so timestamps share database precision
    let response = server
        .get_auth(&format!("{messages_path}/{}", first.id), &alice.token)
        .await
        .unwrap();
    let first: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth(&channel_path, &alice.token).await.unwrap();
    let after_first: ChannelResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(after_first.last_message_at, Some(first.created_at));

    let response = server
        .post_auth(
            &messages_path,
            &bob.token,
            &CreateMessageRequest::simple("second"),
        )
        .await
        .unwrap();
    let second: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .get_auth(&format!("{messages_path}/{}", second.id), &alice.token)
        .await
        .unwrap();
    let second: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();

    // The activity timestamp advances to the newest message and never regresses
    let response = server.get_auth(&channel_path, &alice.token).await.unwrap();
    let after_second: ChannelResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(after_second.last_message_at, Some(second.created_at));
    assert!(after_second.last_message_at >= after_first.last_message_at);
}

#[tokio::test]
async fn test_message_pagination() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/channels",
            &alice.token,
            &CreateChannelRequest::direct(bob.id),
        )
        .await
        .unwrap();
    let channel: ChannelResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let messages_path = format!("/api/v1/channels/{}/messages", channel.id);

    for i in 0..5 {
        server
            .post_auth(
                &messages_path,
                &alice.token,
                &CreateMessageRequest::simple(&format!("Message {i}")),
            )
            .await
            .unwrap();
    }

    // First page, newest first
    let response = server
        .get_auth(&format!("{messages_path}?limit=2"), &bob.token)
        .await
        .unwrap();
    let page: MessagePage = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.data.len(), 2);
    assert!(page.pagination.has_more);
    assert_eq!(page.data[0].content.as_deref(), Some("Message 4"));
    let cursor = page.pagination.before.expect("missing before cursor");

    // Second page continues past the cursor
    let response = server
        .get_auth(
            &format!("{messages_path}?limit=2&before={cursor}"),
            &bob.token,
        )
        .await
        .unwrap();
    let next: MessagePage = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(next.data.len(), 2);
    assert_eq!(next.data[0].content.as_deref(), Some("Message 2"));
}

// ============================================================================
// Presence Tests
// ============================================================================

#[tokio::test]
async fn test_status_catalog() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();

    let response = server
        .get_auth("/api/v1/statuses", &alice.token)
        .await
        .unwrap();
    let statuses: Vec<StatusResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(statuses.len() >= 4);
    assert!(statuses.iter().any(|s| s.name == "Available"));
}

#[tokio::test]
async fn test_heartbeat_marks_user_online() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();
    let bob = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth("/api/v1/statuses/heartbeat", &alice.token, &())
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Bob sees alice online; the caller is excluded from their own listing
    let response = server
        .get_auth("/api/v1/statuses/online-users", &bob.token)
        .await
        .unwrap();
    let online: Vec<OnlineUserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(online.iter().any(|u| u.id == alice.id.to_string()));
    assert!(!online.iter().any(|u| u.id == bob.id.to_string()));
}

#[tokio::test]
async fn test_update_status() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();

    // Status 1 is seeded as "Available"
    let response = server
        .post_auth(
            "/api/v1/statuses/user",
            &alice.token,
            &UpdateStatusRequest {
                status_id: Snowflake::from(1),
                status_message: Some("Reviewing".to_string()),
            },
        )
        .await
        .unwrap();
    let user: UserSummaryResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.status_message.as_deref(), Some("Reviewing"));
    assert!(user.is_online);
}

#[tokio::test]
async fn test_update_status_unknown_status() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let alice = seed_member(&pool).await.unwrap();

    let response = server
        .post_auth(
            "/api/v1/statuses/user",
            &alice.token,
            &UpdateStatusRequest {
                status_id: Snowflake::from(999_999),
                status_message: None,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_list_users() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let admin = seed_admin(&pool).await.unwrap();
    let member = seed_member(&pool).await.unwrap();

    let response = server
        .get_auth("/api/v1/admin/users", &admin.token)
        .await
        .unwrap();
    let listing: UserListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(listing.total >= 2);
    assert!(listing.counts.admins >= 1);

    // Regular users are turned away
    let response = server
        .get_auth("/api/v1/admin/users", &member.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_admin_user_search() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let admin = seed_admin(&pool).await.unwrap();
    let member = seed_member(&pool).await.unwrap();

    let response = server
        .get_auth(
            &format!("/api/v1/admin/users?search={}", member.name),
            &admin.token,
        )
        .await
        .unwrap();
    let listing: UserListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(listing
        .users
        .iter()
        .any(|u| u.id == member.id.to_string()));
}

#[tokio::test]
async fn test_admin_ban_and_unban() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let admin = seed_admin(&pool).await.unwrap();
    let member = seed_member(&pool).await.unwrap();

    let path = format!("/api/v1/admin/users/{}/ban", member.id);

    let response = server
        .put_auth(
            &path,
            &admin.token,
            &SetBanRequest {
                banned: true,
                reason: Some("spam".to_string()),
            },
        )
        .await
        .unwrap();
    let banned: AdminUserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(banned.is_banned);
    assert_eq!(banned.ban_reason.as_deref(), Some("spam"));

    let response = server
        .put_auth(
            &path,
            &admin.token,
            &SetBanRequest {
                banned: false,
                reason: None,
            },
        )
        .await
        .unwrap();
    let unbanned: AdminUserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!unbanned.is_banned);
    assert!(unbanned.ban_reason.is_none());
}

#[tokio::test]
async fn test_admin_change_role() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let admin = seed_admin(&pool).await.unwrap();
    let member = seed_member(&pool).await.unwrap();

    let response = server
        .put_auth(
            &format!("/api/v1/admin/users/{}/role", member.id),
            &admin.token,
            &ChangeRoleRequest {
                role: "admin".to_string(),
            },
        )
        .await
        .unwrap();
    let promoted: AdminUserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(promoted.role, "admin");
}

#[tokio::test]
async fn test_admin_self_actions_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let admin = seed_admin(&pool).await.unwrap();
    let base = format!("/api/v1/admin/users/{}", admin.id);

    let response = server
        .put_auth(
            &format!("{base}/role"),
            &admin.token,
            &ChangeRoleRequest {
                role: "user".to_string(),
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(err.error.code, "SELF_ROLE_CHANGE");

    let response = server
        .put_auth(
            &format!("{base}/ban"),
            &admin.token,
            &SetBanRequest {
                banned: true,
                reason: None,
            },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(err.error.code, "SELF_BAN");

    let response = server
        .put_auth(
            &format!("{base}/active"),
            &admin.token,
            &SetActiveRequest { active: false },
        )
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(err.error.code, "SELF_DEACTIVATE");

    let response = server.delete_auth(&base, &admin.token).await.unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNPROCESSABLE_ENTITY)
        .await
        .unwrap();
    assert_eq!(err.error.code, "SELF_DELETE");
}

#[tokio::test]
async fn test_admin_delete_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let pool = test_pool().await.unwrap();
    let admin = seed_admin(&pool).await.unwrap();
    let member = seed_member(&pool).await.unwrap();

    let response = server
        .delete_auth(&format!("/api/v1/admin/users/{}", member.id), &admin.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    // Deleting again reports the missing user
    let response = server
        .delete_auth(&format!("/api/v1/admin/users/{}", member.id), &admin.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
