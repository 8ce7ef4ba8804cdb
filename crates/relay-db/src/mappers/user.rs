//! User entity <-> model mapper

use relay_core::entities::{User, UserRole};
use relay_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            name: model.name,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            avatar: model.avatar,
            role: UserRole::from(model.role.as_str()),
            is_active: model.is_active,
            is_banned: model.is_banned,
            ban_reason: model.ban_reason,
            banned_at: model.banned_at,
            status_id: model.status_id.map(Snowflake::new),
            status_message: model.status_message,
            last_seen_at: model.last_seen_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
