//! Membership entity <-> model mapper

use relay_core::entities::Membership;
use relay_core::value_objects::Snowflake;

use crate::models::MembershipModel;

impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership {
            channel_id: Snowflake::new(model.channel_id),
            user_id: Snowflake::new(model.user_id),
            is_admin: model.is_admin,
            is_muted: model.is_muted,
            joined_at: model.joined_at,
            last_read_at: model.last_read_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
