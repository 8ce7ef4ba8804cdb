//! Channel entity <-> model mapper

use relay_core::entities::Channel;
use relay_core::value_objects::Snowflake;

use crate::models::ChannelModel;

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            is_group: model.is_group,
            is_active: model.is_active,
            created_by: model.created_by.map(Snowflake::new),
            direct_key: model.direct_key,
            last_message_at: model.last_message_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
