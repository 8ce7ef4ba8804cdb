//! Message entity <-> model mapper

use relay_core::entities::Message;
use relay_core::value_objects::Snowflake;

use crate::models::MessageModel;

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            channel_id: Snowflake::new(model.channel_id),
            user_id: Snowflake::new(model.user_id),
            content: model.content,
            attachment: model.attachment,
            attachment_type: model.attachment_type,
            created_at: model.created_at,
            updated_at: model.updated_at,
            edited_at: model.edited_at,
        }
    }
}
