//! Status entity <-> model mapper

use relay_core::entities::Status;
use relay_core::value_objects::Snowflake;

use crate::models::StatusModel;

impl From<StatusModel> for Status {
    fn from(model: StatusModel) -> Self {
        Status {
            id: Snowflake::new(model.id),
            name: model.name,
            color: model.color,
            icon: model.icon,
            is_available: model.is_available,
            sort_order: model.sort_order,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
