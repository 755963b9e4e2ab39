//! Session model -> entity mapper

use gatehouse_core::entities::Session;

use crate::models::SessionModel;

impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Session {
            id: model.id,
            user_id: model.user_id,
            agent: model.agent,
            ip: model.ip,
            refresh_token: model.refresh_token,
            active: model.active,
            expires: model.expires,
            created: model.created,
            updated: model.updated,
        }
    }
}
