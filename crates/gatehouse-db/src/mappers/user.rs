//! User model -> entity mapper

use gatehouse_core::entities::User;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            name: model.name,
            username: model.username,
            email: model.email,
            avatar_url: model.avatar_url,
            enabled: model.enabled,
            locked: model.locked,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
