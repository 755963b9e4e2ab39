//! One-time code model -> entity mapper

use gatehouse_core::entities::OneTimeCode;

use crate::models::CodeModel;

impl From<CodeModel> for OneTimeCode {
    fn from(model: CodeModel) -> Self {
        OneTimeCode {
            id: model.id,
            user_id: model.user_id,
            code: model.code,
            active: model.active,
            attempts: model.attempts,
            used_at: model.used_at,
            expires_at: model.expires_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
