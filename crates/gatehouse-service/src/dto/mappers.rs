//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use gatehouse_core::entities::{Session, User};

use super::responses::{SessionResponse, UserResponse};

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            enabled: user.enabled,
            created: user.created_at,
            updated: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            agent: session.agent.clone(),
            ip: session.ip.clone(),
            active: session.active,
            expires: session.expires,
            created: session.created,
        }
    }
}
