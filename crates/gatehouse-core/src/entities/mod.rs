//! Domain entities - core business objects

mod code;
mod session;
mod user;

pub use code::{OneTimeCode, CODE_LENGTH, CODE_TTL_SECONDS, MAX_CODE_ATTEMPTS};
pub use session::Session;
pub use user::User;
