//! Database models - SQLx-compatible structs for PostgreSQL tables

mod code;
mod session;
mod user;

pub use code::CodeModel;
pub use session::SessionModel;
pub use user::UserModel;
