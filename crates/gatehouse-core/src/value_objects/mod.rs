//! Value objects - small immutable types that represent domain concepts

mod agent;
mod uid;

pub use agent::{describe_agent, UNKNOWN_AGENT};
pub use uid::{new_uid, UidPrefix};
