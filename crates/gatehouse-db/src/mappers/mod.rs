//! Model to entity mappers
//!
//! `From<Model> for Entity` converts database rows into domain objects.

mod code;
mod session;
mod user;
