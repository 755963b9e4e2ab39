//! Error taxonomy shared by every layer above the repositories

mod fault;

pub use fault::{tag_of, ErrorResponse, Fault, FaultResult, FieldError, Tag};
