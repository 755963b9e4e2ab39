//! Tagged application faults
//!
//! A [`Fault`] carries a stable [`Tag`] assigned where the failure is first
//! detected. Outer layers propagate it with `?` instead of re-wrapping, and
//! [`tag_of`] recovers the first tag found along an error's source chain.

use std::error::Error as StdError;
use std::fmt;

use gatehouse_core::DomainError;
use serde::{Deserialize, Serialize};

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Stable error classification rendered to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tag {
    BadRequest,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    ValidationError,
    UnprocessableEntity,
    LockedUser,
    DisabledUser,
    Expired,
    MailerError,
    CacheMiss,
    TooManyRequests,
    InternalServerError,
    Untagged,
}

impl Tag {
    /// HTTP status code for this tag
    pub fn status_code(self) -> u16 {
        match self {
            Self::BadRequest | Self::Expired => 400,
            Self::Unauthorized | Self::LockedUser | Self::DisabledUser => 401,
            Self::Forbidden => 403,
            Self::NotFound | Self::CacheMiss => 404,
            Self::Conflict => 409,
            Self::ValidationError | Self::UnprocessableEntity => 422,
            Self::TooManyRequests => 429,
            Self::MailerError | Self::InternalServerError | Self::Untagged => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            Self::LockedUser => "LOCKED_USER",
            Self::DisabledUser => "DISABLED_USER",
            Self::Expired => "EXPIRED",
            Self::MailerError => "MAILER_ERROR",
            Self::CacheMiss => "CACHE_MISS",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
            Self::Untagged => "UNTAGGED",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Tagged error with a client-safe message and an optional cause
#[derive(Debug)]
pub struct Fault {
    tag: Tag,
    message: String,
    fields: Vec<FieldError>,
    source: Option<BoxError>,
}

impl Fault {
    pub fn new(tag: Tag, message: impl Into<String>) -> Self {
        Self {
            tag,
            message: message.into(),
            fields: Vec::new(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(Tag::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Tag::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(Tag::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(Tag::Forbidden, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(Tag::Conflict, message)
    }

    /// Malformed input, carrying per-field messages
    pub fn validation(message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        Self::new(Tag::ValidationError, message).with_fields(fields)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(Tag::UnprocessableEntity, message)
    }

    pub fn locked_user(message: impl Into<String>) -> Self {
        Self::new(Tag::LockedUser, message)
    }

    pub fn disabled_user(message: impl Into<String>) -> Self {
        Self::new(Tag::DisabledUser, message)
    }

    pub fn expired(message: impl Into<String>) -> Self {
        Self::new(Tag::Expired, message)
    }

    pub fn mailer(message: impl Into<String>) -> Self {
        Self::new(Tag::MailerError, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(Tag::TooManyRequests, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Tag::InternalServerError, message)
    }

    /// Attach the underlying cause
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldError>) -> Self {
        self.fields = fields;
        self
    }

    #[inline]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn status_code(&self) -> u16 {
        self.tag.status_code()
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.message)
    }
}

impl StdError for Fault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn StdError + 'static))
    }
}

/// Return the tag of the first [`Fault`] along the source chain.
///
/// Yields [`Tag::Untagged`] when no fault is found.
pub fn tag_of(err: &(dyn StdError + 'static)) -> Tag {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(fault) = err.downcast_ref::<Fault>() {
            return fault.tag;
        }
        current = err.source();
    }
    Tag::Untagged
}

impl From<DomainError> for Fault {
    fn from(err: DomainError) -> Self {
        let fault = match &err {
            DomainError::NotFound(resource) => Self::not_found(format!("{resource} not found")),
            DomainError::UniqueViolation { field } => Self::conflict(format!("{field} already taken")),
            DomainError::ValidationError(msg) => Self::validation(msg.clone(), Vec::new()),
            DomainError::InvalidEntity(msg) => Self::unprocessable(msg.clone()),
            DomainError::Timeout(_) | DomainError::DatabaseError(_) => {
                Self::bad_request("storage operation failed")
            }
            DomainError::CacheError(_) => Self::new(Tag::CacheMiss, "cache unavailable"),
            DomainError::InternalError(_) => Self::internal("internal error"),
        };
        fault.with_source(err)
    }
}

/// Result type alias for operations that fail with a [`Fault`]
pub type FaultResult<T> = Result<T, Fault>;

/// Error body sent to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub tag: Tag,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl From<&Fault> for ErrorResponse {
    fn from(fault: &Fault) -> Self {
        // Server-side details stay in the logs
        let message = if fault.is_server_error() && fault.tag != Tag::MailerError {
            "internal server error".to_string()
        } else {
            fault.message.clone()
        };
        Self {
            tag: fault.tag,
            message,
            fields: fault.fields.clone(),
        }
    }
}
