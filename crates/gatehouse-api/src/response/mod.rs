//! Response types and error handling for API endpoints
//!
//! Every failure reaching a handler boundary is a [`Fault`]; [`ApiError`]
//! renders it as an [`ErrorResponse`] with the status derived from its tag.

use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gatehouse_common::{ErrorResponse, Fault};
use tracing::{error, warn};

/// API error wrapping a tagged fault
#[derive(Debug)]
pub struct ApiError(pub Fault);

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    #[must_use]
    pub fn fault(&self) -> &Fault {
        &self.0
    }
}

impl From<Fault> for ApiError {
    fn from(fault: Fault) -> Self {
        Self(fault)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(
                tag = self.0.tag().as_str(),
                message = %self.0.message(),
                cause = ?source_chain(&self.0),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(tag = self.0.tag().as_str(), message = %self.0.message(), "Request rejected");
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

/// Messages of every error below the fault itself
fn source_chain(fault: &Fault) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = fault.source();
    while let Some(err) = current {
        chain.push(err.to_string());
        current = err.source();
    }
    chain
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Created response (201) with JSON body
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = self.0.into_response();
        *response.status_mut() = StatusCode::CREATED;
        response
    }
}

/// No content response (204)
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}
