//! Validated JSON extractor
//!
//! Extracts and validates JSON request bodies using the validator crate.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use gatehouse_common::Fault;
use gatehouse_service::dto::validation_fault;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// Validated JSON extractor
///
/// Malformed bodies are rejected as `BAD_REQUEST`; bodies that parse but
/// fail validation are rejected as `VALIDATION_ERROR` with per-field messages.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| Fault::bad_request(rejection_message(&e)))?;

        value.validate().map_err(|e| validation_fault(&e))?;

        Ok(ValidatedJson(value))
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "expected request with `Content-Type: application/json`".to_string()
        }
        JsonRejection::JsonSyntaxError(e) => format!("malformed request body: {}", e.body_text()),
        JsonRejection::JsonDataError(e) => format!("invalid request body: {}", e.body_text()),
        other => other.body_text(),
    }
}
