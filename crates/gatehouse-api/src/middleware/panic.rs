//! Panic recovery
//!
//! Converts a panicking handler into a 500 response instead of dropping
//! the connection. The backtrace is only available at the panic site, so
//! it is logged by the process-wide hook, not by the response handler.

use std::any::Any;
use std::backtrace::Backtrace;

use axum::response::{IntoResponse, Response};
use gatehouse_common::Fault;
use tracing::error;

use crate::response::ApiError;

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    }
}

/// Log every panic with its location and a backtrace captured where it happened
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), ToString::to_string);
        error!(
            panic = %panic_message(info.payload()),
            %location,
            backtrace = %Backtrace::force_capture(),
            "Panic"
        );
    }));
}

/// Response for a request whose handler panicked
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    error!(panic = %panic_message(&*payload), "Request handler panicked");

    ApiError::from(Fault::internal("internal server error")).into_response()
}
