//! Request handlers

pub mod analyze;
pub mod generate;
pub mod meta;
pub mod transform;

use axum::{
    body::Bytes,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::error::AppError;

/// Attribute `err` to the failing handler and log it at the right level
pub(crate) fn fail(err: AppError, label: &'static str) -> AppError {
    let err = err.during(label);
    if err.status().is_server_error() {
        error!(error = %err, "Request failed");
    } else {
        warn!(error = %err, "Rejected request");
    }
    err
}

/// Raw PNG body
pub(crate) fn png(bytes: Bytes) -> Response {
    ([(CONTENT_TYPE, "image/png")], bytes).into_response()
}
