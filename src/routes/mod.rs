pub mod admin_api;
pub mod api;
pub mod public;

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};

use crate::api::ApiError;
use crate::models::FieldError;

/// Run a blocking backend call off the async workers.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    rocket::tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Unexpected(format!("worker failed: {}", e)))?
}

pub(crate) fn status_for(error: &ApiError) -> Status {
    Status::from_code(error.status_code()).unwrap_or(Status::BadGateway)
}

pub(crate) fn api_error_json(error: &ApiError) -> (Status, Json<Value>) {
    (
        status_for(error),
        Json(json!({
            "success": false,
            "kind": error.kind(),
            "error": error.to_string(),
        })),
    )
}

pub(crate) fn field_errors_json(errors: &[FieldError]) -> (Status, Json<Value>) {
    (
        Status::BadRequest,
        Json(json!({
            "success": false,
            "kind": "invalid_request",
            "errors": errors,
        })),
    )
}
