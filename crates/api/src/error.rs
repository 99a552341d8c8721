//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::PlaceOrderError;
use storage::StorageError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Order placement failure.
    Placement(PlaceOrderError),
    /// Storage failure outside the placement workflow.
    Storage(StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Placement(err) => placement_error_to_response(err),
            ApiError::Storage(err) => storage_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn placement_error_to_response(err: PlaceOrderError) -> (StatusCode, String) {
    match &err {
        PlaceOrderError::CustomerNotFound(_)
        | PlaceOrderError::NoProductsFound
        | PlaceOrderError::ProductsNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        PlaceOrderError::InsufficientStock { .. } => (StatusCode::CONFLICT, err.to_string()),
        PlaceOrderError::InvalidQuantity { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        PlaceOrderError::Storage(storage_err) => match storage_err {
            StorageError::Duplicate { .. } => (StatusCode::CONFLICT, err.to_string()),
            StorageError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
            _ => {
                tracing::error!(error = %err, "placement storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        },
    }
}

fn storage_error_to_response(err: StorageError) -> (StatusCode, String) {
    match &err {
        StorageError::Duplicate { .. } => (StatusCode::CONFLICT, err.to_string()),
        StorageError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        _ => {
            tracing::error!(error = %err, "internal storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<PlaceOrderError> for ApiError {
    fn from(err: PlaceOrderError) -> Self {
        ApiError::Placement(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}
