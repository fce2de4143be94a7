// ABOUTME: Axum IntoResponse implementation for AppError
// ABOUTME: Renders every failure as {"detail": message} with a flattened status code

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use tracing::{error, warn};

use super::{AppError, ErrorKind, ErrorResponse};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.kind() == ErrorKind::Validation {
            warn!(code = ?self.code, "Rejected request: {}", self.message);
        } else {
            error!(code = ?self.code, kind = ?self.kind(), "Request failed: {}", self.message);
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}
