pub mod sync;

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use calmirror_core::CalMirrorError;
use tracing::error;

/// Maps a failed run to the plain-text trigger response.
///
/// Caller mistakes are echoed back; everything else stays in the log.
pub struct AppError(CalMirrorError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0 {
            CalMirrorError::Config(message) => bad_request(&message),
            err @ CalMirrorError::CalendarNotFound(_) => bad_request(&err.to_string()),
            err => {
                error!(error = %err, "Sync failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

fn bad_request(message: &str) -> Response {
    error!(message, "Rejected sync request");
    (StatusCode::BAD_REQUEST, format!("BAD REQUEST\n{}", message)).into_response()
}

impl From<CalMirrorError> for AppError {
    fn from(err: CalMirrorError) -> Self {
        Self(err)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self(CalMirrorError::Config(rejection.body_text()))
    }
}
