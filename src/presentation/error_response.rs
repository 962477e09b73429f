// Maps dashboard errors onto HTTP responses
use crate::domain::error::DashboardError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SourceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::RequestTimedOut { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::MalformedLog { .. } | Self::MalformedConfig(_) => StatusCode::BAD_GATEWAY,
            Self::DeviceRejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::LocalValidationFailed(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Device action failed");
        }
        (status, Json(self.notification())).into_response()
    }
}
