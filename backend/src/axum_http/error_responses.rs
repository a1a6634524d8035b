use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crates::{
    domain::value_objects::entitlements::{Denial, GatedAction},
    payments::gateway::GatewayError,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{}", .action.denial_message(.denial))]
    EntitlementDenied { action: GatedAction, denial: Denial },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) | AppError::EntitlementDenied { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected(message) => AppError::BadRequest(message),
            GatewayError::Unavailable(err) => AppError::Internal(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let AppError::Internal(err) = &self {
            error!(error = ?err, "http: request failed with internal error");
        }

        // Internal variants only ever display the generic text.
        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entitlement_denials_render_as_forbidden_with_gate_text() {
        let err = AppError::EntitlementDenied {
            action: GatedAction::CreateProduct,
            denial: Denial::QuotaExceeded { current: 3, quota: 3 },
        };

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            err.to_string(),
            "Product limit exceeded for your subscription plan"
        );
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = AppError::from(anyhow::anyhow!("connection refused on 10.0.0.5"));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn gateway_rejections_are_bad_requests() {
        let rejected = AppError::from(GatewayError::Rejected("Your card was declined.".to_string()));
        let unavailable = AppError::from(GatewayError::Unavailable(anyhow::anyhow!("timeout")));

        assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(rejected.to_string(), "Your card was declined.");
        assert_eq!(unavailable.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_carries_code_and_message() {
        let body = ErrorResponse {
            code: StatusCode::CONFLICT.as_u16(),
            message: "Client already has an active subscription".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "code": 409,
                "message": "Client already has an active subscription"
            })
        );
    }
}
