//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use core_kernel::PortError;
use domain_billing::BillingError;
use domain_party::PartyError;
use domain_policy::PolicyError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields: {}", .0.join(", "))]
    InvalidFields(Vec<String>),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) | ApiError::InvalidFields(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::Conflict(msg) => ("conflict", msg, None),
            ApiError::Internal(msg) => {
                error!(message = %msg, "Request failed");
                ("internal_error", "Internal server error".to_string(), None)
            }
            ApiError::Validation(msg) => ("validation_error", msg, None),
            ApiError::InvalidFields(fields) => (
                "validation_error",
                "Request has invalid fields".to_string(),
                Some(fields),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::PolicyNotFound(_) | BillingError::ContactNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            BillingError::PolicyCanceled { .. } => ApiError::Conflict(err.to_string()),
            BillingError::PaymentNotAllowed => ApiError::Forbidden(err.to_string()),
            BillingError::InvalidSchedule(_)
            | BillingError::NoOpScheduleChange(_)
            | BillingError::Validation(_)
            | BillingError::Policy(_)
            | BillingError::Money(_)
            | BillingError::Temporal(_) => ApiError::Validation(err.to_string()),
            BillingError::Store(port) => ApiError::from(port),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Conflict { .. } => ApiError::Conflict(err.to_string()),
            PortError::Validation { .. } => ApiError::Validation(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        ApiError::from(BillingError::from(err))
    }
}

impl From<PartyError> for ApiError {
    fn from(err: PartyError) -> Self {
        match err {
            PartyError::ContactNotFound(_) => ApiError::NotFound(err.to_string()),
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        ApiError::InvalidFields(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_billing_errors_map_to_statuses() {
        let canceled = BillingError::PolicyCanceled {
            cancel_date: NaiveDate::from_ymd_opt(2015, 3, 1).unwrap(),
            cancel_reason: "Non-payment".to_string(),
        };
        assert_eq!(ApiError::from(canceled).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(BillingError::PaymentNotAllowed).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(BillingError::NoOpScheduleChange("Annual".into())).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(BillingError::PolicyNotFound("POL-1".into())).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_store_failures_are_internal() {
        let err = BillingError::Store(PortError::connection("pool closed"));
        assert_eq!(ApiError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
