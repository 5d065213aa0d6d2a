//! Response types for the diária ledger API.
//!
//! This module defines the listing and error response structures and the
//! mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{LedgerTotals, ShiftListing};

/// Response body of `GET /shifts`.
#[derive(Debug, Clone, Serialize)]
pub struct ShiftListResponse {
    /// Matching shifts in ledger order.
    pub shifts: Vec<ShiftListing>,
    /// Totals over `shifts`.
    pub totals: LedgerTotals,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an authentication error response.
    pub fn unauthenticated() -> Self {
        Self::with_details(
            "UNAUTHENTICATED",
            "Authentication required",
            "Send x-username and x-password-hash headers for a configured user",
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// 400 with a validation error body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// 401 with an authentication error body.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::unauthenticated(),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidField { field, .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details("VALIDATION_ERROR", message, field),
            },
            EngineError::InvalidShiftInterval { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_SHIFT_INTERVAL",
                    message,
                    "The shift must end after it starts",
                ),
            },
            EngineError::MissingRateConfiguration { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "MISSING_RATE_CONFIGURATION",
                    message,
                    "Configure weekend rates for the company or remove its override weekdays",
                ),
            },
            EngineError::AmountOverflow { amount } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details("AMOUNT_OVERFLOW", message, amount),
            },
            EngineError::NotFound { entity, .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details("NOT_FOUND", message, entity),
            },
            EngineError::DuplicateName { entity, .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details("DUPLICATE_NAME", message, entity),
            },
            EngineError::AccessDenied { .. } => ApiErrorResponse {
                status: StatusCode::FORBIDDEN,
                error: ApiError::new("ACCESS_DENIED", message),
            },
            EngineError::Persistence { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("PERSISTENCE_ERROR", "Storage failure", message),
            },
            EngineError::Export { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("EXPORT_ERROR", "Export failed", message),
            },
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
        }
    }
}
