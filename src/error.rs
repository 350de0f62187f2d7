use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::db::store::StoreError;
use crate::services::pricing_service::PricingError;
use crate::services::wizard::{SubmitError, WizardError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(what.to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}

impl From<SubmitError<ApiError>> for ApiError {
    fn from(err: SubmitError<ApiError>) -> Self {
        match err {
            SubmitError::Wizard(err) => ApiError::Wizard(err),
            SubmitError::Handler(err) => err,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Wizard(WizardError::NoSteps) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Wizard(_) => StatusCode::CONFLICT,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("request failed: {}", self);
        } else {
            log::debug!("request rejected ({}): {}", status, self);
        }
        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("Vehicle").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Pricing(PricingError::InvalidRange { days: 0 }).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Wizard(WizardError::Busy).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::not_found("Agency").to_string(), "Agency not found");
    }
}
