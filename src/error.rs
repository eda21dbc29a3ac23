use actix_web::{http::StatusCode, ResponseError};
use thiserror::Error;

use crate::response::response_from_error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A submitted field failed validation. Carries the form field name.
    #[error("Invalid {0}")]
    Invalid(&'static str),

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal Server Error")]
    System,

    /// The request passed validation but its transaction could not be committed.
    #[error("Internal Server Error")]
    Fatal(String),
}

impl AppError {
    pub fn invalid(field: &'static str) -> Self {
        Self::Invalid(field)
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn system_exception() -> Self {
        Self::System
    }

    pub fn fatal(err: impl ToString) -> Self {
        Self::Fatal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::System | Self::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        response_from_error(self)
    }
}
