//! Contact Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use auth::AuthError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::ValidationErrors;
use thiserror::Error;

use crate::domain::value_object::contact_status::ContactStatus;

pub type ContactResult<T> = Result<T, ContactError>;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Contact request not found")]
    NotFound,

    /// Unknown user, or a user who is not an artist
    #[error("Artist not found")]
    ArtistNotFound,

    #[error("Contact request has already been {0}")]
    AlreadyResponded(ContactStatus),

    #[error("The submitted form contains errors")]
    Validation(ValidationErrors),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ContactError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContactError::NotFound | ContactError::ArtistNotFound => StatusCode::NOT_FOUND,
            ContactError::AlreadyResponded(_) => StatusCode::CONFLICT,
            ContactError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ContactError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ContactError::Database(_) | ContactError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ContactError::NotFound | ContactError::ArtistNotFound => ErrorKind::NotFound,
            ContactError::AlreadyResponded(_) => ErrorKind::Conflict,
            ContactError::Validation(_) => ErrorKind::UnprocessableEntity,
            ContactError::InvalidInput(_) => ErrorKind::BadRequest,
            ContactError::Database(_) | ContactError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            ContactError::Validation(errors) => AppError::validation(errors.clone()),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ContactError::Database(e) => {
                tracing::error!(error = %e, "Contact database error");
            }
            ContactError::Internal(msg) => {
                tracing::error!(message = %msg, "Contact internal error");
            }
            ContactError::AlreadyResponded(status) => {
                tracing::info!(%status, "Response to an answered contact request");
            }
            _ => {
                tracing::debug!(error = %self, "Contact error");
            }
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<ValidationErrors> for ContactError {
    fn from(errors: ValidationErrors) -> Self {
        ContactError::Validation(errors)
    }
}

impl From<AppError> for ContactError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => ContactError::InvalidInput(err.message().to_string()),
            _ => ContactError::Internal(err.to_string()),
        }
    }
}

/// Failures of the artist lookup
impl From<AuthError> for ContactError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(e) => ContactError::Database(e),
            AuthError::UserNotFound => ContactError::ArtistNotFound,
            other => ContactError::Internal(other.to_string()),
        }
    }
}
