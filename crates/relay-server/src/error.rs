//! HTTP error type.
//!
//! Every failure a handler or gate can produce ends up as an [`ApiError`],
//! whose [`IntoResponse`] impl is the single place errors become the
//! `{status:false, code, result:{message}}` envelope.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use relay_core::{SettingsError, failure};
use relay_sources::SourceError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// No credentials were presented.
    #[error("{0}")]
    Unauthorized(String),

    /// Credentials were presented but are not accepted.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after: u64 },

    /// An integration call failed; the status comes from [`SourceError::code`].
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Source(err) => {
                StatusCode::from_u16(err.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            },
            Self::Settings(err) if err.is_invalid() => StatusCode::BAD_REQUEST,
            Self::Settings(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Self::Source(err) if !err.is_client_error() => {
                warn!(code = status.as_u16(), error = %err, "Upstream call failed");
            },
            Self::Settings(_) | Self::Internal(_) if status.is_server_error() => {
                error!(error = %self, "Internal error");
            },
            _ => {},
        }

        let mut envelope = failure(status.as_u16(), self.to_string());
        let retry_after = match self {
            Self::RateLimited { retry_after } => Some(retry_after),
            _ => None,
        };
        if let Some(seconds) = retry_after {
            envelope = envelope.retry_after(seconds);
        }

        let mut response = (status, Json(envelope)).into_response();
        if let Some(seconds) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
