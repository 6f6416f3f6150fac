//! Error types for upstream integrations.

/// Errors that can occur while calling a third-party service.
///
/// Every variant maps to the HTTP status the gateway reports through
/// [`SourceError::code`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The caller supplied a missing or malformed parameter.
    #[error("{0}")]
    InvalidInput(String),

    /// The upstream answered but had nothing for this input.
    #[error("{0}")]
    NotFound(String),

    /// A single outbound call exceeded the configured timeout.
    #[error("upstream request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// A job did not finish within its polling budget.
    #[error("job did not complete after {attempts} status checks")]
    PollExhausted { attempts: u32 },

    /// The upstream returned a non-success HTTP status.
    #[error("upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The upstream answered 2xx but reported a failure in its payload.
    #[error("{service}: {message}")]
    Upstream { service: String, message: String },

    /// A long-running upstream job reported failure.
    #[error("job failed: {0}")]
    JobFailed(String),

    /// The upstream response did not have the expected shape.
    #[error("unexpected upstream response: {0}")]
    Parse(String),

    /// Transport level failure (DNS, TLS, connection reset).
    #[error("request failed: {0}")]
    Http(String),
}

impl SourceError {
    /// Creates an InvalidInput error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a NotFound error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Creates an Upstream error.
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Creates a Parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// HTTP status the gateway should answer with.
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Timeout { .. } | Self::PollExhausted { .. } => 408,
            Self::Status { .. }
            | Self::Upstream { .. }
            | Self::JobFailed(_)
            | Self::Parse(_)
            | Self::Http(_) => 500,
        }
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::PollExhausted { .. } | Self::Http(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound(_))
    }
}

/// Result alias for integration calls.
pub type Result<T> = std::result::Result<T, SourceError>;
