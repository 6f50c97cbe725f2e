//! Normalized error type shared by every upstream client.

use std::fmt;

/// Result alias for catalog and enrichment operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Boxed underlying cause attached to an [`ApiError`].
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of a failed upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The local rate limiter rejected the request before dispatch.
    RateLimited,
    /// No response was received (connect failure, timeout, broken body).
    Network,
    /// The upstream answered with a non-success status or an in-body failure marker.
    Upstream,
    /// The upstream rejected the API key (HTTP 401).
    InvalidCredentials,
    /// The requested resource does not exist (HTTP 404).
    NotFound,
    /// Anything that does not fit the other kinds.
    Unknown,
}

impl ErrorKind {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RateLimited => "RATE_LIMITED",
            Self::Network => "NETWORK_ERROR",
            Self::Upstream => "UPSTREAM_ERROR",
            Self::InvalidCredentials => "INVALID_API_KEY",
            Self::NotFound => "NOT_FOUND",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The single error shape surfaced by the API clients.
///
/// Transport and decoding errors never escape on their own; they are
/// classified into an [`ErrorKind`] and kept only as [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    status: Option<u16>,
    kind: ErrorKind,
    upstream_code: Option<String>,
    #[source]
    source: Option<BoxError>,
}

impl ApiError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            kind,
            upstream_code: None,
            source: None,
        }
    }

    /// Attaches the HTTP status code.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the upstream-specific error code.
    #[must_use]
    pub fn with_upstream_code(mut self, code: impl Into<String>) -> Self {
        self.upstream_code = Some(code.into());
        self
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Request rejected locally by the rate limiter.
    pub(crate) fn rate_limited(retry_in_secs: u64) -> Self {
        Self::new(
            ErrorKind::RateLimited,
            format!("Rate limit exceeded. Try again in {retry_in_secs} seconds."),
        )
        .with_status(429)
    }

    /// No response received.
    pub(crate) fn network(source: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Network,
            "Network error. Please check your connection.",
        )
        .with_source(source)
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, when one is associated with the failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Upstream-specific code (e.g. the catalog's `status_code`).
    #[must_use]
    pub fn upstream_code(&self) -> Option<&str> {
        self.upstream_code.as_deref()
    }

    /// Replaces kind and message, keeping status and cause.
    #[must_use]
    pub(crate) fn reclassify(mut self, kind: ErrorKind, message: impl Into<String>) -> Self {
        self.kind = kind;
        self.message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_display_is_message() {
        // Arrange
        let err = ApiError::new(ErrorKind::NotFound, "gone").with_status(404);

        // Act
        let text = err.to_string();

        // Assert
        assert_eq!(text, "gone");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.kind().code(), "NOT_FOUND");
    }

    #[test]
    fn test_rate_limited_message_carries_seconds() {
        // Arrange & Act
        let err = ApiError::rate_limited(7);

        // Assert
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(err.status(), Some(429));
        assert!(err.message().contains("7 seconds"));
    }

    #[test]
    fn test_source_is_preserved() {
        // Arrange
        let io = std::io::Error::other("socket closed");

        // Act
        let err = ApiError::network(io);

        // Assert
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.source().unwrap().to_string().contains("socket closed"));
    }

    #[test]
    fn test_reclassify_keeps_status() {
        // Arrange
        let err = ApiError::new(ErrorKind::Upstream, "raw").with_status(401);

        // Act
        let err = err.reclassify(ErrorKind::InvalidCredentials, "bad key");

        // Assert
        assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "bad key");
    }
}
