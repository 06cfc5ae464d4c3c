use std::fmt;

use thiserror::Error;

/// Which third-party endpoint a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Geocoding,
    Weather,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Geocoding => "geocoding",
            Upstream::Weather => "weather",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single lookup.
///
/// Each variant is produced once, where the failure happens, and travels
/// unchanged to the boundary. The `reason` strings are for logs only; callers
/// should render [`ErrorKind::public_message`] instead.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid place name: {0}")]
    InvalidQuery(String),

    #[error("no location matched the place name")]
    NotFound,

    #[error("{upstream} upstream unreachable: {reason}")]
    UpstreamUnavailable { upstream: Upstream, reason: String },

    #[error("{upstream} upstream responded with status {status}")]
    UpstreamStatus { upstream: Upstream, status: u16 },

    #[error("{upstream} upstream returned a malformed payload: {reason}")]
    MalformedPayload { upstream: Upstream, reason: String },

    #[error("failed to build {upstream} request: {reason}")]
    RequestSetup { upstream: Upstream, reason: String },
}

impl LookupError {
    /// Classify a transport-level `reqwest` failure (no usable response).
    ///
    /// The URL is stripped from the reason: its query string carries the API key.
    pub fn from_transport(upstream: Upstream, err: reqwest::Error) -> Self {
        let err = err.without_url();
        let reason = err.to_string();
        if err.is_builder() {
            LookupError::RequestSetup { upstream, reason }
        } else {
            // timeouts, refused connections, resets: nothing came back
            LookupError::UpstreamUnavailable { upstream, reason }
        }
    }

    pub fn malformed(upstream: Upstream, reason: impl Into<String>) -> Self {
        LookupError::MalformedPayload { upstream, reason: reason.into() }
    }

    /// Public taxonomy bucket for this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::InvalidQuery(_) => ErrorKind::InvalidQuery,
            LookupError::NotFound => ErrorKind::NotFound,
            LookupError::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            LookupError::UpstreamStatus { .. } | LookupError::MalformedPayload { .. } => {
                ErrorKind::UpstreamError
            }
            LookupError::RequestSetup { .. } => ErrorKind::RequestSetupError,
        }
    }

    pub fn upstream(&self) -> Option<Upstream> {
        match self {
            LookupError::InvalidQuery(_) => None,
            LookupError::NotFound => Some(Upstream::Geocoding),
            LookupError::UpstreamUnavailable { upstream, .. }
            | LookupError::UpstreamStatus { upstream, .. }
            | LookupError::MalformedPayload { upstream, .. }
            | LookupError::RequestSetup { upstream, .. } => Some(*upstream),
        }
    }
}

/// Caller-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidQuery,
    NotFound,
    UpstreamUnavailable,
    UpstreamError,
    RequestSetupError,
}

impl ErrorKind {
    /// Stable message shown to the end user. Never contains provider text.
    pub fn public_message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidQuery => "Place name must be between 1 and 100 characters",
            ErrorKind::NotFound => "Location not found",
            ErrorKind::UpstreamUnavailable => "Unable to connect to the weather service",
            ErrorKind::UpstreamError => "Error fetching weather data from the server",
            ErrorKind::RequestSetupError => "An unexpected error occurred",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidQuery => "invalid_query",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ErrorKind::UpstreamError => "upstream_error",
            ErrorKind::RequestSetupError => "request_setup_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_payload_is_reported_as_upstream_error() {
        let err = LookupError::malformed(Upstream::Weather, "missing field `weather`");
        assert_eq!(err.kind(), ErrorKind::UpstreamError);
        assert_eq!(err.upstream(), Some(Upstream::Weather));
    }

    #[test]
    fn status_failure_is_upstream_error_not_unavailable() {
        let err = LookupError::UpstreamStatus { upstream: Upstream::Geocoding, status: 401 };
        assert_eq!(err.kind(), ErrorKind::UpstreamError);
    }

    #[test]
    fn public_messages_are_distinct_per_kind() {
        let kinds = [
            ErrorKind::InvalidQuery,
            ErrorKind::NotFound,
            ErrorKind::UpstreamUnavailable,
            ErrorKind::UpstreamError,
            ErrorKind::RequestSetupError,
        ];
        let mut messages: Vec<_> = kinds.iter().map(|k| k.public_message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), kinds.len());
    }

    #[test]
    fn public_message_does_not_leak_reason() {
        let err = LookupError::UpstreamUnavailable {
            upstream: Upstream::Weather,
            reason: "dns error: api.openweathermap.org".into(),
        };
        assert!(err.to_string().contains("dns error"));
        assert!(!err.kind().public_message().contains("dns"));
    }

    #[test]
    fn not_found_message_matches_contract() {
        assert_eq!(LookupError::NotFound.kind().public_message(), "Location not found");
    }
}
