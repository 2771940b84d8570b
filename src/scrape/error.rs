//! Error classification for page fetching.

use std::time::Duration;
use thiserror::Error;

/// Why a page could not be fetched or driven.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Review elements did not appear within the wait timeout.
    #[error("timed out after {0:?} waiting for review elements")]
    Timeout(Duration),

    /// An expected element is missing from the loaded page.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// Navigation, transport or script execution failed.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The browser or HTTP session could not be started.
    #[error("failed to start session: {0}")]
    Session(String),
}

impl FetchError {
    /// Short tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::ElementNotFound(_) => "element-not-found",
            FetchError::Navigation(_) => "navigation",
            FetchError::Session(_) => "session",
        }
    }
}

impl From<fantoccini::error::CmdError> for FetchError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        use fantoccini::error::CmdError;

        match err {
            CmdError::WaitTimeout => FetchError::Timeout(Duration::ZERO),
            e if e.is_no_such_element() => FetchError::ElementNotFound(e.to_string()),
            e => FetchError::Navigation(e.to_string()),
        }
    }
}

impl From<fantoccini::error::NewSessionError> for FetchError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        FetchError::Session(err.to_string())
    }
}

impl From<wreq::Error> for FetchError {
    fn from(err: wreq::Error) -> Self {
        FetchError::Navigation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let errors = [
            FetchError::Timeout(Duration::from_secs(10)),
            FetchError::ElementNotFound(".ZmyHeo".to_string()),
            FetchError::Navigation("connection reset".to_string()),
            FetchError::Session("no webdriver".to_string()),
        ];

        let kinds: Vec<_> = errors.iter().map(FetchError::kind).collect();
        assert_eq!(kinds, vec!["timeout", "element-not-found", "navigation", "session"]);
    }

    #[test]
    fn test_display() {
        let err = FetchError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "timed out after 10s waiting for review elements");

        let err = FetchError::ElementNotFound(".ZmyHeo".to_string());
        assert_eq!(err.to_string(), "element not found: .ZmyHeo");
    }

    #[test]
    fn test_from_wait_timeout() {
        let err: FetchError = fantoccini::error::CmdError::WaitTimeout.into();
        assert!(matches!(err, FetchError::Timeout(_)));
    }
}
