//! Error types for the DDNSS updater
//!
//! This module defines all error types used throughout the workspace.
//! Every failure a cycle can hit maps to exactly one variant, so the
//! run controller can match on kind instead of catching everything.

use std::fmt;
use thiserror::Error;

/// Result type alias for DDNSS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a failed outbound HTTP call
///
/// Shared by the address resolver and the DDNS client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// The server answered with a non-success status
    HttpStatus {
        /// HTTP status code
        code: u16,
        /// Response body (may be empty if it could not be read)
        body: String,
    },

    /// Connection, timeout or protocol-level failure
    Network {
        /// Human readable reason
        reason: String,
    },

    /// Anything that fits neither of the above
    Unexpected {
        /// Generic description of what went wrong
        description: String,
    },
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::HttpStatus { code, .. } => write!(f, "HTTP status {}", code),
            TransportFailure::Network { reason } => write!(f, "network error: {}", reason),
            TransportFailure::Unexpected { description } => {
                write!(f, "unexpected error: {}", description)
            }
        }
    }
}

/// Core error type for the DDNSS updater
#[derive(Error, Debug)]
pub enum Error {
    /// A file the program requires before it can start is missing
    #[error("{0}")]
    Precondition(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The update service host could not be reached
    #[error("Host {0} is not reachable")]
    Connectivity(String),

    /// Outbound HTTP call failed
    #[error("Transport failure: {0}")]
    Transport(TransportFailure),

    /// The "what is my IP" response contained no IPv4 literal
    #[error("No IP found in HTTP response")]
    NoAddressFound,

    /// The provider answered but did not apply the update
    #[error("Provider rejected update: {}", .0.join(" / "))]
    ProviderRejected(Vec<String>),

    /// Mail delivery failed
    #[error("Notification failed: {0}")]
    Notification(String),

    /// State store-related errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// A string that does not look like a dotted quad
    #[error("Invalid IP address: {0:?}")]
    InvalidAddress(String),

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create an HTTP status transport error
    pub fn http_status(code: u16, body: impl Into<String>) -> Self {
        Self::Transport(TransportFailure::HttpStatus {
            code,
            body: body.into(),
        })
    }

    /// Create a network transport error
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Transport(TransportFailure::Network {
            reason: reason.into(),
        })
    }

    /// Create an unexpected transport error
    pub fn unexpected(description: impl Into<String>) -> Self {
        Self::Transport(TransportFailure::Unexpected {
            description: description.into(),
        })
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_display_hides_body() {
        let err = Error::http_status(500, "<html>secret stack trace</html>");
        assert_eq!(err.to_string(), "Transport failure: HTTP status 500");
    }

    #[test]
    fn precondition_message_is_verbatim() {
        let err = Error::precondition("DEBUG now: IpFile does not exist");
        assert_eq!(err.to_string(), "DEBUG now: IpFile does not exist");
    }
}
