//! Error types for puppet operations.

use thiserror::Error;

/// Result type for puppet operations.
pub type PuppetResult<T> = Result<T, PuppetError>;

/// Errors raised by puppet implementations and the surrounding plumbing.
#[derive(Debug, Error)]
pub enum PuppetError {
    /// The puppet has not been started yet.
    #[error("puppet is not started")]
    NotStarted,

    /// The operation requires a logged-in user.
    #[error("no user is logged in")]
    NotLoggedIn,

    /// A referenced entity does not exist on the client side.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// No puppet factory is registered under the requested name.
    #[error("unknown puppet: {name}")]
    UnknownPuppet { name: String },

    /// The puppet implementation does not provide this operation.
    #[error("operation {operation} is not supported by this puppet")]
    Unsupported { operation: &'static str },

    /// A network request to the chat service failed.
    #[error("network request failed: {reason}")]
    Network { reason: String },

    /// A payload was malformed or could not be processed.
    #[error("malformed payload: {reason}")]
    Payload { reason: String },

    /// A local I/O operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PuppetError {
    pub fn not_found(what: impl Into<String>) -> Self {
        PuppetError::NotFound { what: what.into() }
    }

    pub fn unknown_puppet(name: impl Into<String>) -> Self {
        PuppetError::UnknownPuppet { name: name.into() }
    }

    pub fn unsupported(operation: &'static str) -> Self {
        PuppetError::Unsupported { operation }
    }

    pub fn network(reason: impl Into<String>) -> Self {
        PuppetError::Network {
            reason: reason.into(),
        }
    }

    pub fn payload(reason: impl Into<String>) -> Self {
        PuppetError::Payload {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_reasons() {
        let err = PuppetError::not_found("room room-1");
        assert_eq!(err.to_string(), "not found: room room-1");

        let err = PuppetError::unknown_puppet("web");
        assert_eq!(err.to_string(), "unknown puppet: web");
    }
}
