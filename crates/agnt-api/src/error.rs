//! Error types for agnt-api

use thiserror::Error;

/// Result type alias using agnt-api Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the agent service
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Service answered with a non-success status code
    #[error("Agent service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response parsed but violates the response contract
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Attachment type is not accepted by the agent
    #[error("Unsupported attachment: {0}")]
    UnsupportedAttachment(String),

    /// Reading an attachment from disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether this error belongs to the round trip itself.
    ///
    /// These are expected when the service is down or misbehaving and are
    /// logged as warnings; anything else points at a local problem.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Json(_) | Error::Status { .. } | Error::MalformedResponse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_variants() {
        let status = Error::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert!(status.is_transport());
        assert!(Error::MalformedResponse("missing question".into()).is_transport());

        let json = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert!(Error::Json(json).is_transport());
    }

    #[test]
    fn test_local_variants_are_not_transport() {
        assert!(!Error::UnsupportedAttachment("notes.docx".into()).is_transport());
        assert!(!Error::InvalidConfig("empty base url".into()).is_transport());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!Error::Io(io).is_transport());
    }

    #[test]
    fn test_status_display() {
        let e = Error::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(e.to_string(), "Agent service returned 500: boom");
    }
}
