//! Error types for the TMI client.
//!
//! Only transport failures and misuse of the client lifecycle are errors.
//! Frames that do not match the chat grammar and malformed tags are not:
//! the first are discarded, the second are logged and skipped.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level client errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// An inbound frame exceeded the maximum allowed length.
    #[error("message too long: {actual} bytes (limit {limit})")]
    MessageTooLong {
        /// Bytes buffered without finding a line ending.
        actual: usize,
        /// The configured limit.
        limit: usize,
    },

    /// The client has no stream attached yet.
    #[error("client is not connected")]
    NotConnected,

    /// A stream was already attached to this client.
    #[error("client is already connected")]
    AlreadyConnected,

    /// `say` was called before any channel was joined.
    #[error("no channel joined")]
    NotJoined,

    /// The client sent QUIT and can no longer be used.
    #[error("client has disconnected")]
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::MessageTooLong {
            actual: 9000,
            limit: 8703,
        };
        assert_eq!(
            format!("{}", err),
            "message too long: 9000 bytes (limit 8703)"
        );
        assert_eq!(format!("{}", ProtocolError::NotJoined), "no channel joined");
    }

    #[test]
    fn test_error_conversion() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        let protocol_err: ProtocolError = io_err.into();

        match protocol_err {
            ProtocolError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_io_source_chaining() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let protocol_err = ProtocolError::from(io_err);
        let source = std::error::Error::source(&protocol_err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), "eof");
    }
}
