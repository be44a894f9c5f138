use thiserror::Error;

/// Failure to turn one inbound envelope into a domain event.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The envelope carried the `Unspecified` tag.
    #[error("event envelope has unspecified type")]
    Unspecified,

    /// The envelope tag is outside the known event type space.
    #[error("unknown event type tag: {0}")]
    UnknownTag(i32),

    /// The payload is not JSON or does not have the shape the tag requires.
    #[error("malformed {kind} payload: {source}")]
    Json {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A numeric code is outside the domain of its enumeration.
    #[error("invalid {field} code: {value}")]
    InvalidCode { field: &'static str, value: i64 },
}

/// Errors raised by the transport session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Network-level failure opening or using the channel. May succeed on retry.
    #[error("connection error: {0}")]
    Connection(String),

    /// A well-formed error status returned by the backend.
    #[error("remote status {code}: {message}")]
    Status { code: String, message: String },

    /// A response frame could not be decoded into the expected message.
    #[error("malformed frame for {method}: {reason}")]
    Frame { method: &'static str, reason: String },

    /// The transport was closed locally.
    #[error("transport is closed")]
    Closed,
}

impl TransportError {
    /// Returns `true` for failures that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Top-level error returned by every puppet operation.
#[derive(Error, Debug)]
pub enum PuppetError {
    /// Missing or malformed token / endpoint. Raised before any network attempt.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network-level failure.
    #[error("transport error: {0}")]
    Transport(TransportError),

    /// Well-formed error response from the backend.
    #[error("remote error {code}: {message}")]
    Remote { code: String, message: String },

    /// Response missing required fields or structurally invalid.
    #[error("payload error: {0}")]
    Payload(String),

    /// Operation invoked in the wrong lifecycle state.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Envelope or code decoding failure.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Operation the backend cannot perform.
    #[error("unsupported operation: {0}")]
    Operation(String),
}

impl From<TransportError> for PuppetError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status { code, message } => Self::Remote { code, message },
            TransportError::Frame { method, reason } => {
                Self::Payload(format!("{method} response: {reason}"))
            }
            other => Self::Transport(other),
        }
    }
}

impl PuppetError {
    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload(message.into())
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PuppetError>;
