//! Error types for webhook decoding and dispatch.

use thiserror::Error;

use super::EventKind;

/// Error type for decoding the webhook body.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The top-level envelope is not valid JSON or has wrong field types.
    #[error("Invalid webhook envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The nested `details` blob is not valid JSON or has the wrong shape.
    #[error("Invalid event details: {0}")]
    Detail(#[source] serde_json::Error),

    /// An event kind that needs `details` arrived without them.
    #[error("Event '{kind}' carries no details")]
    MissingDetails {
        /// The kind that required details
        kind: EventKind,
    },
}

/// Error type for mapping an envelope to a typed record.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The envelope's `message` is not one of the recognized tags.
    ///
    /// Not fatal: the request is still acknowledged.
    #[error("Unknown event kind '{0}'")]
    UnknownEventKind(String),

    /// The record could not be built from the envelope.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
