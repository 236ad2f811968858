//! Error types for outbound delivery.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong at the connection level; the notifiers decide
/// what a non-success response means.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// TLS handshake failures and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Error type for delivering a rendered message to a destination.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request could not be completed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The destination answered with a non-success status.
    #[error("{service} returned HTTP {status}{}", body.as_deref().map(|b| format!(": {b}")).unwrap_or_default())]
    Status {
        /// Destination name
        service: &'static str,
        /// Response status
        status: http::StatusCode,
        /// Response body, if it was valid UTF-8
        body: Option<String>,
    },

    /// The GraphQL endpoint reported errors.
    #[error("GraphQL request failed: {0}")]
    Graphql(String),

    /// The request body could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// An email address could not be parsed.
    #[error("Invalid email address '{address}': {source}")]
    Address {
        /// The offending address
        address: String,
        /// Underlying parse error
        #[source]
        source: lettre::address::AddressError,
    },

    /// The SMTP server address is not `host:port`.
    #[error("Invalid SMTP server address '{0}'")]
    InvalidHostAddr(String),

    /// The email message could not be assembled.
    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP exchange failed.
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
