//! Error types for request signing.
//!
//! Only configuration and input problems are errors. A signature that does
//! not match is a normal outcome and is reported as `false` by
//! [`SignatureProtocol::validate_response`](crate::SignatureProtocol::validate_response).

use apisign_core::CoreError;

/// Errors that can occur while configuring a client or signing a request.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The requested protocol version is not registered.
    #[error("unsupported signature version: {version:?} (supported versions: [{supported}])")]
    UnsupportedVersion {
        /// The identifier that was requested.
        version: String,
        /// Comma-separated list of registered identifiers.
        supported: String,
    },

    /// The base URL could not be parsed as an absolute URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The request URL could not be parsed.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// A relative request URL was given but no base URL is configured.
    #[error("relative URL {0:?} requires a base URL")]
    MissingBaseUrl(String),

    /// The HTTP method is not a valid token.
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// The timestamp does not match the protocol's format.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A rendered header value contains bytes not allowed in HTTP headers.
    #[error("invalid value for header {0}")]
    InvalidHeaderValue(&'static str),

    /// Error from the core layer (configuration, internal).
    #[error(transparent)]
    Core(#[from] CoreError),
}
