//! Error types for the signing transport.

use apisign_auth::SignatureError;

/// Errors surfaced by [`SigningTransport`](crate::SigningTransport).
///
/// A response whose signature does not match is not an error; it is reported
/// as [`SignatureValidation::Invalid`](crate::SignatureValidation::Invalid).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The outgoing request could not be signed.
    #[error("failed to sign request: {0}")]
    Signing(#[from] SignatureError),

    /// A request or response could not be built.
    #[error("invalid HTTP message: {0}")]
    Http(#[from] http::Error),

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
}
