//! The versioned signature protocol abstraction.
//!
//! Each protocol version is one concrete type implementing
//! [`SignatureProtocol`]. Versions are selected by name through the
//! [`ProtocolRegistry`](crate::ProtocolRegistry); clients only ever see the
//! trait object.

use std::fmt;

use apisign_core::Timestamp;
use http::HeaderMap;
use typed_builder::TypedBuilder;

use crate::error::SignatureError;

/// The inputs of a request signature.
///
/// `url` may carry an encoded query string; `params` are unencoded query
/// pairs that replace URL query values with the same key.
///
/// # Examples
///
/// ```
/// use apisign_auth::SignRequest;
///
/// let request = SignRequest::builder()
///     .url("https://api.example.com/v1/items?foo=bar")
///     .method("GET")
///     .build();
/// assert!(request.body.is_empty());
/// assert!(request.timestamp.is_none());
/// ```
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct SignRequest<'a> {
    /// The request URL (absolute, origin-form, or relative to the base URL).
    pub url: &'a str,
    /// Explicit unencoded query parameters.
    #[builder(default)]
    pub params: &'a [(&'a str, &'a str)],
    /// The raw request body.
    #[builder(default)]
    pub body: &'a [u8],
    /// The HTTP method; defaults to `GET`.
    #[builder(default, setter(strip_option))]
    pub method: Option<&'a str>,
    /// The timestamp to sign with; generated when absent.
    #[builder(default, setter(strip_option))]
    pub timestamp: Option<&'a Timestamp>,
}

/// A computed signature together with the timestamp it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    value: String,
    timestamp: Timestamp,
}

impl Signature {
    /// Create a signature from an encoded digest and its timestamp.
    pub fn new(value: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            value: value.into(),
            timestamp,
        }
    }

    /// The encoded digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The timestamp the digest was computed with.
    #[must_use]
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// One versioned signing and validation algorithm.
///
/// Implementations hold only immutable configuration (the key and an
/// optional base URL), so every call is independent and the same instance
/// can be shared across threads.
pub trait SignatureProtocol: Send + Sync + fmt::Debug {
    /// Lowercase version identifier, e.g. `"v1"`.
    fn version(&self) -> &'static str;

    /// Name of the header that carries the signature on requests and responses.
    fn signature_header(&self) -> &'static str;

    /// Produce a timestamp in this version's format.
    fn gen_timestamp(&self) -> Timestamp;

    /// Canonicalize and sign an outgoing request.
    fn sign_request(&self, request: &SignRequest<'_>) -> Result<Signature, SignatureError>;

    /// Sign a response body; the responder-side counterpart of
    /// [`validate_response`](Self::validate_response).
    fn sign_response(&self, body: &[u8], timestamp: &Timestamp)
    -> Result<Signature, SignatureError>;

    /// Render the headers a caller must attach for `signature`.
    fn get_headers(&self, signature: &Signature) -> Result<HeaderMap, SignatureError>;

    /// Check a received response signature.
    ///
    /// Returns `false` on mismatch, malformed encoding, or a missing or
    /// malformed timestamp. Never fails for a merely invalid signature.
    fn validate_response(&self, signature: &str, body: &[u8], timestamp: Option<&Timestamp>)
    -> bool;
}
