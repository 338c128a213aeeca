//! Versioned HMAC request signing and response validation.
//!
//! A [`SignatureClient`] signs outgoing requests over a canonical form of
//! their URL path, query parameters, method, body, and timestamp, and
//! validates response bodies against the signature header the server sent
//! back. The algorithm is chosen by version name through a
//! [`ProtocolRegistry`]; `"v1"` (HMAC-SHA256) is built in.
//!
//! # Usage
//!
//! ```rust
//! use apisign_auth::SignatureClient;
//!
//! let client = SignatureClient::new("secret123", Some("https://api.example.com"), "v1").unwrap();
//!
//! // Before sending: sign and attach the headers.
//! let ts = client.gen_timestamp();
//! let headers = client
//!     .sign_request("/v1/items?foo=bar", &[], b"", Some("GET"), Some(&ts))
//!     .unwrap();
//! assert_eq!(headers["x-signature-timestamp"], ts.as_str());
//!
//! // After receiving: validate the response signature with the same timestamp.
//! let from_server = client.sign_response(b"{}", &ts).unwrap();
//! assert!(client.validate_response(from_server.as_str(), b"{}", Some(&ts)));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request and response construction
//! - [`client`] - The version-independent client façade
//! - [`error`] - Signing error types
//! - [`protocol`] - The [`SignatureProtocol`] trait and signature values
//! - [`registry`] - Version identifier to constructor lookup
//! - [`v1`] - Version 1: HMAC-SHA256

pub mod canonical;
pub mod client;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod v1;


pub use apisign_core::{SignatureKey, Timestamp};
pub use client::{SignatureClient, VersionSelector};
pub use error::SignatureError;
pub use protocol::{SignRequest, Signature, SignatureProtocol};
pub use registry::{DEFAULT_VERSION, ProtocolFactory, ProtocolRegistry};
pub use v1::{SIGNATURE_HEADER, V1};
