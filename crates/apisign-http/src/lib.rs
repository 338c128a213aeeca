//! HTTP transport adapter for apisign.
//!
//! [`SigningTransport`] decorates any [`HttpTransport`]: it signs each
//! outgoing request with a [`SignatureClient`](apisign_auth::SignatureClient)
//! and attaches a tri-state [`SignatureValidation`] to each response.
//!
//! ```rust
//! use apisign_auth::SignatureClient;
//! use apisign_http::{SignatureValidation, SigningTransport};
//! use bytes::Bytes;
//!
//! let transport = SigningTransport::new(SignatureClient::new("secret123", None, "v1").unwrap(), ());
//! let mut request = http::Request::get("https://api.example.com/v1/items").body(Bytes::new()).unwrap();
//! let timestamp = transport.sign_request(&mut request).unwrap();
//! assert!(request.headers().contains_key("x-signature"));
//!
//! let mut response = http::Response::new(Bytes::from_static(b"{}"));
//! assert_eq!(transport.validate_response(&mut response, &timestamp), SignatureValidation::Absent);
//! ```
//!
//! With the `reqwest` feature, `reqwest::Client` implements [`HttpTransport`].

mod adapter;
mod error;
mod transport;
mod validation;

pub use adapter::{SignedResponse, SigningTransport};
pub use error::TransportError;
pub use transport::HttpTransport;
pub use validation::SignatureValidation;
