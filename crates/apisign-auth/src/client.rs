//! Signature client: a version-independent façade over one protocol.

use std::sync::Arc;

use apisign_core::{SignatureKey, SignerConfig, Timestamp};
use http::HeaderMap;
use tracing::debug;

use crate::error::SignatureError;
use crate::protocol::{SignRequest, Signature, SignatureProtocol};
use crate::registry::{DEFAULT_VERSION, ProtocolRegistry};

/// How a client picks its protocol: by registered name or by instance.
#[derive(Debug, Clone)]
pub enum VersionSelector {
    /// A version identifier, resolved case-insensitively through a registry.
    Name(String),
    /// An already-constructed protocol, used as-is.
    Protocol(Arc<dyn SignatureProtocol>),
}

impl VersionSelector {
    /// Select an already-constructed protocol.
    pub fn protocol(protocol: impl SignatureProtocol + 'static) -> Self {
        Self::Protocol(Arc::new(protocol))
    }
}

impl Default for VersionSelector {
    fn default() -> Self {
        Self::Name(DEFAULT_VERSION.to_owned())
    }
}

impl From<&str> for VersionSelector {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for VersionSelector {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<Option<&str>> for VersionSelector {
    fn from(value: Option<&str>) -> Self {
        value.map_or_else(Self::default, Self::from)
    }
}

impl From<Arc<dyn SignatureProtocol>> for VersionSelector {
    fn from(value: Arc<dyn SignatureProtocol>) -> Self {
        Self::Protocol(value)
    }
}

/// Signs outgoing requests and validates incoming responses.
///
/// A client is bound to one protocol version for its whole lifetime and is
/// cheap to clone and share across threads.
///
/// # Examples
///
/// ```
/// use apisign_auth::SignatureClient;
///
/// let client = SignatureClient::new("secret123", None, "v1").unwrap();
/// let ts = client.gen_timestamp();
/// let headers = client
///     .sign_request("https://api.example.com/v1/items?foo=bar", &[], b"", Some("GET"), Some(&ts))
///     .unwrap();
/// assert!(headers.contains_key(client.signature_header()));
/// ```
#[derive(Debug, Clone)]
pub struct SignatureClient {
    protocol: Arc<dyn SignatureProtocol>,
}

impl SignatureClient {
    /// Create a client from the built-in registry.
    ///
    /// `key` and `base_url` are ignored when `version` is an
    /// already-constructed protocol.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::UnsupportedVersion`] for an unknown version
    /// name and [`SignatureError::InvalidBaseUrl`] for an unusable base URL.
    pub fn new(
        key: impl Into<SignatureKey>,
        base_url: Option<&str>,
        version: impl Into<VersionSelector>,
    ) -> Result<Self, SignatureError> {
        Self::with_registry(&ProtocolRegistry::builtin(), key, base_url, version)
    }

    /// Create a client, resolving version names through `registry`.
    pub fn with_registry(
        registry: &ProtocolRegistry,
        key: impl Into<SignatureKey>,
        base_url: Option<&str>,
        version: impl Into<VersionSelector>,
    ) -> Result<Self, SignatureError> {
        let protocol = match version.into() {
            VersionSelector::Name(name) => registry.create(&name, key.into(), base_url)?,
            VersionSelector::Protocol(protocol) => protocol,
        };
        debug!(version = protocol.version(), "Created signature client");
        Ok(Self { protocol })
    }

    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the key is missing or the version or base URL is invalid.
    pub fn from_config(config: &SignerConfig) -> Result<Self, SignatureError> {
        let key = config.require_key()?.clone();
        Self::new(
            key,
            config.base_url.as_deref(),
            config.signature_version.as_str(),
        )
    }

    /// Name of the header carrying the signature for the bound protocol.
    #[must_use]
    pub fn signature_header(&self) -> &'static str {
        self.protocol.signature_header()
    }

    /// Identifier of the bound protocol version.
    #[must_use]
    pub fn version(&self) -> &'static str {
        self.protocol.version()
    }

    /// The bound protocol.
    #[must_use]
    pub fn protocol(&self) -> &Arc<dyn SignatureProtocol> {
        &self.protocol
    }

    /// Generate a timestamp for a request.
    #[must_use]
    pub fn gen_timestamp(&self) -> Timestamp {
        self.protocol.gen_timestamp()
    }

    /// Sign a request and return the headers to attach to it.
    ///
    /// # Errors
    ///
    /// Fails on malformed URL, method, or timestamp input.
    pub fn sign_request(
        &self,
        url: &str,
        params: &[(&str, &str)],
        body: &[u8],
        method: Option<&str>,
        timestamp: Option<&Timestamp>,
    ) -> Result<HeaderMap, SignatureError> {
        let request = SignRequest {
            url,
            params,
            body,
            method,
            timestamp,
        };
        let signature = self.sign(&request)?;
        self.protocol.get_headers(&signature)
    }

    /// Sign a request without rendering headers.
    pub fn sign(&self, request: &SignRequest<'_>) -> Result<Signature, SignatureError> {
        self.protocol.sign_request(request)
    }

    /// Render the headers for a previously computed signature.
    pub fn headers(&self, signature: &Signature) -> Result<HeaderMap, SignatureError> {
        self.protocol.get_headers(signature)
    }

    /// Sign a response body, as a responder holding the same key would.
    pub fn sign_response(
        &self,
        body: &[u8],
        timestamp: &Timestamp,
    ) -> Result<Signature, SignatureError> {
        self.protocol.sign_response(body, timestamp)
    }

    /// Check the signature read from a response's signature header.
    #[must_use]
    pub fn validate_response(
        &self,
        signature: &str,
        body: &[u8],
        timestamp: Option<&Timestamp>,
    ) -> bool {
        self.protocol.validate_response(signature, body, timestamp)
    }
}
