//! Signer configuration.
//!
//! Configuration is driven by environment variables so the CLI and any
//! embedding service pick up the same key, base URL, and protocol version.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{CoreError, CoreResult, SignatureKey};

/// Configuration for a signature client.
///
/// The signature key is never serialized; it only arrives through the
/// builder or the `SIGNATURE_KEY` environment variable.
///
/// # Examples
///
/// ```
/// use apisign_core::SignerConfig;
///
/// let config = SignerConfig::builder()
///     .signature_key(Some("secret123".into()))
///     .build();
/// assert_eq!(config.signature_version, "v1");
/// assert!(config.require_key().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SignerConfig {
    /// The pre-shared signing secret.
    #[serde(skip)]
    #[builder(default)]
    pub signature_key: Option<SignatureKey>,

    /// Base URL used to resolve relative request URLs.
    #[builder(default)]
    pub base_url: Option<String>,

    /// Protocol version identifier (case-insensitive).
    #[builder(default = String::from("v1"))]
    pub signature_version: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            signature_key: None,
            base_url: None,
            signature_version: String::from("v1"),
            log_level: String::from("info"),
        }
    }
}

impl SignerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SIGNATURE_KEY` | *(unset)* |
    /// | `SIGNATURE_BASE_URL` | *(unset)* |
    /// | `SIGNATURE_VERSION` | `v1` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("SIGNATURE_KEY") {
            config.signature_key = Some(SignatureKey::from(v));
        }
        if let Ok(v) = std::env::var("SIGNATURE_BASE_URL") {
            if !v.is_empty() {
                config.base_url = Some(v);
            }
        }
        if let Ok(v) = std::env::var("SIGNATURE_VERSION") {
            if !v.is_empty() {
                config.signature_version = v;
            }
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Return the configured key, failing if none was provided.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] when the key is missing or empty.
    pub fn require_key(&self) -> CoreResult<&SignatureKey> {
        match &self.signature_key {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(CoreError::Config(
                "signature key is not set (SIGNATURE_KEY)".to_owned(),
            )),
        }
    }
}
