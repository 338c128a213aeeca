//! Registry of protocol versions.
//!
//! Maps lowercase version identifiers to constructor functions. The built-in
//! registry knows `"v1"`; callers may register more before building clients.

use std::collections::BTreeMap;
use std::sync::Arc;

use apisign_core::SignatureKey;

use crate::error::SignatureError;
use crate::protocol::SignatureProtocol;
use crate::v1::{self, V1};

/// Version selected when none is specified.
pub const DEFAULT_VERSION: &str = v1::VERSION;

/// Constructor for one protocol version: `(key, base_url) -> protocol`.
pub type ProtocolFactory =
    fn(SignatureKey, Option<&str>) -> Result<Arc<dyn SignatureProtocol>, SignatureError>;

/// Lookup table from version identifier to constructor.
///
/// # Examples
///
/// ```
/// use apisign_auth::ProtocolRegistry;
///
/// let registry = ProtocolRegistry::builtin();
/// assert_eq!(registry.supported(), vec!["v1"]);
/// let protocol = registry.create("V1", "secret".into(), None).unwrap();
/// assert_eq!(protocol.version(), "v1");
/// ```
#[derive(Debug, Clone)]
pub struct ProtocolRegistry {
    factories: BTreeMap<String, ProtocolFactory>,
}

impl ProtocolRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// The registry of built-in versions.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(v1::VERSION, new_v1);
        registry
    }

    /// Register `factory` under `name` (case-insensitive), replacing any
    /// previous entry of the same name.
    pub fn register(&mut self, name: &str, factory: ProtocolFactory) -> &mut Self {
        self.factories.insert(name.to_ascii_lowercase(), factory);
        self
    }

    /// Whether `name` (case-insensitive) is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_ascii_lowercase())
    }

    /// Registered identifiers in sorted order.
    #[must_use]
    pub fn supported(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Construct the protocol registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError::UnsupportedVersion`] if `name` is not
    /// registered, or whatever the factory reports (e.g. a bad base URL).
    pub fn create(
        &self,
        name: &str,
        key: SignatureKey,
        base_url: Option<&str>,
    ) -> Result<Arc<dyn SignatureProtocol>, SignatureError> {
        let factory = self
            .factories
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| SignatureError::UnsupportedVersion {
                version: name.to_owned(),
                supported: self.supported().join(", "),
            })?;
        factory(key, base_url)
    }
}

impl Default for ProtocolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn new_v1(
    key: SignatureKey,
    base_url: Option<&str>,
) -> Result<Arc<dyn SignatureProtocol>, SignatureError> {
    Ok(Arc::new(V1::new(key, base_url)?))
}
