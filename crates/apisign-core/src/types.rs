//! Shared type definitions: the signing secret and the signature timestamp.

use std::fmt;

use chrono::Utc;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{CoreError, CoreResult};

/// The pre-shared secret used to key every signature.
///
/// The key bytes are wiped on drop and never appear in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SignatureKey(Vec<u8>);

impl SignatureKey {
    /// Create a key from raw secret bytes.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    /// Borrow the secret bytes for keying a MAC.
    #[must_use]
    pub fn expose_secret(&self) -> &[u8] {
        &self.0
    }

    /// Whether the key holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignatureKey(<redacted>)")
    }
}

impl From<&str> for SignatureKey {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes().to_vec())
    }
}

impl From<String> for SignatureKey {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<&[u8]> for SignatureKey {
    fn from(value: &[u8]) -> Self {
        Self::new(value.to_vec())
    }
}

/// A signature timestamp, kept as the exact string that gets signed.
///
/// The value is never re-formatted: whatever string is generated or supplied
/// is the one placed in the canonical form and in the timestamp header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a timestamp string as-is, without validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Current time as decimal Unix seconds.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().timestamp().to_string())
    }

    /// Parse a decimal Unix-seconds timestamp, keeping the input verbatim.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidTimestamp`] if the value is empty or
    /// contains anything other than ASCII digits.
    pub fn unix_seconds(value: impl Into<String>) -> CoreResult<Self> {
        let ts = Self(value.into());
        if ts.is_unix_seconds() {
            Ok(ts)
        } else {
            Err(CoreError::InvalidTimestamp(ts.0))
        }
    }

    /// Whether the value is a non-empty run of ASCII digits.
    #[must_use]
    pub fn is_unix_seconds(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|b| b.is_ascii_digit())
    }

    /// Get the timestamp as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Timestamp {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
