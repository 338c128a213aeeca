//! Tri-state response signature result.

use std::fmt;

/// Outcome of checking a response's signature header.
///
/// `Absent` means the response was unsigned, which is distinct from a
/// signature that was present and did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureValidation {
    /// The response carried no signature header.
    Absent,
    /// The signature matched the response body.
    Valid,
    /// The signature was present but did not match.
    Invalid,
}

impl SignatureValidation {
    /// Map a validation check onto `Valid` / `Invalid`.
    #[must_use]
    pub fn from_check(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }

    /// Read the result attached to a response by the signing transport.
    #[must_use]
    pub fn of<B>(response: &http::Response<B>) -> Option<Self> {
        response.extensions().get::<Self>().copied()
    }

    /// Whether the response was signed and the signature matched.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// The result as `None` / `Some(true)` / `Some(false)`.
    #[must_use]
    pub fn as_option(self) -> Option<bool> {
        match self {
            Self::Absent => None,
            Self::Valid => Some(true),
            Self::Invalid => Some(false),
        }
    }
}

impl fmt::Display for SignatureValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Absent => "absent",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        })
    }
}
