//! Signature protocol version 1: HMAC-SHA256 over the canonical request.
//!
//! Requests are signed over the layout described in [`crate::canonical`]
//! and carry three headers:
//!
//! | Header | Value |
//! |--------|-------|
//! | `x-signature` | lowercase hex HMAC-SHA256 |
//! | `x-signature-version` | `v1` |
//! | `x-signature-timestamp` | decimal Unix seconds, verbatim |
//!
//! Responses carry `x-signature` computed over the canonical response
//! (version, the request's timestamp, and the response body).

use apisign_core::{CoreError, SignatureKey, Timestamp};
use hmac::{Hmac, KeyInit, Mac};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{
    build_canonical_path, build_canonical_query, build_canonical_request,
    build_canonical_response, parse_base_path, resolve_target,
};
use crate::error::SignatureError;
use crate::protocol::{SignRequest, Signature, SignatureProtocol};

/// Version identifier.
pub const VERSION: &str = "v1";

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Header carrying the protocol version.
pub const VERSION_HEADER: &str = "x-signature-version";

/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

type HmacSha256 = Hmac<Sha256>;

/// Version 1 of the signature protocol.
#[derive(Debug)]
pub struct V1 {
    key: SignatureKey,
    base_path: Option<String>,
}

impl V1 {
    /// Create a V1 protocol bound to `key`.
    ///
    /// `base_url`, when given, must be absolute; relative request URLs are
    /// resolved against its path.
    pub fn new(key: SignatureKey, base_url: Option<&str>) -> Result<Self, SignatureError> {
        let base_path = base_url.map(parse_base_path).transpose()?;
        Ok(Self { key, base_path })
    }

    fn mac(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret())
            .expect("HMAC can accept keys of any length");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

impl SignatureProtocol for V1 {
    fn version(&self) -> &'static str {
        VERSION
    }

    fn signature_header(&self) -> &'static str {
        SIGNATURE_HEADER
    }

    fn gen_timestamp(&self) -> Timestamp {
        Timestamp::now()
    }

    fn sign_request(&self, request: &SignRequest<'_>) -> Result<Signature, SignatureError> {
        let method = request.method.unwrap_or("GET").to_ascii_uppercase();
        let method = Method::from_bytes(method.as_bytes())
            .map_err(|_| SignatureError::InvalidMethod(method.clone()))?;

        let timestamp = match request.timestamp {
            Some(ts) => checked_timestamp(ts)?,
            None => self.gen_timestamp(),
        };

        let target = resolve_target(request.url, self.base_path.as_deref())?;
        let canonical_path = build_canonical_path(&target.path);
        let canonical_query = build_canonical_query(&target.query, request.params);

        debug!(
            method = %method,
            path = %canonical_path,
            query = %canonical_query,
            timestamp = %timestamp,
            body_len = request.body.len(),
            "Built V1 canonical request"
        );

        let canonical = build_canonical_request(
            VERSION,
            method.as_str(),
            &canonical_path,
            &canonical_query,
            timestamp.as_str(),
            request.body,
        );

        Ok(Signature::new(hex::encode(self.mac(&canonical)), timestamp))
    }

    fn sign_response(
        &self,
        body: &[u8],
        timestamp: &Timestamp,
    ) -> Result<Signature, SignatureError> {
        let timestamp = checked_timestamp(timestamp)?;
        let canonical = build_canonical_response(VERSION, timestamp.as_str(), body);
        Ok(Signature::new(hex::encode(self.mac(&canonical)), timestamp))
    }

    fn get_headers(&self, signature: &Signature) -> Result<HeaderMap, SignatureError> {
        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(
            HeaderName::from_static(SIGNATURE_HEADER),
            HeaderValue::from_str(signature.as_str())
                .map_err(|_| SignatureError::InvalidHeaderValue(SIGNATURE_HEADER))?,
        );
        headers.insert(
            HeaderName::from_static(VERSION_HEADER),
            HeaderValue::from_static(VERSION),
        );
        headers.insert(
            HeaderName::from_static(TIMESTAMP_HEADER),
            HeaderValue::from_str(signature.timestamp().as_str())
                .map_err(|_| SignatureError::InvalidHeaderValue(TIMESTAMP_HEADER))?,
        );
        Ok(headers)
    }

    fn validate_response(
        &self,
        signature: &str,
        body: &[u8],
        timestamp: Option<&Timestamp>,
    ) -> bool {
        let Some(timestamp) = timestamp.filter(|ts| ts.is_unix_seconds()) else {
            debug!("Missing or malformed timestamp, rejecting response signature");
            return false;
        };

        let Ok(provided) = hex::decode(signature.trim()) else {
            debug!("Response signature is not valid hex");
            return false;
        };

        let canonical = build_canonical_response(VERSION, timestamp.as_str(), body);
        let expected = self.mac(&canonical);

        // Constant-time comparison.
        let valid: bool = provided.as_slice().ct_eq(expected.as_slice()).into();
        if !valid {
            debug!(timestamp = %timestamp, body_len = body.len(), "Response signature mismatch");
        }
        valid
    }
}

fn checked_timestamp(timestamp: &Timestamp) -> Result<Timestamp, SignatureError> {
    Timestamp::unix_seconds(timestamp.as_str()).map_err(|e| match e {
        CoreError::InvalidTimestamp(value) => SignatureError::InvalidTimestamp(value),
        other => SignatureError::Core(other),
    })
}
