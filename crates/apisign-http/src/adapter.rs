//! Signing decorator around an [`HttpTransport`].
//!
//! Before a request is sent, a fresh timestamp is generated and the
//! signature headers are merged into the request. After the response comes
//! back, its signature header is checked against the body using that same
//! timestamp, and the [`SignatureValidation`] result is attached to the
//! response extensions. [`SigningTransport::send_signed`] also hands the
//! result back directly in a [`SignedResponse`].
//!
//! The timestamp lives only in the `send` call frame, so concurrent requests
//! through one adapter never see each other's timestamps.

use apisign_auth::{SignatureClient, Timestamp};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::transport::HttpTransport;
use crate::validation::SignatureValidation;

/// A response together with the outcome of its signature check.
#[derive(Debug)]
pub struct SignedResponse<B = Bytes> {
    /// The response, with the validation also stored in its extensions.
    pub response: Response<B>,
    /// The outcome of the signature check.
    pub validation: SignatureValidation,
}

impl<B> SignedResponse<B> {
    /// Whether the response carried a matching signature.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    /// Drop the wrapper and keep the response.
    pub fn into_response(self) -> Response<B> {
        self.response
    }
}

/// Signs every request and validates every response passing through `inner`.
#[derive(Debug, Clone)]
pub struct SigningTransport<T> {
    client: SignatureClient,
    inner: T,
}

impl<T> SigningTransport<T> {
    /// Wrap `inner` with signing by `client`.
    pub fn new(client: SignatureClient, inner: T) -> Self {
        Self { client, inner }
    }

    /// The signature client used by this adapter.
    #[must_use]
    pub fn client(&self) -> &SignatureClient {
        &self.client
    }

    /// The wrapped transport.
    #[must_use]
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Pre-send hook: sign `request` in place and return the timestamp used.
    pub fn sign_request<B: AsRef<[u8]>>(
        &self,
        request: &mut Request<B>,
    ) -> Result<Timestamp, TransportError> {
        let timestamp = self.client.gen_timestamp();
        let url = request.uri().to_string();
        let headers = self.client.sign_request(
            &url,
            &[],
            request.body().as_ref(),
            Some(request.method().as_str()),
            Some(&timestamp),
        )?;

        debug!(method = %request.method(), url = %url, timestamp = %timestamp, "Signed outgoing request");
        request.headers_mut().extend(headers);
        Ok(timestamp)
    }

    /// Post-receive hook: check the response signature and attach the result.
    pub fn validate_response<B: AsRef<[u8]>>(
        &self,
        response: &mut Response<B>,
        timestamp: &Timestamp,
    ) -> SignatureValidation {
        let header = self.client.signature_header();
        let validation = match response.headers().get(header) {
            None => SignatureValidation::Absent,
            Some(value) => match value.to_str() {
                Ok(signature) => SignatureValidation::from_check(self.client.validate_response(
                    signature,
                    response.body().as_ref(),
                    Some(timestamp),
                )),
                Err(_) => SignatureValidation::Invalid,
            },
        };

        match validation {
            SignatureValidation::Invalid => {
                warn!(status = %response.status(), "Response signature does not match");
            }
            _ => debug!(status = %response.status(), %validation, "Checked response signature"),
        }

        response.extensions_mut().insert(validation);
        validation
    }
}

impl<T: HttpTransport> SigningTransport<T> {
    /// Sign `request`, send it through the inner transport, and validate the
    /// response against this request's timestamp.
    pub async fn send_signed(
        &self,
        mut request: Request<Bytes>,
    ) -> Result<SignedResponse, TransportError> {
        let timestamp = self.sign_request(&mut request)?;
        let mut response = self.inner.send(request).await?;
        let validation = self.validate_response(&mut response, &timestamp);
        Ok(SignedResponse {
            response,
            validation,
        })
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for SigningTransport<T> {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        Ok(self.send_signed(request).await?.into_response())
    }
}
