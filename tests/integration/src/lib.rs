//! End-to-end tests for the apisign request/response exchange.
//!
//! [`SignedApi`] plays the server side: it verifies every incoming request
//! signature with its own client holding the shared key, and signs the body
//! of every reply. Tests drive it through a
//! [`SigningTransport`](apisign_http::SigningTransport) the way a real caller
//! would, so both halves of the protocol are exercised against each other.
//!
//! Run them with:
//! ```text
//! cargo test -p apisign-integration
//! ```

use std::sync::Once;

use apisign_auth::v1::TIMESTAMP_HEADER;
use apisign_auth::{SignRequest, SignatureClient, Timestamp};
use apisign_http::{HttpTransport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use http::uri::PathAndQuery;
use http::{Request, Response, StatusCode};
use parking_lot::Mutex;
use tracing::debug;

static INIT: Once = Once::new();

/// Key shared by the caller and the server double.
pub const SHARED_KEY: &str = "secret123";

/// Base URL the server double is mounted at.
pub const BASE_URL: &str = "https://api.example.com/v1";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Create a v1 client for `key`, mounted at [`BASE_URL`].
#[must_use]
pub fn client(key: &str) -> SignatureClient {
    init_tracing();
    SignatureClient::new(key, Some(BASE_URL), "v1")
        .unwrap_or_else(|e| panic!("failed to create signature client: {e}"))
}

/// How the server double answers a verified request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Sign the body with the shared key.
    Signed,
    /// Send no signature header.
    Unsigned,
    /// Sign the body, then alter it.
    Tampered,
    /// Sign the body with an unrelated key.
    ForeignKey,
}

/// What the server double saw for one request.
#[derive(Debug, Clone)]
pub struct Received {
    /// Request method.
    pub method: String,
    /// Origin-form target the signature was checked against.
    pub target: String,
    /// Timestamp taken from the request headers.
    pub timestamp: Option<Timestamp>,
    /// Whether the request signature matched.
    pub verified: bool,
}

/// An in-process API that checks request signatures and signs its replies.
#[derive(Debug)]
pub struct SignedApi {
    verifier: SignatureClient,
    foreign: SignatureClient,
    reply: Reply,
    received: Mutex<Vec<Received>>,
}

impl SignedApi {
    /// Create a server double answering with `reply`.
    #[must_use]
    pub fn new(reply: Reply) -> Self {
        Self {
            verifier: client(SHARED_KEY),
            foreign: client("not-the-shared-key"),
            reply,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Every request seen so far, in arrival order.
    #[must_use]
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().clone()
    }

    fn verify(&self, request: &Request<Bytes>) -> (Option<Timestamp>, bool) {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
        };
        let Some(timestamp) = header(TIMESTAMP_HEADER).map(Timestamp::from) else {
            return (None, false);
        };
        let Some(presented) = header(self.verifier.signature_header()) else {
            return (Some(timestamp), false);
        };

        let target = origin_form(request);
        let expected = self.verifier.sign(
            &SignRequest::builder()
                .url(&target)
                .body(request.body().as_ref())
                .method(request.method().as_str())
                .timestamp(&timestamp)
                .build(),
        );
        let verified = expected.is_ok_and(|signature| signature.as_str() == presented);
        (Some(timestamp), verified)
    }
}

#[async_trait]
impl HttpTransport for SignedApi {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let (timestamp, verified) = self.verify(&request);
        debug!(method = %request.method(), verified, "Server double received request");
        self.received.lock().push(Received {
            method: request.method().to_string(),
            target: origin_form(&request),
            timestamp: timestamp.clone(),
            verified,
        });

        let Some(timestamp) = timestamp.filter(|_| verified) else {
            return Ok(Response::builder()
                .status(StatusCode::UNAUTHORIZED)
                .body(Bytes::from_static(b"{\"error\":\"bad signature\"}"))?);
        };

        let body = format!(
            "{{\"method\":\"{}\",\"path\":\"{}\",\"size\":{}}}",
            request.method(),
            request.uri().path(),
            request.body().len()
        );
        let signer = match self.reply {
            Reply::ForeignKey => &self.foreign,
            _ => &self.verifier,
        };
        let signature = signer.sign_response(body.as_bytes(), &timestamp)?;

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(TIMESTAMP_HEADER, timestamp.as_str());
        if self.reply != Reply::Unsigned {
            builder = builder.header(signer.signature_header(), signature.as_str());
        }

        let body = match self.reply {
            Reply::Tampered => format!("{body} "),
            _ => body,
        };
        Ok(builder.body(Bytes::from(body))?)
    }
}

/// The request target without scheme or host.
fn origin_form(request: &Request<Bytes>) -> String {
    request
        .uri()
        .path_and_query()
        .map_or("/", PathAndQuery::as_str)
        .to_owned()
}

mod test_protocol;
