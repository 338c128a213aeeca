//! The transport seam the signing adapter wraps.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};

use crate::error::TransportError;

/// Anything that can send a fully buffered HTTP request.
///
/// The signing adapter needs the whole body on both sides, so requests and
/// responses are exchanged as [`Bytes`].
///
/// # Examples
///
/// ```
/// use apisign_http::{HttpTransport, TransportError};
/// use async_trait::async_trait;
/// use bytes::Bytes;
/// use http::{Request, Response};
///
/// struct Echo;
///
/// #[async_trait]
/// impl HttpTransport for Echo {
///     async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
///         Ok(Response::new(request.into_body()))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let request = Request::post("/echo").body(Bytes::from_static(b"ping")).unwrap();
/// let response = Echo.send(request).await.unwrap();
/// assert_eq!(response.body().as_ref(), b"ping");
/// # });
/// ```
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the buffered response.
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        (**self).send(request).await
    }
}

#[cfg(feature = "reqwest")]
#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn send(&self, request: Request<Bytes>) -> Result<Response<Bytes>, TransportError> {
        let request = reqwest::Request::try_from(request).map_err(anyhow::Error::from)?;
        let response = self.execute(request).await.map_err(anyhow::Error::from)?;

        let mut builder = Response::builder()
            .status(response.status())
            .version(response.version());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(response.headers().clone());
        }

        let body = response.bytes().await.map_err(anyhow::Error::from)?;
        Ok(builder.body(body)?)
    }
}
