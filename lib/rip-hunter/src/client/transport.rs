use std::future::Future;

use tracing::debug;

/// Errors raised by a [`Transport`].
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TransportError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when network requests fail, timeouts occur, or connection issues arise.
    ReqwestError(reqwest::Error),

    /// The connection could not be established or was interrupted.
    #[display("Connection failed: {message}")]
    #[from(skip)]
    Connection {
        /// Description of the failure.
        message: String,
    },
}

/// Sends HTTP requests on behalf of the client.
///
/// The default implementation is [`ReqwestTransport`]. Provide your own implementation
/// to route requests through another HTTP stack, or to record requests in tests.
///
/// # Example
///
/// ```rust
/// use rip_hunter::{Hunter, Transport, TransportError};
///
/// struct AlwaysOk;
///
/// impl Transport for AlwaysOk {
///     async fn send(
///         &self,
///         _request: http::Request<String>,
///     ) -> Result<http::Response<String>, TransportError> {
///         Ok(http::Response::new(r#"{"data": {"ping": true}}"#.to_string()))
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), rip_hunter::HunterError> {
/// let hunter = Hunter::builder().with_transport(AlwaysOk).build();
/// let data = hunter.query("http://localhost/graphql", "{ ping }").await?;
/// assert_eq!(data, serde_json::json!({"ping": true}));
/// # Ok(())
/// # }
/// ```
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response with its body read as text.
    fn send(
        &self,
        request: http::Request<String>,
    ) -> impl Future<Output = Result<http::Response<String>, TransportError>> + Send;
}

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport using the given reqwest client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: http::Request<String>,
    ) -> Result<http::Response<String>, TransportError> {
        let request = reqwest::Request::try_from(request)?;

        let response = self.client.execute(request).await?;
        debug!(?response, "...receiving");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        let mut result = http::Response::new(body);
        *result.status_mut() = status;
        *result.headers_mut() = headers;
        Ok(result)
    }
}
