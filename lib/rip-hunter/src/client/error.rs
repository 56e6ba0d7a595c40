use super::auth::AuthenticationError;
use super::transport::TransportError;

/// Application-level error returned by a GraphQL endpoint.
///
/// Carries the `message` of each entry of the response `errors` list, in order.
/// It is returned to the caller and emitted as the [`ERROR_EVENT`](crate::ERROR_EVENT) payload.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("GraphQL API error: {}", errors.join(", "))]
pub struct ApiError {
    errors: Vec<String>,
}

impl ApiError {
    /// Creates an API error from a list of messages.
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// The error messages, in the order the endpoint returned them.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consumes the error and returns its messages.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Errors that can occur when running a GraphQL operation.
///
/// Only [`HunterError::Api`] comes from the GraphQL errors envelope; every other variant
/// describes a failure of the HTTP round trip itself.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum HunterError {
    /// The endpoint answered with a GraphQL errors envelope.
    Api(ApiError),

    /// The transport failed to deliver the request or to read the response.
    Transport(TransportError),

    /// The endpoint is not a valid URL.
    UrlError(url::ParseError),

    /// HTTP request construction error.
    HttpError(http::Error),

    /// Invalid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// The credential cannot be sent as a header.
    Authentication(AuthenticationError),

    /// The request body cannot be encoded.
    JsonValueError(serde_json::Error),

    /// The response body is not a GraphQL response envelope.
    #[display("Invalid GraphQL response from '{endpoint}': {error}\n{body}")]
    #[from(skip)]
    InvalidJson {
        /// The endpoint that answered.
        endpoint: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body, possibly truncated.
        body: String,
    },

    /// The endpoint answered with a non-success status and no errors envelope.
    #[display("Unexpected status code {status_code}: {body}")]
    #[from(skip)]
    UnexpectedStatusCode {
        /// The HTTP status code received.
        status_code: u16,
        /// The response body, possibly truncated.
        body: String,
    },

    /// The `data` member does not match the requested type.
    #[display("Failed to deserialize GraphQL data at '{}': {}", error.path(), error.inner())]
    #[from(skip)]
    DataDeserialization {
        /// The deserialization error with the path of the failing member.
        error: serde_path_to_error::Error<serde_json::Error>,
    },
}

impl HunterError {
    /// Returns the application-level error, if the endpoint answered with a GraphQL errors envelope.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}
