use std::borrow::Cow;
use std::future::{Future, IntoFuture};
use std::pin::Pin;

use headers::{ContentType, HeaderMapExt};
use http::{HeaderMap, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::envelope::Envelope;
use super::{ApiError, CallOptions, Hunter, HunterError, SecureString, Transport};
use crate::compact::remove_spaces;
use crate::events::{ERROR_EVENT, EventBus};

const BODY_MAX_LENGTH: usize = 1024;

/// The kind of GraphQL operation.
///
/// Both kinds are sent the same way; the kind is reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum OperationKind {
    /// A read operation.
    #[display("query")]
    Query,
    /// A write operation.
    #[display("mutation")]
    Mutation,
}

#[derive(Serialize)]
struct OperationBody<'a> {
    query: &'a str,
}

/// A GraphQL operation ready to be sent.
///
/// Created by [`Hunter::query`] or [`Hunter::mutation`]. Await it to get the `data`
/// member as a [`serde_json::Value`], or call [`Operation::data`] to decode it.
///
/// ```rust,no_run
/// # async fn example(hunter: rip_hunter::Hunter) -> Result<(), rip_hunter::HunterError> {
/// let data = hunter
///     .mutation("https://api.example.com/graphql", r#"{ addUser(name: "rip") { id } }"#)
///     .with_token("my-api-token")
///     .with_header("X-Request-ID", "abc-123")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use = "an operation is only sent when awaited"]
pub struct Operation<'a, T> {
    hunter: &'a Hunter<T>,
    kind: OperationKind,
    endpoint: String,
    text: String,
    options: CallOptions,
}

impl<'a, T> Operation<'a, T>
where
    T: Transport,
{
    pub(in crate::client) fn new(
        hunter: &'a Hunter<T>,
        kind: OperationKind,
        endpoint: String,
        text: String,
    ) -> Self {
        Self {
            hunter,
            kind,
            endpoint,
            text,
            options: CallOptions::default(),
        }
    }

    /// The kind of this operation.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Sends `Authorization: Bearer <token>` with this operation.
    pub fn with_token(mut self, token: impl Into<SecureString>) -> Self {
        self.options = self.options.with_token(token);
        self
    }

    /// Adds a header to this operation.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options = self.options.with_header(name, value);
        self
    }

    /// Replaces the options of this operation.
    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Sends the operation and decodes the `data` member.
    ///
    /// # Errors
    ///
    /// Returns the same errors as awaiting the operation, plus
    /// [`HunterError::DataDeserialization`] if `data` does not match `D`.
    pub async fn data<D>(self) -> Result<D, HunterError>
    where
        D: DeserializeOwned,
    {
        let value = self.exchange().await?;
        serde_path_to_error::deserialize(value)
            .map_err(|error| HunterError::DataDeserialization { error })
    }

    async fn exchange(self) -> Result<serde_json::Value, HunterError> {
        let Self {
            hunter,
            kind,
            endpoint,
            text,
            options,
        } = self;

        let request = build_request(
            &endpoint,
            &text,
            hunter.compact_operations,
            &hunter.default_headers,
            &options,
        )?;

        debug!(%kind, ?request, "sending...");
        let response = hunter.transport.send(request).await?;

        handle_response(&hunter.events, kind, &endpoint, response)
    }
}

impl<'a, T> IntoFuture for Operation<'a, T>
where
    T: Transport,
{
    type Output = Result<serde_json::Value, HunterError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send + 'a>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.exchange())
    }
}

pub(in crate::client) fn build_request(
    endpoint: &str,
    text: &str,
    compact: bool,
    default_headers: &HeaderMap,
    options: &CallOptions,
) -> Result<http::Request<String>, HunterError> {
    let url = Url::parse(endpoint)?;
    let text = if compact {
        Cow::Owned(remove_spaces(text))
    } else {
        Cow::Borrowed(text)
    };
    let body = serde_json::to_string(&OperationBody { query: &text })?;

    let mut request = http::Request::builder()
        .method(Method::POST)
        .uri(url.as_str())
        .body(body)?;

    let req_headers = request.headers_mut();
    for (name, value) in default_headers {
        req_headers.insert(name.clone(), value.clone());
    }
    options.apply(req_headers)?;
    req_headers.typed_insert(ContentType::json());

    Ok(request)
}

pub(in crate::client) fn handle_response(
    events: &EventBus<ApiError>,
    kind: OperationKind,
    endpoint: &str,
    response: http::Response<String>,
) -> Result<serde_json::Value, HunterError> {
    let status = response.status();
    let body = response.into_body();

    let envelope = match serde_json::from_str::<Envelope>(&body) {
        Ok(envelope) => envelope,
        Err(error) if status.is_success() => {
            return Err(HunterError::InvalidJson {
                endpoint: endpoint.to_string(),
                error,
                body: truncate_body(body),
            });
        }
        Err(_) => {
            return Err(HunterError::UnexpectedStatusCode {
                status_code: status.as_u16(),
                body: truncate_body(body),
            });
        }
    };

    if !status.is_success() && !envelope.has_errors() {
        return Err(HunterError::UnexpectedStatusCode {
            status_code: status.as_u16(),
            body: truncate_body(body),
        });
    }

    envelope.into_outcome().map_err(|error| {
        warn!(%kind, endpoint, errors = ?error.errors(), "GraphQL errors received");
        events.emit(ERROR_EVENT, &error);
        HunterError::Api(error)
    })
}

fn truncate_body(mut body: String) -> String {
    if let Some((index, _)) = body.char_indices().nth(BODY_MAX_LENGTH) {
        body.truncate(index);
        body.push_str("... (truncated)");
    }
    body
}
