use http::HeaderMap;

use crate::events::{EventBus, ListenerId};

mod builder;
pub use self::builder::HunterBuilder;

mod operation;
pub use self::operation::{Operation, OperationKind};

mod options;
pub use self::options::CallOptions;

mod auth;
pub use self::auth::{AuthenticationError, SecureString};

mod transport;
pub use self::transport::{ReqwestTransport, Transport, TransportError};

mod envelope;

mod error;
pub use self::error::{ApiError, HunterError};

#[cfg(test)]
mod tests;

/// GraphQL over HTTP client.
///
/// `Hunter` sends hand-written GraphQL operations to an endpoint and interprets the
/// response envelope: the `data` member on success, an [`ApiError`] built from the
/// `errors` messages otherwise. Each [`ApiError`] is also emitted as
/// [`ERROR_EVENT`](crate::ERROR_EVENT) on the client's [`EventBus`].
///
/// # Example
///
/// ```rust,no_run
/// use rip_hunter::{ApiError, ERROR_EVENT, Hunter};
/// # use serde::Deserialize;
/// # #[derive(Deserialize)]
/// # struct App { ping: String }
/// # #[derive(Deserialize)]
/// # struct Ping { app: App }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let hunter = Hunter::new();
/// hunter.on(ERROR_EVENT, |error: &ApiError| eprintln!("{error}"));
///
/// let ping: Ping = hunter
///     .query("https://api.example.com/graphql", "{ app { ping } }")
///     .with_token("my-api-token")
///     .data()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// Cloning a `Hunter` is cheap; clones share the transport configuration and the event bus.
#[derive(Debug, Clone)]
pub struct Hunter<T = ReqwestTransport> {
    transport: T,
    events: EventBus<ApiError>,
    default_headers: HeaderMap,
    compact_operations: bool,
}

// Create
impl Hunter {
    /// Creates a client with the default configuration.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder to configure the client.
    pub fn builder() -> HunterBuilder {
        HunterBuilder::default()
    }
}

impl Default for Hunter {
    fn default() -> Self {
        Self::new()
    }
}

// Events
impl<T> Hunter<T> {
    /// The event bus where [`ERROR_EVENT`](crate::ERROR_EVENT) is emitted.
    pub fn events(&self) -> &EventBus<ApiError> {
        &self.events
    }

    /// Registers a listener on the client's event bus.
    pub fn on<F>(&self, event: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(&ApiError) + Send + Sync + 'static,
    {
        self.events.on(event, listener)
    }

    /// Unregisters a listener from the client's event bus.
    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }
}

// Operations
impl<T> Hunter<T>
where
    T: Transport,
{
    /// Prepares a GraphQL operation of the given kind.
    pub fn operation(
        &self,
        kind: OperationKind,
        endpoint: impl Into<String>,
        text: impl Into<String>,
    ) -> Operation<'_, T> {
        Operation::new(self, kind, endpoint.into(), text.into())
    }

    /// Prepares a GraphQL query, sent when awaited.
    pub fn query(&self, endpoint: impl Into<String>, text: impl Into<String>) -> Operation<'_, T> {
        self.operation(OperationKind::Query, endpoint, text)
    }

    /// Prepares a GraphQL mutation, sent when awaited.
    ///
    /// The request is the same as for a query: the operation text carries the intent.
    pub fn mutation(
        &self,
        endpoint: impl Into<String>,
        text: impl Into<String>,
    ) -> Operation<'_, T> {
        self.operation(OperationKind::Mutation, endpoint, text)
    }
}
