use http::HeaderMap;
use http::header::HeaderName;

use super::auth::header_value;
use super::{ApiError, Hunter, HunterError, ReqwestTransport, Transport};
use crate::events::EventBus;

/// Builder for creating [`Hunter`] instances.
///
/// # Default Configuration
///
/// - **Transport**: [`ReqwestTransport`] with a default `reqwest::Client`
/// - **Event bus**: a new, empty [`EventBus`]
/// - **Default headers**: none
/// - **Compact operations**: disabled, the operation text is sent as written
///
/// # Example
///
/// ```rust
/// use rip_hunter::{ApiError, EventBus, Hunter};
///
/// # fn example() -> Result<(), rip_hunter::HunterError> {
/// // Created once at application start, shared with every client
/// let events = EventBus::<ApiError>::new();
///
/// let hunter = Hunter::builder()
///     .with_client(reqwest::Client::new())
///     .with_event_bus(events.clone())
///     .with_default_header("X-Client", "rip-hunter")?
///     .with_compact_operations(true)
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HunterBuilder<T = ReqwestTransport> {
    transport: T,
    events: Option<EventBus<ApiError>>,
    default_headers: HeaderMap,
    compact_operations: bool,
}

impl Default for HunterBuilder {
    fn default() -> Self {
        Self {
            transport: ReqwestTransport::default(),
            events: None,
            default_headers: HeaderMap::new(),
            compact_operations: false,
        }
    }
}

impl HunterBuilder {
    /// Uses the given reqwest client for the default transport.
    ///
    /// Configure timeouts, proxies or TLS on the reqwest client itself.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.transport = ReqwestTransport::new(client);
        self
    }
}

impl<T> HunterBuilder<T> {
    /// Builds the client.
    pub fn build(self) -> Hunter<T> {
        let Self {
            transport,
            events,
            default_headers,
            compact_operations,
        } = self;

        Hunter {
            transport,
            events: events.unwrap_or_default(),
            default_headers,
            compact_operations,
        }
    }

    /// Replaces the transport used to send requests.
    pub fn with_transport<U>(self, transport: U) -> HunterBuilder<U>
    where
        U: Transport,
    {
        let Self {
            transport: _,
            events,
            default_headers,
            compact_operations,
        } = self;

        HunterBuilder {
            transport,
            events,
            default_headers,
            compact_operations,
        }
    }

    /// Emits errors on the given event bus instead of a new one.
    pub fn with_event_bus(mut self, events: EventBus<ApiError>) -> Self {
        self.events = Some(events);
        self
    }

    /// Adds a header sent with every operation.
    ///
    /// Per-call headers and the bearer token take precedence over default headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or the value is not a valid HTTP header.
    pub fn with_default_header(mut self, name: &str, value: &str) -> Result<Self, HunterError> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = header_value(&name, value)?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Removes whitespace outside string literals from the operation text before sending it.
    ///
    /// See [`remove_spaces`](crate::remove_spaces).
    pub fn with_compact_operations(mut self, compact_operations: bool) -> Self {
        self.compact_operations = compact_operations;
        self
    }
}
