//! # Rip Hunter
//!
//! A minimal GraphQL over HTTP client.
//!
//! This crate provides:
//! - **[`Hunter`]** - sends queries and mutations, returns the response `data` or an [`ApiError`]
//! - **[`to_gql`]** - converts native values into GraphQL literal text
//! - **[`remove_spaces`]** - compacts operation text, keeping string literals intact
//! - **[`EventBus`]** - lets the application observe [`ERROR_EVENT`] for every failing operation
//!
//! There is no schema validation, no variables, no batching and no cache: operations are
//! plain text, values are embedded with [`to_gql`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rip_hunter::{ApiError, ERROR_EVENT, Hunter, to_gql};
//! # use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct NewUser {
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! #[derive(Deserialize)]
//! struct Created {
//!     id: u64,
//! }
//!
//! #[derive(Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct AddUser {
//!     add_user: Created,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hunter = Hunter::new();
//! hunter.on(ERROR_EVENT, |error: &ApiError| tracing::warn!(%error, "GraphQL failure"));
//!
//! let user = NewUser {
//!     name: "rip".to_string(),
//!     tags: vec!["admin".to_string()],
//! };
//! // mutation { addUser(user: {name: "rip", tags: ["admin"]}) { id } }
//! let mutation = format!("mutation {{ addUser(user: {}) {{ id }} }}", to_gql(&user)?);
//!
//! let result: AddUser = hunter
//!     .mutation("https://api.example.com/graphql", mutation)
//!     .with_token("my-api-token")
//!     .data()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is returned as a [`HunterError`]:
//!
//! - [`HunterError::Api`] when the endpoint answers with a GraphQL `errors` list;
//!   the [`ApiError`] holds each entry's `message` and is also emitted as [`ERROR_EVENT`]
//! - [`HunterError::Transport`] when the request cannot be delivered
//! - [`HunterError::InvalidJson`] when the body is not a GraphQL response
//! - [`HunterError::UnexpectedStatusCode`] for a non-success status without `errors`
//!
//! ```rust,no_run
//! # async fn example(hunter: rip_hunter::Hunter) {
//! match hunter.query("https://api.example.com/graphql", "{ app { ping } }").await {
//!     Ok(data) => tracing::info!(%data, "pong"),
//!     Err(error) => match error.api_error() {
//!         Some(api_error) => tracing::warn!(errors = ?api_error.errors(), "rejected"),
//!         None => tracing::error!(%error, "unreachable endpoint"),
//!     },
//! }
//! # }
//! ```

mod client;
pub use self::client::{
    ApiError, AuthenticationError, CallOptions, Hunter, HunterBuilder, HunterError, Operation,
    OperationKind, ReqwestTransport, SecureString, Transport, TransportError,
};

mod compact;
pub use self::compact::remove_spaces;

pub mod events;
pub use self::events::{ERROR_EVENT, EventBus, ListenerId};

pub mod literal;
pub use self::literal::{ToGqlError, to_gql, to_gql_arguments};
