use http::HeaderMap;
use http::header::HeaderName;
use indexmap::IndexMap;
use serde::Deserialize;

use super::auth::{SecureString, bearer_header, header_value};
use super::HunterError;

/// Per-call configuration of a GraphQL operation.
///
/// Options can be built in code or loaded from configuration:
///
/// ```rust
/// use rip_hunter::CallOptions;
///
/// # fn example() -> Result<(), serde_json::Error> {
/// let options = CallOptions::new()
///     .with_token("my-api-token")
///     .with_header("X-Request-ID", "abc-123");
///
/// let from_config: CallOptions = serde_json::from_str(
///     r#"{"token": "my-api-token", "headers": {"X-Request-ID": "abc-123"}}"#,
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CallOptions {
    token: Option<SecureString>,
    headers: IndexMap<String, String>,
}

impl CallOptions {
    /// Creates empty options: no token, no extra header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bearer token sent as `Authorization: Bearer <token>`.
    pub fn with_token(mut self, token: impl Into<SecureString>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Adds an extra request header; a later value for the same name replaces the former.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The bearer token, if any.
    pub fn token(&self) -> Option<&SecureString> {
        self.token.as_ref()
    }

    /// Writes the extra headers, then the authorization header, into the request headers.
    pub(in crate::client) fn apply(&self, req_headers: &mut HeaderMap) -> Result<(), HunterError> {
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            let value = header_value(&name, value)?;
            req_headers.insert(name, value);
        }

        if let Some(token) = &self.token {
            req_headers.insert(http::header::AUTHORIZATION, bearer_header(token)?);
        }

        Ok(())
    }
}
