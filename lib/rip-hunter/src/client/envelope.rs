use serde::Deserialize;

use super::ApiError;

/// The top-level JSON object returned by a GraphQL endpoint.
#[derive(Debug, Default, Deserialize)]
pub(in crate::client) struct Envelope {
    #[serde(default)]
    pub(in crate::client) data: Option<serde_json::Value>,
    #[serde(default)]
    pub(in crate::client) errors: Option<Vec<ErrorEntry>>,
}

/// An entry of the `errors` list, only its `message` is kept.
#[derive(Debug, Deserialize)]
pub(in crate::client) struct ErrorEntry {
    #[serde(default)]
    pub(in crate::client) message: String,
}

impl Envelope {
    /// Splits the envelope into its outcome: the messages of a non-empty errors list,
    /// or the data (`null` when absent).
    pub(in crate::client) fn into_outcome(self) -> Result<serde_json::Value, ApiError> {
        match self.errors {
            Some(errors) if !errors.is_empty() => {
                let messages = errors.into_iter().map(|entry| entry.message).collect();
                Err(ApiError::new(messages))
            }
            _ => Ok(self.data.unwrap_or_default()),
        }
    }

    /// Whether the envelope carries a non-empty errors list.
    pub(in crate::client) fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }
}
