//! Conversion of native values into GraphQL literal text.
//!
//! Any value implementing [`Serialize`] can be embedded into a hand-written operation.
//! The value is first presented as its plain structure (a [`serde_json::Value`] with
//! insertion-ordered objects), then rendered recursively:
//!
//! | Plain structure | GraphQL literal          |
//! |-----------------|--------------------------|
//! | string          | `"text"` (kept as-is)    |
//! | number          | `123`, `1.5`             |
//! | boolean / null  | `true`, `false`, `null`  |
//! | object          | `{key: value, other: 2}` |
//! | array           | `[1, 2, 3]`              |
//!
//! Collections from any library (`IndexMap`, `BTreeMap`, persistent collections, ...)
//! are supported as long as they serialize as a map or a sequence.
//!
//! ```rust
//! use rip_hunter::to_gql;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Filter {
//!     name: &'static str,
//!     limit: u32,
//! }
//!
//! # fn main() -> Result<(), rip_hunter::ToGqlError> {
//! let filter = Filter { name: "rip", limit: 10 };
//! assert_eq!(to_gql(&filter)?, r#"{name: "rip", limit: 10}"#);
//! assert_eq!(to_gql(&["a", "b"])?, r#"["a", "b"]"#);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

mod finite;

const SEPARATOR: &str = ", ";

/// Errors that can occur while converting a value into a GraphQL literal.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ToGqlError {
    /// The value cannot be presented as a plain scalar, mapping or sequence.
    ///
    /// Occurs for maps whose keys are not strings or integers, or for custom
    /// `Serialize` implementations that fail.
    #[display("Unsupported value for a GraphQL literal: {error}")]
    UnsupportedType {
        /// The underlying conversion error.
        error: serde_json::Error,
    },

    /// The value holds a `NaN` or infinite float, which has no GraphQL literal.
    #[display("Non-finite number {value} has no GraphQL literal")]
    NonFiniteNumber {
        /// The offending number.
        value: f64,
    },

    /// Object fields were requested for a value that is not a mapping.
    #[display("Expected an object to render GraphQL arguments, got {kind}")]
    NotAnObject {
        /// Kind of the plain value that was received.
        kind: &'static str,
    },
}

/// Converts a value into its GraphQL literal text.
///
/// # Errors
///
/// Returns [`ToGqlError::UnsupportedType`] if the value cannot be presented as a plain structure,
/// or [`ToGqlError::NonFiniteNumber`] if it holds a `NaN` or infinite float.
pub fn to_gql<T>(value: &T) -> Result<String, ToGqlError>
where
    T: Serialize + ?Sized,
{
    let plain = to_plain(value)?;
    Ok(render(&plain))
}

/// Converts a mapping into GraphQL arguments, without the surrounding braces.
///
/// ```rust
/// # fn main() -> Result<(), rip_hunter::ToGqlError> {
/// let args = rip_hunter::to_gql_arguments(&serde_json::json!({"id": 42, "name": "rip"}))?;
/// let operation = format!("{{ user({args}) {{ id }} }}");
/// assert_eq!(operation, r#"{ user(id: 42, name: "rip") { id } }"#);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`ToGqlError::UnsupportedType`] or [`ToGqlError::NonFiniteNumber`] like [`to_gql`],
/// or [`ToGqlError::NotAnObject`] if the value is not a mapping.
pub fn to_gql_arguments<T>(value: &T) -> Result<String, ToGqlError>
where
    T: Serialize + ?Sized,
{
    let plain = to_plain(value)?;
    let Value::Object(fields) = &plain else {
        return Err(ToGqlError::NotAnObject {
            kind: kind_of(&plain),
        });
    };

    let mut out = String::new();
    write_fields(&mut out, fields);
    Ok(out)
}

/// Renders an already plain structure into GraphQL literal text.
pub fn render(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn to_plain<T>(value: &T) -> Result<Value, ToGqlError>
where
    T: Serialize + ?Sized,
{
    if let Some(value) = finite::first_non_finite(value) {
        return Err(ToGqlError::NonFiniteNumber { value });
    }
    serde_json::to_value(value).map_err(|error| ToGqlError::UnsupportedType { error })
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(number) => out.push_str(&number.to_string()),
        Value::String(text) => {
            out.push('"');
            out.push_str(text);
            out.push('"');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(SEPARATOR);
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            write_fields(out, fields);
            out.push('}');
        }
    }
}

fn write_fields(out: &mut String, fields: &Map<String, Value>) {
    for (index, (key, value)) in fields.iter().enumerate() {
        if index > 0 {
            out.push_str(SEPARATOR);
        }
        out.push_str(key);
        out.push_str(": ");
        write_value(out, value);
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
