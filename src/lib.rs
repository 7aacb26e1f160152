//! Untyped JSON decoding and navigation, plus the pieces needed to fetch and print a
//! weather.gov forecast with it.
//!
//! A document is decoded once by the [dom::Parser] into a [JsonValue] tree, and then navigated
//! with [JsonPointer]s via [navigator::extract]. No schema is required up front.
//!
//! ```
//! use chisel_forecast::dom::Parser;
//!
//! let doc = Parser::default()
//!     .parse_str(r#"{"properties": {"periods": [{"name": "Tonight"}]}}"#)
//!     .unwrap();
//! let name = doc.pointer("/properties/periods/0/name").unwrap();
//! assert_eq!(name.as_str(), Some("Tonight"));
//! ```

pub mod coords;
pub mod decoders;
pub mod dom;
pub mod errors;
pub mod fetch;
pub mod forecast;
pub mod lexer;
pub mod navigator;
pub mod pointer;
pub mod projection;
pub mod serialise;
#[cfg(test)]
mod test_macros;

pub use crate::errors::{Error, ErrorKind, NavigationError, ParserError};
pub use crate::pointer::JsonPointer;

/// Basic enumeration of different Json values
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    /// Object members, in the order they appeared within the input
    Object(Vec<(String, JsonValue)>),
    /// Array of values
    Array(Vec<JsonValue>),
    /// Canonical string value
    String(String),
    /// Floating point numeric value
    Float(f64),
    /// Integer numeric value
    Integer(i64),
    /// Canonical boolean value
    Boolean(bool),
    /// Canonical null value
    Null,
}

impl JsonValue {
    /// A short name for the kind of value, used within error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Object(_) => "object",
            JsonValue::Array(_) => "array",
            JsonValue::String(_) => "string",
            JsonValue::Float(_) | JsonValue::Integer(_) => "number",
            JsonValue::Boolean(_) => "boolean",
            JsonValue::Null => "null",
        }
    }

    /// Look up a member of an object by key
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Look up an element of an array by index
    pub fn at(&self, index: usize) -> Option<&JsonValue> {
        match self {
            JsonValue::Array(values) => values.get(index),
            _ => None,
        }
    }

    /// Parse `pointer` as an RFC 6901 pointer and extract the value it refers to
    pub fn pointer(&self, pointer: &str) -> Option<&JsonValue> {
        let pointer = pointer.parse::<JsonPointer>().ok()?;
        navigator::extract(self, &pointer).ok()
    }

    pub fn as_object(&self) -> Option<&[(String, JsonValue)]> {
        match self {
            JsonValue::Object(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as a float, integers included
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Float(n) => Some(*n),
            JsonValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Whether the value is a leaf rather than an object or array
    pub fn is_scalar(&self) -> bool {
        !matches!(self, JsonValue::Object(_) | JsonValue::Array(_))
    }
}
