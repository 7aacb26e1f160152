//! Field projection: pulling labelled values out of a document and rendering them as
//! `label=value` lines.
use std::io::{self, Write};

use crate::errors::{NavigationError, NavigationErrorReason};
use crate::navigator::extract;
use crate::pointer::JsonPointer;
use crate::serialise::format_float;
use crate::JsonValue;

/// How JSON null is rendered, an empty value
pub const NULL_MARKER: &str = "";

/// A rendered `(label, value)` pair
pub type Entry = (String, String);

/// Render a value for display. Strings appear without quotes, containers as compact JSON.
pub fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => NULL_MARKER.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Float(n) => format_float(*n),
        other => other.to_string(),
    }
}

/// A labelled pointer into a document
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub pointer: JsonPointer,
}

/// An ordered set of [Field]s to be extracted together
#[derive(Debug, Default, Clone)]
pub struct Projection {
    fields: Vec<Field>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the end of the projection
    pub fn field(mut self, label: impl Into<String>, pointer: JsonPointer) -> Self {
        self.fields.push(Field {
            label: label.into(),
            pointer,
        });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Extract and render every field, in order. The first field that can't be located fails
    /// the whole projection.
    pub fn project(&self, doc: &JsonValue) -> Result<Vec<Entry>, NavigationError> {
        self.fields
            .iter()
            .map(|field| {
                extract(doc, &field.pointer).map(|value| (field.label.clone(), render_value(value)))
            })
            .collect()
    }
}

/// Every member of the object at `pointer`, rendered, in document order
pub fn object_entries(doc: &JsonValue, pointer: &JsonPointer) -> Result<Vec<Entry>, NavigationError> {
    match extract(doc, pointer)? {
        JsonValue::Object(pairs) => Ok(pairs
            .iter()
            .map(|(key, value)| (key.clone(), render_value(value)))
            .collect()),
        other => Err(NavigationError {
            path_so_far: pointer.clone(),
            reason: NavigationErrorReason::WrongType {
                expected: "object",
                found: other.type_name(),
            },
        }),
    }
}

/// Write entries as newline delimited `label=value` lines
pub fn write_entries<W: Write + ?Sized>(out: &mut W, entries: &[Entry]) -> io::Result<()> {
    for (label, value) in entries {
        writeln!(out, "{}={}", label, value)?;
    }
    Ok(())
}
