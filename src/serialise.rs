//! Compact JSON serialisation of [JsonValue]s via [Display].
//!
//! The output re-parses to an equal tree: member order is kept, integers stay integers and
//! floats always carry a fractional part or exponent-free decimal digits.
use std::fmt::{Display, Formatter, Write};

use crate::JsonValue;

impl Display for JsonValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonValue::Null => f.write_str("null"),
            JsonValue::Boolean(b) => write!(f, "{}", b),
            JsonValue::Integer(n) => write!(f, "{}", n),
            JsonValue::Float(n) => f.write_str(&format_float(*n)),
            JsonValue::String(s) => write_escaped(f, s),
            JsonValue::Array(values) => {
                f.write_char('[')?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_char(']')
            }
            JsonValue::Object(pairs) => {
                f.write_char('{')?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        f.write_char(',')?;
                    }
                    write_escaped(f, key)?;
                    f.write_char(':')?;
                    write!(f, "{}", value)?;
                }
                f.write_char('}')
            }
        }
    }
}

/// Plain decimal rendering of a float: shortest round-trip digits, never scientific
/// notation, and integral values keep a single fractional zero (`1232.0`)
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn write_escaped(f: &mut Formatter<'_>, s: &str) -> std::fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            c if c < '\u{20}' => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
