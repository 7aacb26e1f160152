//! The DOM parser operates over a stream of `char`s produced by some flavour of iterator.
//! Byte-oriented input (files, HTTP bodies) is converted into such a stream by a decoder.
//!
//! The [DecoderSelector] implemented within this module is used to instantiate new `char`
//! iterators, based on different encodings. (Currently only ASCII and UTF-8 are supported).
use chisel_decoders::{ascii::AsciiDecoder, utf8::Utf8Decoder};
use std::fmt::{Display, Formatter};
use std::io::BufRead;
use std::str::FromStr;

/// Enumeration of different supported encoding types
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
}

impl Default for Encoding {
    #[cfg(feature = "default_utf8_encoding")]
    fn default() -> Self {
        Self::Utf8
    }

    #[cfg(not(feature = "default_utf8_encoding"))]
    fn default() -> Self {
        Self::Ascii
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Encoding::Utf8 => write!(f, "utf8"),
            Encoding::Ascii => write!(f, "ascii"),
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            other => Err(format!("unsupported encoding '{other}' (expected utf8 or ascii)")),
        }
    }
}

/// A struct that is essentially a factory for creating new instances of [char] iterators,
/// based on a specified encoding type
#[derive(Debug, Default, Clone)]
pub(crate) struct DecoderSelector {}

impl DecoderSelector {
    /// Create and return a byte decoder / char iterator for a specific encoding
    pub fn new_decoder<'a, Buffer: BufRead>(
        &'a self,
        buffer: &'a mut Buffer,
        encoding: Encoding,
    ) -> Box<dyn Iterator<Item = char> + 'a> {
        match encoding {
            Encoding::Ascii => Box::new(AsciiDecoder::new(buffer)),
            Encoding::Utf8 => Box::new(Utf8Decoder::new(buffer)),
        }
    }
}
