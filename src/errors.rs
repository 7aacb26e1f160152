//! General error types for the parser, the navigator and the forecast application

use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

use crate::coords::Coords;
use crate::lexer::Token;
use crate::pointer::JsonPointer;

/// Global result type used throughout the parser stages
pub type ParserResult<T> = Result<T, ParserError>;

/// Enumeration of the various different parser stages that can produce an error
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParserErrorSource {
    /// The lexer stage of the parser
    Lexer,
    /// The DOM construction stage of the parser
    DomParser,
}

/// A global enumeration of parser error codes
#[derive(Debug, Clone, PartialEq)]
pub enum ParserErrorDetails {
    /// The input ended in the middle of a value
    EndOfInput,
    /// There was nothing to parse
    ZeroLengthInput,
    /// A file couldn't be opened for parsing
    InvalidFile,
    /// A token which can't appear at this point in the grammar
    UnexpectedToken(Token),
    /// An object member key wasn't followed by a colon
    PairExpected,
    /// A comma directly before a closing brace or bracket
    TrailingComma,
    /// Something other than whitespace after the root value
    TrailingInput,
    /// A character that can't start any token
    InvalidCharacter(char),
    /// A literal (`true`, `false`, `null`) that didn't match
    MatchFailed(String),
    /// A string that never saw its closing quote
    UnterminatedString,
    /// A raw control character inside a string
    ControlCharacterInString(char),
    InvalidNumericRepresentation(String),
    InvalidEscapeSequence(String),
    InvalidUnicodeEscapeSequence(String),
    /// Containers nested beyond the configured limit
    MaximumDepthExceeded(usize),
}

impl Display for ParserErrorDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserErrorDetails::EndOfInput => write!(f, "unexpected end of input"),
            ParserErrorDetails::ZeroLengthInput => write!(f, "zero length input"),
            ParserErrorDetails::InvalidFile => write!(f, "invalid file specified"),
            ParserErrorDetails::UnexpectedToken(token) => {
                write!(f, "unexpected token found: {}", token)
            }
            ParserErrorDetails::PairExpected => write!(f, "expected ':' after object key"),
            ParserErrorDetails::TrailingComma => write!(f, "trailing comma"),
            ParserErrorDetails::TrailingInput => write!(f, "unexpected input after root value"),
            ParserErrorDetails::InvalidCharacter(c) => write!(f, "invalid character: {:?}", c),
            ParserErrorDetails::MatchFailed(expected) => {
                write!(f, "expected '{}', couldn't match", expected)
            }
            ParserErrorDetails::UnterminatedString => write!(f, "unterminated string"),
            ParserErrorDetails::ControlCharacterInString(c) => {
                write!(f, "unescaped control character {:?} in string", c)
            }
            ParserErrorDetails::InvalidNumericRepresentation(repr) => {
                write!(f, "invalid number: '{}'", repr)
            }
            ParserErrorDetails::InvalidEscapeSequence(seq) => {
                write!(f, "invalid escape sequence: '{}'", seq)
            }
            ParserErrorDetails::InvalidUnicodeEscapeSequence(seq) => {
                write!(f, "invalid unicode escape sequence: '{}'", seq)
            }
            ParserErrorDetails::MaximumDepthExceeded(max) => {
                write!(f, "maximum nesting depth of {} exceeded", max)
            }
        }
    }
}

/// The general parser error structure
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    /// The originating stage for the error
    pub source: ParserErrorSource,
    /// The global error code for the error
    pub details: ParserErrorDetails,
    /// Optional parser coordinates
    pub coords: Option<Coords>,
}

impl ParserError {
    /// The absolute character offset of the error, if known
    pub fn offset(&self) -> Option<usize> {
        self.coords.map(|c| c.absolute)
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.coords {
            Some(coords) => write!(
                f,
                "{} at line {}, column {} (offset {})",
                self.details, coords.line, coords.column, coords.absolute
            ),
            None => write!(f, "{}", self.details),
        }
    }
}

impl StdError for ParserError {}

#[macro_export]
macro_rules! lexer_error {
    ($details: expr, $coords: expr) => {
        Err(ParserError {
            source: ParserErrorSource::Lexer,
            details: $details,
            coords: Some($coords),
        })
    };
}

#[macro_export]
macro_rules! dom_parser_error {
    ($details: expr, $coords: expr) => {
        Err(ParserError {
            source: ParserErrorSource::DomParser,
            details: $details,
            coords: Some($coords),
        })
    };
    ($details: expr) => {
        Err(ParserError {
            source: ParserErrorSource::DomParser,
            details: $details,
            coords: None,
        })
    };
}

/// Why a walk through a document stopped short
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationErrorReason {
    /// The value at this point isn't the kind of container the component addresses
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// The object doesn't have a member with this key
    MissingKey(String),
    /// The array is shorter than the requested index
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for NavigationErrorReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationErrorReason::WrongType { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            NavigationErrorReason::MissingKey(key) => write!(f, "missing key '{}'", key),
            NavigationErrorReason::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for array of length {}", index, len)
            }
        }
    }
}

/// Error produced when extracting a value by [JsonPointer] fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError {
    /// The prefix of the requested pointer, up to and including the failing component
    pub path_so_far: JsonPointer,
    pub reason: NavigationErrorReason,
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at '{}'", self.reason, self.path_so_far)
    }
}

impl StdError for NavigationError {}

/// Classes of failure for the forecast application, each with its own exit code
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The forecast couldn't be retrieved
    Transport,
    /// The retrieved document isn't valid JSON
    Parse,
    /// A member holding an encoded JSON document isn't valid JSON
    NestedParse,
    /// Valid JSON, but not shaped like a forecast
    Navigation,
    /// Output couldn't be written
    Io,
    Usage,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<NavigationError> for Error {
    fn from(err: NavigationError) -> Self {
        Error::new(ErrorKind::Navigation)
            .with_message("forecast document has an unexpected shape")
            .with_source(err)
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Transport => 1,
        ErrorKind::Parse => 2,
        ErrorKind::NestedParse => 3,
        ErrorKind::Navigation => 4,
        ErrorKind::Io => 5,
        ErrorKind::Usage => 64,
    }
}
