//! The DOM parser
//!
//! Parses the supplied input and produces a complete [JsonValue] tree. The parse either
//! succeeds with the whole document, or fails at the first error found. There is no
//! partial result.
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use crate::coords::{Coords, Span};
use crate::decoders::{DecoderSelector, Encoding};
use crate::dom_parser_error;
use crate::errors::{ParserError, ParserErrorDetails, ParserErrorSource, ParserResult};
use crate::lexer::{Lexer, Token};
use crate::JsonValue;

/// Default limit on the nesting of objects and arrays
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Hard ceiling on nesting. Descent is recursive, so larger limits are clamped to this to keep
/// deep input a [ParserErrorDetails::MaximumDepthExceeded] rather than a stack overflow.
pub const MAX_NESTING_LIMIT: usize = 256;

/// Main JSON parser struct
#[derive(Debug, Clone)]
pub struct Parser {
    decoders: DecoderSelector,
    encoding: Encoding,
    max_depth: usize,
}

impl Default for Parser {
    /// The default encoding is Utf-8, with a nesting limit of [DEFAULT_MAX_DEPTH]
    fn default() -> Self {
        Self {
            decoders: Default::default(),
            encoding: Default::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Parser {
    /// Create a new instance of the parser using a specific [Encoding] for byte and file input
    pub fn with_encoding(encoding: Encoding) -> Self {
        Self {
            encoding,
            ..Default::default()
        }
    }

    /// Limit the nesting of containers to `max_depth` levels. [None], or any limit above
    /// [MAX_NESTING_LIMIT], is clamped to [MAX_NESTING_LIMIT].
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth
            .unwrap_or(MAX_NESTING_LIMIT)
            .min(MAX_NESTING_LIMIT);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Parse the contents of a file, decoded using the parser's [Encoding]
    pub fn parse_file<PathLike: AsRef<Path>>(&self, path: PathLike) -> ParserResult<JsonValue> {
        match File::open(&path) {
            Ok(f) => {
                let mut reader = BufReader::new(f);
                let mut chars = self.decoders.new_decoder(&mut reader, self.encoding);
                self.parse(&mut chars)
            }
            Err(err) => {
                debug!(path = %path.as_ref().display(), error = %err, "unable to open file");
                dom_parser_error!(ParserErrorDetails::InvalidFile)
            }
        }
    }

    /// Parse a buffer of bytes, decoded using the parser's [Encoding]
    pub fn parse_bytes(&self, bytes: &[u8]) -> ParserResult<JsonValue> {
        if bytes.is_empty() {
            return dom_parser_error!(ParserErrorDetails::ZeroLengthInput, Coords::default());
        }
        let mut reader = BufReader::new(bytes);
        let mut chars = self.decoders.new_decoder(&mut reader, self.encoding);
        self.parse(&mut chars)
    }

    pub fn parse_str(&self, str: &str) -> ParserResult<JsonValue> {
        if str.is_empty() {
            return dom_parser_error!(ParserErrorDetails::ZeroLengthInput, Coords::default());
        }
        self.parse(&mut str.chars())
    }

    /// Parse a single root value from a stream of chars. Anything other than whitespace
    /// following the root value is an error.
    pub fn parse(&self, chars: &mut dyn Iterator<Item = char>) -> ParserResult<JsonValue> {
        let mut lexer = Lexer::new(chars);
        let value = match lexer.consume()? {
            (Token::EndOfInput, span) => {
                return dom_parser_error!(ParserErrorDetails::ZeroLengthInput, span.start)
            }
            (token, span) => self.parse_value(&mut lexer, token, span, 0)?,
        };
        match lexer.consume()? {
            (Token::EndOfInput, _) => Ok(value),
            (_, span) => dom_parser_error!(ParserErrorDetails::TrailingInput, span.start),
        }
    }

    /// Build a value from an already consumed token, descending into containers
    fn parse_value(
        &self,
        lexer: &mut Lexer,
        token: Token,
        span: Span,
        depth: usize,
    ) -> ParserResult<JsonValue> {
        match token {
            Token::StartObject => self.parse_object(lexer, span, depth + 1),
            Token::StartArray => self.parse_array(lexer, span, depth + 1),
            Token::Str(str) => Ok(JsonValue::String(str)),
            Token::Float(value) => Ok(JsonValue::Float(value)),
            Token::Integer(value) => Ok(JsonValue::Integer(value)),
            Token::Boolean(value) => Ok(JsonValue::Boolean(value)),
            Token::Null => Ok(JsonValue::Null),
            Token::EndOfInput => dom_parser_error!(ParserErrorDetails::EndOfInput, span.start),
            token => dom_parser_error!(ParserErrorDetails::UnexpectedToken(token), span.start),
        }
    }

    fn check_depth(&self, depth: usize, span: Span) -> ParserResult<()> {
        if depth > self.max_depth {
            return dom_parser_error!(
                ParserErrorDetails::MaximumDepthExceeded(self.max_depth),
                span.start
            );
        }
        Ok(())
    }

    /// Error for a token found where a separator or closing delimiter should be
    fn unexpected<T>(token: Token, span: Span) -> ParserResult<T> {
        match token {
            Token::EndOfInput => dom_parser_error!(ParserErrorDetails::EndOfInput, span.start),
            token => dom_parser_error!(ParserErrorDetails::UnexpectedToken(token), span.start),
        }
    }

    /// An object is just a list of comma separated KV pairs
    fn parse_object(&self, lexer: &mut Lexer, open: Span, depth: usize) -> ParserResult<JsonValue> {
        self.check_depth(depth, open)?;
        let mut members = Members::default();
        match lexer.consume()? {
            (Token::EndObject, _) => return Ok(members.into_value()),
            (Token::Str(key), _) => self.parse_pair(lexer, key, depth, &mut members)?,
            (token, span) => return Self::unexpected(token, span),
        }
        loop {
            match lexer.consume()? {
                (Token::Comma, _) => match lexer.consume()? {
                    (Token::Str(key), _) => self.parse_pair(lexer, key, depth, &mut members)?,
                    (Token::EndObject, span) => {
                        return dom_parser_error!(ParserErrorDetails::TrailingComma, span.start)
                    }
                    (token, span) => return Self::unexpected(token, span),
                },
                (Token::EndObject, _) => return Ok(members.into_value()),
                (token, span) => return Self::unexpected(token, span),
            }
        }
    }

    /// Parse the `: value` following a key
    fn parse_pair(
        &self,
        lexer: &mut Lexer,
        key: String,
        depth: usize,
        members: &mut Members,
    ) -> ParserResult<()> {
        match lexer.consume()? {
            (Token::Colon, _) => (),
            (_, span) => return dom_parser_error!(ParserErrorDetails::PairExpected, span.start),
        }
        let (token, span) = lexer.consume()?;
        let value = self.parse_value(lexer, token, span, depth)?;
        members.insert(key, value);
        Ok(())
    }

    /// An array is just a list of comma separated values
    fn parse_array(&self, lexer: &mut Lexer, open: Span, depth: usize) -> ParserResult<JsonValue> {
        self.check_depth(depth, open)?;
        let mut values: Vec<JsonValue> = vec![];
        match lexer.consume()? {
            (Token::EndArray, _) => return Ok(JsonValue::Array(values)),
            (token, span) => values.push(self.parse_value(lexer, token, span, depth)?),
        }
        loop {
            match lexer.consume()? {
                (Token::Comma, _) => match lexer.consume()? {
                    (Token::EndArray, span) => {
                        return dom_parser_error!(ParserErrorDetails::TrailingComma, span.start)
                    }
                    (token, span) => values.push(self.parse_value(lexer, token, span, depth)?),
                },
                (Token::EndArray, _) => return Ok(JsonValue::Array(values)),
                (token, span) => return Self::unexpected(token, span),
            }
        }
    }
}

/// The members of an object under construction, indexed by key. A repeated key keeps its
/// first position but takes the later value.
#[derive(Default)]
struct Members {
    pairs: Vec<(String, JsonValue)>,
    positions: HashMap<String, usize>,
}

impl Members {
    fn insert(&mut self, key: String, value: JsonValue) {
        match self.positions.get(&key) {
            Some(&index) => self.pairs[index].1 = value,
            None => {
                self.positions.insert(key.clone(), self.pairs.len());
                self.pairs.push((key, value));
            }
        }
    }

    fn into_value(self) -> JsonValue {
        JsonValue::Object(self.pairs)
    }
}

#[cfg(test)]
mod tests {
    use crate::decoders::Encoding;
    use crate::dom::{Parser, MAX_NESTING_LIMIT};
    use crate::errors::{ParserErrorDetails, ParserErrorSource};
    use crate::lexer::Token;
    use crate::relative_file;
    use crate::JsonValue;
    use bytesize::ByteSize;
    use std::fs;
    use std::time::Instant;

    #[test]
    fn should_parse_char_iterators_directly() {
        let source = r#"{
            "test" : 1232.0,
            "some other" : "thasdasd",
            "a bool" : true,
            "an array" : [1,2,3,4,5.8,6,7.2,7,8,10]
        }"#;
        let parser = Parser::default();
        let parsed = parser.parse(&mut source.chars()).unwrap();
        assert_eq!(parsed.get("test"), Some(&JsonValue::Float(1232.0)));
        assert_eq!(
            parsed.get("an array").and_then(|a| a.at(4)),
            Some(&JsonValue::Float(5.8))
        );
    }

    #[test]
    fn object_members_should_keep_document_order() {
        let parsed = Parser::default()
            .parse_str(r#"{"zulu": 1, "alpha": 2, "mike": 3}"#)
            .unwrap();
        let keys: Vec<&str> = parsed
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn duplicate_keys_should_keep_first_position_and_last_value() {
        let parsed = Parser::default()
            .parse_str(r#"{"a": 1, "b": 2, "a": 3}"#)
            .unwrap();
        assert_eq!(
            parsed,
            JsonValue::Object(vec![
                ("a".to_string(), JsonValue::Integer(3)),
                ("b".to_string(), JsonValue::Integer(2)),
            ])
        );
    }

    #[test]
    fn scalar_roots_should_be_accepted() {
        let parser = Parser::default();
        assert_eq!(parser.parse_str(" 42 ").unwrap(), JsonValue::Integer(42));
        assert_eq!(parser.parse_str("null").unwrap(), JsonValue::Null);
        assert_eq!(
            parser.parse_str("\"x\"").unwrap(),
            JsonValue::String("x".to_string())
        );
    }

    #[test]
    fn missing_values_should_fail_at_the_offending_token() {
        let err = Parser::default().parse_str(r#"{"a": }"#).unwrap_err();
        assert_eq!(err.source, ParserErrorSource::DomParser);
        assert_eq!(
            err.details,
            ParserErrorDetails::UnexpectedToken(Token::EndObject)
        );
        assert!(err.offset().unwrap() <= 6);
    }

    #[test]
    fn trailing_commas_should_fail() {
        let parser = Parser::default();
        for input in ["[1, 2,]", r#"{"a": 1,}"#] {
            let err = parser.parse_str(input).unwrap_err();
            assert_eq!(err.details, ParserErrorDetails::TrailingComma, "{input}");
        }
    }

    #[test]
    fn malformed_separators_should_fail() {
        let parser = Parser::default();
        for input in [
            "[1 2]",
            "[,1]",
            "[1,,2]",
            r#"{"a" 1}"#,
            r#"{"a": 1 "b": 2}"#,
            r#"{1: 2}"#,
            r#"{"a": 1"#,
            "[",
            "]",
            "{} {}",
        ] {
            assert!(parser.parse_str(input).is_err(), "{input} should fail");
        }
        assert_eq!(
            parser.parse_str(r#"{"a" 1}"#).unwrap_err().details,
            ParserErrorDetails::PairExpected
        );
        assert_eq!(
            parser.parse_str("[1").unwrap_err().details,
            ParserErrorDetails::EndOfInput
        );
    }

    #[test]
    fn empty_input_should_fail() {
        let parser = Parser::default();
        for input in ["", "   \n"] {
            assert_eq!(
                parser.parse_str(input).unwrap_err().details,
                ParserErrorDetails::ZeroLengthInput
            );
        }
        assert!(parser.parse_bytes(&[]).is_err());
    }

    #[test]
    fn nesting_beyond_the_limit_should_fail() {
        let nested = format!("{}{}", "[".repeat(5), "]".repeat(5));
        let parser = Parser::default().with_max_depth(Some(4));
        assert_eq!(
            parser.parse_str(&nested).unwrap_err().details,
            ParserErrorDetails::MaximumDepthExceeded(4)
        );
        let parser = Parser::default().with_max_depth(Some(5));
        assert!(parser.parse_str(&nested).is_ok());
        let deep = format!("{}{}", "[".repeat(1000), "]".repeat(1000));
        assert!(Parser::default().parse_str(&deep).is_err());
    }

    #[test]
    fn lifted_depth_limits_should_be_clamped() {
        let deep = format!("{}{}", "[".repeat(200_000), "]".repeat(200_000));
        for limit in [None, Some(usize::MAX), Some(MAX_NESTING_LIMIT + 1)] {
            let parser = Parser::default().with_max_depth(limit);
            assert_eq!(parser.max_depth(), MAX_NESTING_LIMIT);
            assert_eq!(
                parser.parse_str(&deep).unwrap_err().details,
                ParserErrorDetails::MaximumDepthExceeded(MAX_NESTING_LIMIT)
            );
        }
        let nested = format!(
            "{}{}",
            "[".repeat(MAX_NESTING_LIMIT),
            "]".repeat(MAX_NESTING_LIMIT)
        );
        assert!(Parser::default().with_max_depth(None).parse_str(&nested).is_ok());
    }

    #[test]
    fn wide_objects_should_decode_in_linear_time() {
        let members = 100_000;
        let mut source = String::from("{");
        for i in 0..members {
            if i > 0 {
                source.push(',');
            }
            source.push_str(&format!("\"key{}\": {}", i, i));
        }
        source.push_str(r#", "key7": "last"}"#);
        let start = Instant::now();
        let parsed = Parser::default().parse_str(&source).unwrap();
        let elapsed = start.elapsed();
        let pairs = parsed.as_object().unwrap();
        assert_eq!(pairs.len(), members);
        assert_eq!(pairs[7], ("key7".to_string(), JsonValue::String("last".to_string())));
        assert_eq!(pairs[members - 1].1, JsonValue::Integer(members as i64 - 1));
        println!("Parsed {} members in {:?}", members, elapsed);
        assert!(elapsed.as_secs() < 10, "took {:?}", elapsed);
    }

    #[test]
    fn should_parse_ascii_bytes() {
        let parser = Parser::with_encoding(Encoding::Ascii);
        let parsed = parser.parse_bytes(br#"{"units": "us"}"#).unwrap();
        assert_eq!(parser.encoding(), Encoding::Ascii);
        assert_eq!(parsed.pointer("/units").and_then(JsonValue::as_str), Some("us"));
    }

    #[test]
    fn should_parse_sample_forecast() {
        let path = relative_file!("fixtures/json/forecast.json");
        let parsed = Parser::default().parse_file(path).unwrap();
        let periods = parsed.pointer("/properties/periods").unwrap();
        assert_eq!(periods.as_array().map(|p| p.len()), Some(14));
    }

    #[test]
    fn should_successfully_bail() {
        let path = relative_file!("fixtures/json/invalid/missing_file.json");
        let parsed = Parser::default().parse_file(path);
        assert_eq!(parsed.unwrap_err().details, ParserErrorDetails::InvalidFile);
    }

    #[test]
    fn should_parse_basic_test_files() {
        for f in fs::read_dir(relative_file!("fixtures/json/valid")).unwrap() {
            let path = f.unwrap().path();
            if path.is_file() {
                let len = fs::metadata(&path).unwrap().len();
                let start = Instant::now();
                let parsed = Parser::default().parse_file(&path);
                if parsed.is_err() {
                    println!("Parse of {:?} failed with errors: {:?}", &path, &parsed)
                }
                assert!(parsed.is_ok());
                println!(
                    "Parsed {} in {:?} [{:?}]",
                    ByteSize(len),
                    start.elapsed(),
                    path,
                );
            }
        }
    }

    #[test]
    fn should_reject_invalid_test_files() {
        for f in fs::read_dir(relative_file!("fixtures/json/invalid")).unwrap() {
            let path = f.unwrap().path();
            if path.is_file() {
                let parsed = Parser::default().parse_file(&path);
                println!("Parse result for {:?} = {:?}", &path, parsed);
                assert!(parsed.is_err());
            }
        }
    }
}
