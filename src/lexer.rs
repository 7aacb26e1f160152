//! The lexer consumes a stream of `char`s and produces a stream of [Token]s, each packed along
//! with the [Span] of input it was matched from.
//!
//! Matching is LA(1): the lexer peeks a single character, decides which token can start with
//! it and then consumes the remainder of that token. Whitespace between tokens is skipped.
use std::fmt::{Display, Formatter};

use crate::coords::{Coords, Span};
use crate::errors::{ParserError, ParserErrorDetails, ParserErrorSource, ParserResult};
use crate::lexer_error;

/// Enumeration of valid JSON tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Colon,
    Comma,
    Str(String),
    Float(f64),
    Integer(i64),
    Null,
    Boolean(bool),
    EndOfInput,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::StartObject => write!(f, "'{{'"),
            Token::EndObject => write!(f, "'}}'"),
            Token::StartArray => write!(f, "'['"),
            Token::EndArray => write!(f, "']'"),
            Token::Colon => write!(f, "':'"),
            Token::Comma => write!(f, "','"),
            Token::Str(s) => write!(f, "string {:?}", s),
            Token::Float(n) => write!(f, "number {}", n),
            Token::Integer(n) => write!(f, "number {}", n),
            Token::Null => write!(f, "null"),
            Token::Boolean(b) => write!(f, "{}", b),
            Token::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// A packed token consists of a [Token] and the [Span] associated with it
pub type PackedToken = (Token, Span);

/// Convenience macro for packing tokens along with their positional information
macro_rules! packed_token {
    ($t:expr, $s:expr, $e:expr) => {
        ($t, Span { start: $s, end: $e })
    };
    ($t:expr, $s:expr) => {
        ($t, Span { start: $s, end: $s })
    };
}

pub struct Lexer<'a> {
    /// The underlying source of characters
    chars: &'a mut dyn Iterator<Item = char>,
    /// A single character of lookahead, along with its [Coords]
    lookahead: Option<(char, Coords)>,
    /// The [Coords] of the next character to be pulled from `chars`
    position: Coords,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a mut dyn Iterator<Item = char>) -> Self {
        Lexer {
            chars,
            lookahead: None,
            position: Coords::default(),
        }
    }

    /// Consume the next token from the input stream. Once the input is exhausted, every
    /// subsequent call produces [Token::EndOfInput].
    pub fn consume(&mut self) -> ParserResult<PackedToken> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(packed_token!(Token::EndOfInput, self.position)),
            Some((c, coords)) => match c {
                '{' => self.match_single(Token::StartObject),
                '}' => self.match_single(Token::EndObject),
                '[' => self.match_single(Token::StartArray),
                ']' => self.match_single(Token::EndArray),
                ':' => self.match_single(Token::Colon),
                ',' => self.match_single(Token::Comma),
                '"' => self.match_string(),
                '-' | '0'..='9' => self.match_number(),
                't' => self.match_literal("true", Token::Boolean(true)),
                'f' => self.match_literal("false", Token::Boolean(false)),
                'n' => self.match_literal("null", Token::Null),
                c => lexer_error!(ParserErrorDetails::InvalidCharacter(c), coords),
            },
        }
    }

    fn peek(&mut self) -> Option<(char, Coords)> {
        if self.lookahead.is_none() {
            if let Some(c) = self.chars.next() {
                let coords = self.position;
                self.position = coords.advance(c);
                self.lookahead = Some((c, coords));
            }
        }
        self.lookahead
    }

    fn advance(&mut self) -> Option<(char, Coords)> {
        let next = self.peek();
        self.lookahead = None;
        next
    }

    fn skip_whitespace(&mut self) {
        while let Some((' ' | '\t' | '\n' | '\r', _)) = self.peek() {
            self.advance();
        }
    }

    /// Coordinates to report for a failure at the current point of the input
    fn current_coords(&mut self) -> Coords {
        match self.peek() {
            Some((_, coords)) => coords,
            None => self.position,
        }
    }

    fn match_single(&mut self, token: Token) -> ParserResult<PackedToken> {
        match self.advance() {
            Some((_, coords)) => Ok(packed_token!(token, coords)),
            None => lexer_error!(ParserErrorDetails::EndOfInput, self.position),
        }
    }

    /// Consume and match (exactly) a literal such as `true` or `null`
    fn match_literal(&mut self, literal: &str, token: Token) -> ParserResult<PackedToken> {
        let start = self.current_coords();
        let mut end = start;
        for expected in literal.chars() {
            match self.advance() {
                Some((c, coords)) if c == expected => end = coords,
                Some((_, coords)) => {
                    return lexer_error!(
                        ParserErrorDetails::MatchFailed(literal.to_string()),
                        coords
                    )
                }
                None => return lexer_error!(ParserErrorDetails::EndOfInput, self.position),
            }
        }
        Ok(packed_token!(token, start, end))
    }

    /// Attempts to match a string token, translating any escape sequences as it goes
    fn match_string(&mut self) -> ParserResult<PackedToken> {
        let start = match self.advance() {
            Some((_, coords)) => coords,
            None => return lexer_error!(ParserErrorDetails::EndOfInput, self.position),
        };
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(('"', end)) => return Ok(packed_token!(Token::Str(value), start, end)),
                Some(('\\', coords)) => self.match_escape_sequence(&mut value, coords)?,
                Some((c, coords)) if c < '\u{20}' => {
                    return lexer_error!(ParserErrorDetails::ControlCharacterInString(c), coords)
                }
                Some((c, _)) => value.push(c),
                None => return lexer_error!(ParserErrorDetails::UnterminatedString, self.position),
            }
        }
    }

    /// Match a valid string escape sequence, the backslash having already been consumed
    fn match_escape_sequence(&mut self, value: &mut String, start: Coords) -> ParserResult<()> {
        match self.advance() {
            Some(('"', _)) => value.push('"'),
            Some(('\\', _)) => value.push('\\'),
            Some(('/', _)) => value.push('/'),
            Some(('b', _)) => value.push('\u{8}'),
            Some(('f', _)) => value.push('\u{c}'),
            Some(('n', _)) => value.push('\n'),
            Some(('r', _)) => value.push('\r'),
            Some(('t', _)) => value.push('\t'),
            Some(('u', _)) => value.push(self.match_unicode_escape_sequence(start)?),
            Some((c, _)) => {
                return lexer_error!(
                    ParserErrorDetails::InvalidEscapeSequence(format!("\\{}", c)),
                    start
                )
            }
            None => return lexer_error!(ParserErrorDetails::UnterminatedString, self.position),
        }
        Ok(())
    }

    /// Match a unicode escape in the form uXXXX, where each X is a valid hex digit. Surrogate
    /// pairs must arrive as two consecutive escapes.
    fn match_unicode_escape_sequence(&mut self, start: Coords) -> ParserResult<char> {
        let high = self.match_hex_quad(start)?;
        let code = match high {
            0xD800..=0xDBFF => {
                match (self.advance(), self.advance()) {
                    (Some(('\\', _)), Some(('u', _))) => (),
                    _ => {
                        return lexer_error!(
                            ParserErrorDetails::InvalidUnicodeEscapeSequence(format!(
                                "\\u{:04x}",
                                high
                            )),
                            start
                        )
                    }
                }
                let low = self.match_hex_quad(start)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return lexer_error!(
                        ParserErrorDetails::InvalidUnicodeEscapeSequence(format!(
                            "\\u{:04x}\\u{:04x}",
                            high, low
                        )),
                        start
                    );
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            code => code,
        };
        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => lexer_error!(
                ParserErrorDetails::InvalidUnicodeEscapeSequence(format!("\\u{:04x}", code)),
                start
            ),
        }
    }

    fn match_hex_quad(&mut self, start: Coords) -> ParserResult<u32> {
        let mut code = 0;
        for _ in 0..4 {
            match self.advance() {
                Some((c, _)) if c.is_ascii_hexdigit() => {
                    code = code * 16 + c.to_digit(16).unwrap_or_default();
                }
                Some((c, _)) => {
                    return lexer_error!(
                        ParserErrorDetails::InvalidUnicodeEscapeSequence(format!(
                            "\\u..{}",
                            c
                        )),
                        start
                    )
                }
                None => return lexer_error!(ParserErrorDetails::UnterminatedString, self.position),
            }
        }
        Ok(code)
    }

    /// Consume a run of ascii digits into `buffer`, returning the [Coords] of the last digit
    /// or [None] if there wasn't one
    fn match_digits(&mut self, buffer: &mut String) -> Option<Coords> {
        let mut last = None;
        while let Some((c, coords)) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            buffer.push(c);
            last = Some(coords);
            self.advance();
        }
        last
    }

    /// As [Self::match_digits], but at least one digit must be present
    fn match_required_digits(&mut self, buffer: &mut String) -> ParserResult<Coords> {
        match self.match_digits(buffer) {
            Some(coords) => Ok(coords),
            None => {
                let coords = self.current_coords();
                if let Some((c, _)) = self.peek() {
                    buffer.push(c);
                }
                lexer_error!(
                    ParserErrorDetails::InvalidNumericRepresentation(buffer.clone()),
                    coords
                )
            }
        }
    }

    /// Attempt to match on a number representation. The grammar is validated here, before the
    /// actual conversion, given that the numeric parsers are more lenient than JSON
    fn match_number(&mut self) -> ParserResult<PackedToken> {
        let mut buffer = String::new();
        let start = self.current_coords();
        let mut is_float = false;

        if let Some(('-', _)) = self.peek() {
            buffer.push('-');
            self.advance();
        }

        let mut end = match self.peek() {
            Some(('0', coords)) => {
                buffer.push('0');
                self.advance();
                if let Some((c, next)) = self.peek() {
                    if c.is_ascii_digit() {
                        buffer.push(c);
                        return lexer_error!(
                            ParserErrorDetails::InvalidNumericRepresentation(buffer),
                            next
                        );
                    }
                }
                coords
            }
            _ => self.match_required_digits(&mut buffer)?,
        };

        if let Some(('.', _)) = self.peek() {
            is_float = true;
            buffer.push('.');
            self.advance();
            end = self.match_required_digits(&mut buffer)?;
        }

        if let Some((e @ ('e' | 'E'), _)) = self.peek() {
            is_float = true;
            buffer.push(e);
            self.advance();
            if let Some((sign @ ('+' | '-'), _)) = self.peek() {
                buffer.push(sign);
                self.advance();
            }
            end = self.match_required_digits(&mut buffer)?;
        }

        let token = parse_numeric(&buffer, is_float, start)?;
        Ok(packed_token!(token, start, end))
    }
}

/// Integral literals become [Token::Integer] when they fit in an `i64`, everything else is
/// parsed as a float
#[cfg(feature = "mixed_numerics")]
fn parse_numeric(repr: &str, is_float: bool, start: Coords) -> ParserResult<Token> {
    if !is_float {
        if let Ok(value) = lexical::parse::<i64, _>(repr) {
            return Ok(Token::Integer(value));
        }
    }
    match lexical::parse::<f64, _>(repr) {
        Ok(value) if value.is_finite() => Ok(Token::Float(value)),
        _ => lexer_error!(
            ParserErrorDetails::InvalidNumericRepresentation(repr.to_string()),
            start
        ),
    }
}

/// Without mixed numerics, every number is parsed as a float
#[cfg(not(feature = "mixed_numerics"))]
fn parse_numeric(repr: &str, _is_float: bool, start: Coords) -> ParserResult<Token> {
    match fast_float::parse::<f64, _>(repr) {
        Ok(value) if value.is_finite() => Ok(Token::Float(value)),
        _ => lexer_error!(
            ParserErrorDetails::InvalidNumericRepresentation(repr.to_string()),
            start
        ),
    }
}
