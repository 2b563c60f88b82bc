//! Recursive-descent parser.
//!
//! Drives the scanner through the grammar and builds the single root
//! [`Value`], enforcing the structural rules: exactly one top-level value,
//! scalar-only map keys, no duplicate keys, trailing commas tolerated, and
//! a nesting-depth cap so adversarially deep input fails with a diagnostic
//! instead of exhausting the stack.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::DateTime;
use num_bigint::BigInt;

use crate::decimal::Decimal;
use crate::error::{Diagnostic, Result};
use crate::position::Location;
use crate::scanner::{Scanner, Token, TokenKind};
use crate::value::Value;
use crate::MAX_NESTING_DEPTH;

pub(crate) struct Parser<'a> {
    scanner: Scanner<'a>,
    peeked: Option<Option<Token>>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            scanner: Scanner::new(source),
            peeked: None,
        }
    }

    /// Parse one document: exactly one value followed by end of input.
    pub fn parse_document(&mut self) -> Result<Value> {
        let value = self.parse_value(0)?;
        if let Some(extra) = self.next()? {
            return Err(self.syntax_at(
                extra.offset,
                format!(
                    "multiple top-level values aren't allowed; expected the end of the document, but got {}",
                    extra.kind.describe()
                ),
            ));
        }
        Ok(value)
    }

    fn next(&mut self) -> Result<Option<Token>> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.scanner.next_token(),
        }
    }

    /// One token of lookahead, cloned so the scanner stays forward-only.
    fn peek(&mut self) -> Result<Option<Token>> {
        if self.peeked.is_none() {
            self.peeked = Some(self.scanner.next_token()?);
        }
        Ok(self.peeked.clone().flatten())
    }

    fn location_at(&self, offset: usize) -> Location {
        self.scanner.location_of(offset)
    }

    fn syntax_at(&self, offset: usize, message: String) -> Diagnostic {
        Diagnostic::syntax(message, self.location_at(offset))
    }

    fn semantic_at(&self, offset: usize, message: String) -> Diagnostic {
        Diagnostic::semantic(message, self.location_at(offset))
    }

    /// A syntax error positioned at the end of the input.
    fn eof_syntax(&self, expected: &str) -> Diagnostic {
        Diagnostic::syntax(
            format!("expected {}, but reached the end of the document", expected),
            self.location_at(self.scanner.offset()),
        )
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        let Some(token) = self.next()? else {
            return Err(self.eof_syntax("a value"));
        };
        match token.kind {
            TokenKind::Null => Ok(Value::Null),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::Integer(text) => self.integer_value(&text, token.offset),
            TokenKind::Decimal(text) => self.decimal_value(&text, token.offset),
            TokenKind::Timestamp(text) => self.timestamp_value(&text, token.offset),
            TokenKind::Str(text) => Ok(Value::String(text)),
            TokenKind::Bytes(body) => self.bytes_value(&body, token.offset),
            TokenKind::LeftBracket => self.parse_list(token.offset, depth),
            TokenKind::LeftBrace => self.parse_map(token.offset, depth),
            other => Err(self.syntax_at(
                token.offset,
                format!("expected a value, but got {}", other.describe()),
            )),
        }
    }

    fn integer_value(&self, text: &str, offset: usize) -> Result<Value> {
        match text.parse::<BigInt>() {
            Ok(n) => Ok(Value::Integer(n)),
            Err(_) => Err(self.semantic_at(
                offset,
                format!("the value '{}' is not recognized", text),
            )),
        }
    }

    fn decimal_value(&self, text: &str, offset: usize) -> Result<Value> {
        match Decimal::from_literal(text) {
            Some(d) => Ok(Value::Decimal(d)),
            None => Err(self.semantic_at(
                offset,
                format!("the decimal '{}' can't be represented", text),
            )),
        }
    }

    fn timestamp_value(&self, text: &str, offset: usize) -> Result<Value> {
        // The scanner admits a lowercase 'z'; RFC3339 parsing wants 'Z'.
        let normalized = match text.strip_suffix('z') {
            Some(head) => format!("{}Z", head),
            None => text.to_string(),
        };
        match DateTime::parse_from_rfc3339(&normalized) {
            Ok(t) => Ok(Value::Timestamp(t)),
            Err(_) => Err(self.semantic_at(
                offset,
                format!("the timestamp '{}' is not a valid instant", text),
            )),
        }
    }

    fn bytes_value(&self, body: &str, offset: usize) -> Result<Value> {
        let trimmed = body.trim_matches(|c: char| c.is_ascii_whitespace());
        match BASE64.decode(trimmed) {
            Ok(bytes) => Ok(Value::Bytes(bytes)),
            Err(e) => Err(self.semantic_at(
                offset,
                format!("invalid base64 in bytes literal: {}", e),
            )),
        }
    }

    fn parse_list(&mut self, open_offset: usize, depth: usize) -> Result<Value> {
        self.check_depth(open_offset, depth)?;
        let mut elements = Vec::new();
        loop {
            let closes = match self.peek()? {
                None => return Err(self.eof_syntax("a value or ']'")),
                Some(token) => token.kind == TokenKind::RightBracket,
            };
            if closes {
                self.next()?;
                break;
            }
            elements.push(self.parse_value(depth + 1)?);
            let Some(separator) = self.next()? else {
                return Err(self.eof_syntax("',' or ']'"));
            };
            match separator.kind {
                TokenKind::Comma => continue,
                TokenKind::RightBracket => break,
                other => {
                    return Err(self.syntax_at(
                        separator.offset,
                        format!("expected ',' or ']', but got {}", other.describe()),
                    ))
                }
            }
        }
        Ok(Value::List(elements))
    }

    fn parse_map(&mut self, open_offset: usize, depth: usize) -> Result<Value> {
        self.check_depth(open_offset, depth)?;
        let mut entries: Vec<(Value, Value)> = Vec::new();
        loop {
            let Some(ahead) = self.peek()? else {
                return Err(self.eof_syntax("a map key or '}'"));
            };
            match ahead.kind {
                TokenKind::RightBrace => {
                    self.next()?;
                    break;
                }
                TokenKind::Null => {
                    return Err(self.semantic_at(
                        ahead.offset,
                        "null can't be used as a map key".to_string(),
                    ))
                }
                TokenKind::LeftBracket => {
                    return Err(self.semantic_at(
                        ahead.offset,
                        "a list can't be used as a map key".to_string(),
                    ))
                }
                TokenKind::LeftBrace => {
                    return Err(self.semantic_at(
                        ahead.offset,
                        "a map can't be used as a map key".to_string(),
                    ))
                }
                _ => {}
            }
            let key_offset = ahead.offset;
            let key = self.parse_value(depth + 1)?;
            if entries.iter().any(|(existing, _)| *existing == key) {
                return Err(
                    self.semantic_at(key_offset, format!("duplicate map key {:?}", key))
                );
            }
            let Some(separator) = self.next()? else {
                return Err(self.eof_syntax("':' after a map key"));
            };
            if separator.kind != TokenKind::Colon {
                return Err(self.syntax_at(
                    separator.offset,
                    format!(
                        "expected ':' after a map key, but got {}",
                        separator.kind.describe()
                    ),
                ));
            }
            let value = self.parse_value(depth + 1)?;
            entries.push((key, value));
            let Some(separator) = self.next()? else {
                return Err(self.eof_syntax("',' or '}'"));
            };
            match separator.kind {
                TokenKind::Comma => continue,
                TokenKind::RightBrace => break,
                other => {
                    return Err(self.syntax_at(
                        separator.offset,
                        format!("expected ',' or '}}', but got {}", other.describe()),
                    ))
                }
            }
        }
        Ok(Value::Map(entries))
    }

    fn check_depth(&self, open_offset: usize, depth: usize) -> Result<()> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(self.syntax_at(
                open_offset,
                format!("nesting depth exceeds {}", MAX_NESTING_DEPTH),
            ));
        }
        Ok(())
    }
}
