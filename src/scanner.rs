//! Lexical scanner.
//!
//! Converts source text into tokens on demand. The scanner is forward-only;
//! the parser keeps at most one token of lookahead. Literal tokens carry
//! text rather than values (strings arrive unescaped, bytes literals carry
//! their raw base64 body, numbers and timestamps their lexeme), because
//! converting literal text into values is the parser's job.

use crate::error::{Diagnostic, Result};
use crate::position::{locate, Location};

/// A lexical token and the character offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Colon,
    Comma,
    Null,
    True,
    False,
    /// Integer literal text.
    Integer(String),
    /// Decimal literal text.
    Decimal(String),
    /// RFC3339-shaped timestamp text.
    Timestamp(String),
    /// Unescaped string contents.
    Str(String),
    /// Raw base64 body of a bytes literal.
    Bytes(String),
}

impl TokenKind {
    /// Short description for "expected X, but got Y" diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LeftBrace => "'{'".to_string(),
            TokenKind::RightBrace => "'}'".to_string(),
            TokenKind::LeftBracket => "'['".to_string(),
            TokenKind::RightBracket => "']'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::True => "'true'".to_string(),
            TokenKind::False => "'false'".to_string(),
            TokenKind::Integer(text)
            | TokenKind::Decimal(text)
            | TokenKind::Timestamp(text) => format!("'{}'", text),
            TokenKind::Str(_) => "a string".to_string(),
            TokenKind::Bytes(_) => "a bytes literal".to_string(),
        }
    }
}

pub(crate) struct Scanner<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Character offset of the cursor; used for end-of-input diagnostics.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn location_of(&self, offset: usize) -> Location {
        locate(self.source, offset)
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn err(&self, message: String, offset: usize) -> Diagnostic {
        Diagnostic::scan(message, locate(self.source, offset))
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_trivia()?;
        let offset = self.pos;
        let Some(c) = self.peek_char() else {
            return Ok(None);
        };
        let kind = match c {
            '{' => {
                self.pos += 1;
                TokenKind::LeftBrace
            }
            '}' => {
                self.pos += 1;
                TokenKind::RightBrace
            }
            '[' => {
                self.pos += 1;
                TokenKind::LeftBracket
            }
            ']' => {
                self.pos += 1;
                TokenKind::RightBracket
            }
            ':' => {
                self.pos += 1;
                TokenKind::Colon
            }
            ',' => {
                self.pos += 1;
                TokenKind::Comma
            }
            '"' => self.scan_string()?,
            '\'' => self.scan_bytes()?,
            _ => self.scan_bare()?,
        };
        Ok(Some(Token { kind, offset }))
    }

    /// Skip whitespace and `//` comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek_char() {
                Some(c) if is_separator(c) => {
                    self.pos += 1;
                }
                Some('/') => {
                    let offset = self.pos;
                    if self.chars.get(self.pos + 1) == Some(&'/') {
                        self.pos += 2;
                        while let Some(c) = self.peek_char() {
                            if c == '\n' || c == '\r' {
                                break;
                            }
                            self.pos += 1;
                        }
                    } else {
                        return Err(
                            self.err("expected '//' to start a comment".to_string(), offset)
                        );
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_string(&mut self) -> Result<TokenKind> {
        let open = self.pos;
        self.pos += 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.err(
                    "unterminated string; expected a closing '\"'".to_string(),
                    open,
                ));
            };
            match c {
                '"' => return Ok(TokenKind::Str(out)),
                '\\' => self.scan_escape(&mut out)?,
                _ => out.push(c),
            }
        }
    }

    fn scan_escape(&mut self, out: &mut String) -> Result<()> {
        let backslash = self.pos - 1;
        let Some(c) = self.bump() else {
            return Err(self.err(
                "invalid escape sequence at end of input".to_string(),
                backslash,
            ));
        };
        match c {
            '0' => out.push('\u{0000}'),
            'a' => out.push('\u{0007}'),
            'b' => out.push('\u{0008}'),
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'v' => out.push('\u{000B}'),
            'f' => out.push('\u{000C}'),
            'r' => out.push('\r'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '?' => out.push('?'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            '\r' => {
                // Escaped line break: the break is elided from the string.
                if self.peek_char() == Some('\n') {
                    self.pos += 1;
                }
            }
            '\n' => {}
            'x' => out.push(self.scan_hex_escape(2, backslash)?),
            'u' => out.push(self.scan_hex_escape(4, backslash)?),
            'U' => out.push(self.scan_hex_escape(8, backslash)?),
            other => {
                return Err(self.err(
                    format!("invalid escape sequence '\\{}'", other.escape_debug()),
                    backslash,
                ))
            }
        }
        Ok(())
    }

    fn scan_hex_escape(&mut self, digits: u32, backslash: usize) -> Result<char> {
        let mut code: u32 = 0;
        for _ in 0..digits {
            let Some(c) = self.bump() else {
                return Err(self.err(
                    format!("invalid escape sequence: expected {} hex digits", digits),
                    backslash,
                ));
            };
            let Some(d) = c.to_digit(16) else {
                return Err(self.err(
                    format!(
                        "invalid escape sequence: '{}' is not a hex digit",
                        c.escape_debug()
                    ),
                    backslash,
                ));
            };
            code = code.wrapping_mul(16).wrapping_add(d);
        }
        char::from_u32(code).ok_or_else(|| {
            self.err(
                format!(
                    "invalid escape sequence: U+{:04X} is not a Unicode scalar value",
                    code
                ),
                backslash,
            )
        })
    }

    fn scan_bytes(&mut self) -> Result<TokenKind> {
        let open = self.pos;
        self.pos += 1;
        let mut body = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.err(
                    "unterminated bytes literal; expected a closing \"'\"".to_string(),
                    open,
                ));
            };
            if c == '\'' {
                return Ok(TokenKind::Bytes(body));
            }
            body.push(c);
        }
    }

    /// Scan an undelimited token: keyword, number, or timestamp.
    ///
    /// A `T` after a digits-and-dashes prefix switches into timestamp mode,
    /// where `:` no longer terminates the token. After three colons (time
    /// plus numeric offset) any delimiter ends the token, and `z`/`Z` ends
    /// it immediately. That is how a timestamp key can still be followed
    /// by a map colon.
    fn scan_bare(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        let mut timestamp = false;
        let mut colons = 0;
        while let Some(c) = self.peek_char() {
            if timestamp {
                if c == 'z' || c == 'Z' {
                    self.pos += 1;
                    break;
                }
                if is_separator(c) {
                    break;
                }
                if c == ':' {
                    if colons >= 3 {
                        break;
                    }
                    colons += 1;
                } else if is_delimiter(c) {
                    break;
                }
                self.pos += 1;
            } else {
                if is_delimiter(c) {
                    break;
                }
                if c == 'T'
                    && self.pos > start
                    && self.chars[start..self.pos]
                        .iter()
                        .all(|p| p.is_ascii_digit() || *p == '-')
                {
                    timestamp = true;
                }
                self.pos += 1;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if timestamp {
            if is_timestamp_shape(&text) {
                return Ok(TokenKind::Timestamp(text));
            }
            return Err(self.err(format!("the timestamp '{}' is malformed", text), start));
        }
        match text.as_str() {
            "null" => Ok(TokenKind::Null),
            "true" => Ok(TokenKind::True),
            "false" => Ok(TokenKind::False),
            _ if is_integer_literal(&text) => Ok(TokenKind::Integer(text)),
            _ if is_decimal_literal(&text) => Ok(TokenKind::Decimal(text)),
            _ => Err(self.err(
                format!("the value '{}' is not recognized", text.escape_debug()),
                start,
            )),
        }
    }
}

/// Insignificant separators: ASCII whitespace plus NO-BREAK SPACE.
fn is_separator(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\n' | '\u{000B}' | '\u{000C}' | '\r' | '\u{00A0}'
    )
}

/// Characters that end an undelimited token.
fn is_delimiter(c: char) -> bool {
    is_separator(c) || matches!(c, '{' | '}' | '[' | ']' | ':' | ',' | '/')
}

/// `-?(0|[1-9][0-9]*)`: no leading `+`, no leading zeros, no separators.
fn is_integer_literal(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    s.len() == 1 || !s.starts_with('0')
}

/// `-?(0|[1-9][0-9]*)(\.[0-9]*)?([eE][+-]?[0-9]+)?` with at least a `.` or
/// an exponent present; a plain digit run is an integer, never a decimal.
fn is_decimal_literal(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    let (mantissa, exponent) = match body.find(|c| c == 'e' || c == 'E') {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let (int_part, frac_part) = match mantissa.find('.') {
        Some(i) => (&mantissa[..i], Some(&mantissa[i + 1..])),
        None => (mantissa, None),
    };
    if frac_part.is_none() && exponent.is_none() {
        return false;
    }
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if int_part.len() > 1 && int_part.starts_with('0') {
        return false;
    }
    if let Some(frac) = frac_part {
        // Fraction digits are optional: "0." is a valid decimal.
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    if let Some(exp) = exponent {
        let exp = exp
            .strip_prefix('+')
            .or_else(|| exp.strip_prefix('-'))
            .unwrap_or(exp);
        if exp.is_empty() || !exp.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    true
}

/// RFC3339 shape: `YYYY-MM-DDTHH:MM:SS(.d+)?(z|Z|[+-]HH:MM)` with in-range
/// fields. Calendar validity (leap days and month lengths) is checked at
/// parse time, not here.
fn is_timestamp_shape(s: &str) -> bool {
    let b: Vec<char> = s.chars().collect();
    let num2 = |i: usize| -> Option<u32> {
        let hi = b.get(i)?.to_digit(10)?;
        let lo = b.get(i + 1)?.to_digit(10)?;
        Some(hi * 10 + lo)
    };
    let in_range = |i: usize, lo: u32, hi: u32| -> bool {
        num2(i).map(|n| (lo..=hi).contains(&n)).unwrap_or(false)
    };
    if b.len() < 20 {
        return false;
    }
    // Date: YYYY-MM-DD
    if !(b[0].is_ascii_digit() && b[1].is_ascii_digit() && b[2].is_ascii_digit())
        || !b[3].is_ascii_digit()
        || b[4] != '-'
        || !in_range(5, 1, 12)
        || b[7] != '-'
        || !in_range(8, 1, 31)
    {
        return false;
    }
    // Time: THH:MM:SS
    if b[10] != 'T'
        || !in_range(11, 0, 23)
        || b[13] != ':'
        || !in_range(14, 0, 59)
        || b[16] != ':'
        || !in_range(17, 0, 59)
    {
        return false;
    }
    let mut i = 19;
    if b.get(i) == Some(&'.') {
        i += 1;
        let fraction_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == fraction_start {
            return false;
        }
    }
    match b.get(i) {
        Some('z') | Some('Z') => i + 1 == b.len(),
        Some('+') | Some('-') => {
            i + 6 == b.len()
                && in_range(i + 1, 0, 23)
                && b[i + 3] == ':'
                && in_range(i + 4, 0, 59)
        }
        _ => false,
    }
}
