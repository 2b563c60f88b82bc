//! Zeno codec implementation.
//!
//! Zeno is a textual data-interchange format that keeps JSON's shape while
//! extending its type set with arbitrary-precision integers, exact
//! decimals, raw byte strings, and timestamps. Input validation is strict
//! and output is canonical: the same logical value always encodes to the
//! same text.
//!
//! # Decoding pipeline
//!
//! 1. **Scanner**: converts source text into tokens on demand, stamping
//!    each with its source position and rejecting malformed lexical forms.
//!
//! 2. **Parser**: drives the scanner through a recursive descent of the
//!    grammar, builds the single root [`Value`], and enforces the
//!    structural rules: one top-level value, scalar-only map keys, no
//!    duplicate keys.
//!
//! Encoding walks a [`Value`] tree and emits the canonical form: map
//! entries in canonical key order, one element per line with a trailing
//! comma, two-space indentation.
//!
//! Both directions are pure functions over in-memory data; every failure
//! is a structured [`Diagnostic`].

mod decimal;
mod encode;
mod error;
mod parser;
mod position;
mod scanner;
mod value;

pub use decimal::Decimal;
pub use encode::encode;
pub use error::{Diagnostic, ErrorKind, Result};
pub use position::Location;
pub use value::Value;

/// Maximum list/map nesting accepted by the parser and the encoder.
///
/// Nesting is otherwise bounded only by the input, so the cap converts
/// adversarially deep documents into a reported failure instead of stack
/// exhaustion.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Decode a Zeno document into a [`Value`].
///
/// The input must be a complete document containing exactly one top-level
/// value; anything else fails with a positioned [`Diagnostic`].
///
/// # Example
///
/// ```
/// use libzeno::decode;
///
/// let value = decode("[1, 2,]").unwrap();
/// assert_eq!(value.as_list().map(Vec::len), Some(2));
/// ```
pub fn decode(input: &str) -> Result<Value> {
    parser::Parser::new(input).parse_document()
}
