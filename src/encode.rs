//! Canonical encoder.
//!
//! Walks a [`Value`] tree and emits the unique text form: map entries in
//! canonical key order, one element per line with a trailing comma,
//! two-space indentation, deterministic escapes. The same logical value
//! always produces the same bytes, regardless of how it was constructed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::SecondsFormat;

use crate::error::{Diagnostic, Result};
use crate::value::{sorted_entries, Value};
use crate::MAX_NESTING_DEPTH;

/// Encode a value as canonical Zeno text.
///
/// Fails when the tree violates the value model: a forbidden map-key
/// variant, duplicate keys in a hand-built map, or nesting beyond
/// [`MAX_NESTING_DEPTH`](crate::MAX_NESTING_DEPTH).
///
/// # Example
///
/// ```
/// use libzeno::{decode, encode};
///
/// let value = decode("{\"b\": 1, \"a\": 2}").unwrap();
/// assert_eq!(encode(&value).unwrap(), "{\n  \"a\": 2,\n  \"b\": 1,\n}");
/// ```
pub fn encode(value: &Value) -> Result<String> {
    let mut out = String::new();
    encode_value(value, 0, &mut out)?;
    Ok(out)
}

fn encode_value(value: &Value, indent: usize, out: &mut String) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Integer(n) => out.push_str(&n.to_string()),
        Value::Decimal(d) => out.push_str(&d.to_string()),
        Value::String(s) => encode_string(s, out),
        Value::Bytes(b) => {
            out.push('\'');
            out.push_str(&BASE64.encode(b));
            out.push('\'');
        }
        Value::Timestamp(t) => {
            // Zero offsets render as 'Z'; sub-seconds appear only when
            // non-zero, in groups of three digits.
            out.push_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        }
        Value::List(elements) => {
            check_depth(indent)?;
            if elements.is_empty() {
                out.push_str("[]");
            } else {
                out.push_str("[\n");
                for element in elements {
                    out.push_str(&"  ".repeat(indent + 1));
                    encode_value(element, indent + 1, out)?;
                    out.push_str(",\n");
                }
                out.push_str(&"  ".repeat(indent));
                out.push(']');
            }
        }
        Value::Map(entries) => {
            check_depth(indent)?;
            if entries.is_empty() {
                out.push_str("{}");
            } else {
                let sorted = sorted_entries(entries);
                for pair in sorted.windows(2) {
                    if pair[0].0 == pair[1].0 {
                        return Err(Diagnostic::encode(format!(
                            "duplicate map key {:?}",
                            pair[0].0
                        )));
                    }
                }
                out.push_str("{\n");
                for (key, entry_value) in &sorted {
                    if !key.is_valid_key() {
                        return Err(Diagnostic::encode(format!(
                            "a {} can't be used as a map key",
                            key.type_name()
                        )));
                    }
                    out.push_str(&"  ".repeat(indent + 1));
                    encode_value(key, indent + 1, out)?;
                    out.push_str(": ");
                    encode_value(entry_value, indent + 1, out)?;
                    out.push_str(",\n");
                }
                out.push_str(&"  ".repeat(indent));
                out.push('}');
            }
        }
    }
    Ok(())
}

/// Containers deeper than the parser would accept are refused, so
/// canonical output always re-parses.
fn check_depth(indent: usize) -> Result<()> {
    if indent >= MAX_NESTING_DEPTH {
        return Err(Diagnostic::encode(format!(
            "nesting depth exceeds {}",
            MAX_NESTING_DEPTH
        )));
    }
    Ok(())
}

/// Double-quote a string, escaping exactly what the scanner un-escapes:
/// `"` and `\`, the named control escapes, and `\uHHHH` for any other
/// control character. Everything else passes through verbatim.
fn encode_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0000}' => out.push_str("\\0"),
            '\u{0007}' => out.push_str("\\a"),
            '\u{0008}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{000B}' => out.push_str("\\v"),
            '\u{000C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Decimal;
    use crate::ErrorKind;
    use chrono::DateTime;
    use num_bigint::BigInt;

    fn enc(value: &Value) -> String {
        encode(value).unwrap()
    }

    fn int(n: i64) -> Value {
        Value::from(n)
    }

    fn dec(text: &str) -> Value {
        Value::Decimal(Decimal::from_literal(text).unwrap())
    }

    fn ts(text: &str) -> Value {
        Value::Timestamp(DateTime::parse_from_rfc3339(text).unwrap())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(enc(&Value::Null), "null");
        assert_eq!(enc(&Value::Bool(true)), "true");
        assert_eq!(enc(&Value::Bool(false)), "false");
        assert_eq!(enc(&int(0)), "0");
        assert_eq!(enc(&int(-123)), "-123");
        assert_eq!(enc(&dec("7.990")), "7.99");
        assert_eq!(enc(&dec("0e-8")), "0E0");
    }

    #[test]
    fn test_huge_integer() {
        let n: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(enc(&Value::Integer(n)), "123456789012345678901234567890");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(enc(&Value::from("a\"b\\c")), "\"a\\\"b\\\\c\"");
        assert_eq!(enc(&Value::from("line\nbreak\t")), "\"line\\nbreak\\t\"");
        assert_eq!(enc(&Value::from("\u{0}\u{7}\u{8}\u{b}\u{c}\r")), "\"\\0\\a\\b\\v\\f\\r\"");
        assert_eq!(enc(&Value::from("\u{1b}")), "\"\\u001B\"");
        assert_eq!(enc(&Value::from("café")), "\"café\"");
    }

    #[test]
    fn test_bytes() {
        assert_eq!(enc(&Value::Bytes(b"kshhgrl".to_vec())), "'a3NoaGdybA=='");
        assert_eq!(enc(&Value::Bytes(vec![])), "''");
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(
            enc(&ts("2017-07-16T14:05:00+00:00")),
            "2017-07-16T14:05:00Z"
        );
        assert_eq!(
            enc(&ts("2007-02-23T12:14:33.079-08:00")),
            "2007-02-23T12:14:33.079-08:00"
        );
        assert_eq!(
            enc(&ts("2007-02-23T20:14:33.079000Z")),
            "2007-02-23T20:14:33.079Z"
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(enc(&Value::List(vec![])), "[]");
        assert_eq!(enc(&Value::Map(vec![])), "{}");
    }

    #[test]
    fn test_list_layout() {
        let value = Value::List(vec![int(1), Value::List(vec![int(2)]), int(3)]);
        assert_eq!(enc(&value), "[\n  1,\n  [\n    2,\n  ],\n  3,\n]");
    }

    #[test]
    fn test_map_sorted_by_key() {
        let value = Value::Map(vec![
            (Value::from("b"), int(1)),
            (Value::from("a"), int(2)),
        ]);
        assert_eq!(enc(&value), "{\n  \"a\": 2,\n  \"b\": 1,\n}");
    }

    #[test]
    fn test_map_sorted_across_variants() {
        let value = Value::Map(vec![
            (Value::from("s"), Value::Null),
            (int(2), Value::Null),
            (Value::Bool(true), Value::Null),
            (dec("1.5"), Value::Null),
        ]);
        assert_eq!(
            enc(&value),
            "{\n  true: null,\n  2: null,\n  1.5: null,\n  \"s\": null,\n}"
        );
    }

    #[test]
    fn test_forbidden_key_is_an_encode_error() {
        let value = Value::Map(vec![(Value::Null, int(1))]);
        let e = encode(&value).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Encode);
        assert_eq!(e.line(), None);
        assert!(e.message().contains("null"));
    }

    #[test]
    fn test_duplicate_key_is_an_encode_error() {
        let value = Value::Map(vec![
            (dec("1.0"), int(1)),
            (dec("1.00"), int(2)),
        ]);
        let e = encode(&value).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Encode);
        assert!(e.message().contains("duplicate map key"));
    }

    #[test]
    fn test_depth_guard() {
        let mut value = Value::List(vec![]);
        for _ in 0..(crate::MAX_NESTING_DEPTH + 8) {
            value = Value::List(vec![value]);
        }
        let e = encode(&value).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Encode);
        assert!(e.message().contains("nesting depth"));
    }
}
