//! Fixture corpus harness.
//!
//! Every `tests/corpus/valid/*.zeno` document must decode, re-encode to
//! the exact text in its `.canonical` sibling, and survive a second
//! decode/encode round unchanged. Every `tests/corpus/invalid/*.zeno`
//! document must fail to decode with the exact diagnostic recorded in its
//! `.error` sibling.

use std::fs;
use std::path::PathBuf;

use glob::glob;
use libzeno::{decode, encode};

fn corpus_glob(subdir: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("corpus")
        .join(subdir)
        .join("*.zeno")
        .to_string_lossy()
        .into_owned()
}

#[test]
fn test_valid_corpus() {
    let mut checked = 0;
    for entry in glob(&corpus_glob("valid")).expect("bad glob pattern") {
        let path = entry.expect("unreadable corpus entry");
        let source = fs::read_to_string(&path).unwrap();
        let expected = fs::read_to_string(path.with_extension("canonical")).unwrap();
        let expected = expected.trim_end_matches('\n');

        let value = decode(&source)
            .unwrap_or_else(|e| panic!("{}: unexpected decode failure: {}", path.display(), e));
        let canonical = encode(&value).unwrap();
        assert_eq!(
            canonical,
            expected,
            "canonical mismatch for {}",
            path.display()
        );

        // The canonical text is itself a document that reproduces both the
        // value and the text.
        let reparsed = decode(&canonical).unwrap_or_else(|e| {
            panic!("{}: canonical output failed to parse: {}", path.display(), e)
        });
        assert_eq!(
            reparsed,
            value,
            "round-trip mismatch for {}",
            path.display()
        );
        assert_eq!(
            encode(&reparsed).unwrap(),
            canonical,
            "idempotence failure for {}",
            path.display()
        );

        checked += 1;
    }
    assert!(checked > 0, "no valid corpus files found");
}

#[test]
fn test_invalid_corpus() {
    let mut checked = 0;
    for entry in glob(&corpus_glob("invalid")).expect("bad glob pattern") {
        let path = entry.expect("unreadable corpus entry");
        let source = fs::read_to_string(&path).unwrap();
        let expected = fs::read_to_string(path.with_extension("error")).unwrap();
        let expected = expected.trim_end();

        match decode(&source) {
            Ok(value) => panic!(
                "{}: expected a decode failure, but got {:?}",
                path.display(),
                value
            ),
            Err(e) => assert_eq!(
                e.to_string(),
                expected,
                "diagnostic mismatch for {}",
                path.display()
            ),
        }

        checked += 1;
    }
    assert!(checked > 0, "no invalid corpus files found");
}
