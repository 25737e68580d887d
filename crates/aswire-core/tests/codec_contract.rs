//! The codec contract as seen from a downstream crate: schemas declared with
//! the exported macros, decode errors, and tree containment.

use aswire_core::{
    decode, decode_with, encode, encode_string, open_enum, protocol_object, DecodeConfig, Error,
    ObjectReader, ObjectWriter, Problem, RangePolicy, Result, TextRange, Tree, TreePayload,
};
use proptest::prelude::*;
use serde_json::json;

open_enum! {
    pub struct Severity {
        INFO = "INFO",
        ERROR = "ERROR",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct Diagnostic {
        required severity: Severity = "severity",
        required offset: i64 = "offset",
        optional tags: Vec<String> = "tags",
        optional fix: Fix = "fix",
    }
}

protocol_object! {
    #[derive(Eq, Hash)]
    pub struct Fix {
        required replacement: String = "replacement",
    }
}

#[test]
fn test_required_null_is_missing() {
    let err = decode::<Diagnostic>(&json!({"severity": "INFO", "offset": null})).unwrap_err();
    match err {
        Error::MalformedMessage {
            type_name,
            path,
            problem,
        } => {
            assert_eq!(type_name, "Diagnostic");
            assert_eq!(path, "$");
            assert_eq!(problem, Problem::MissingField("offset"));
        }
        other => panic!("expected MalformedMessage, got {other:?}"),
    }
}

#[test]
fn test_nested_error_names_nested_type() {
    let json = json!({"severity": "INFO", "offset": 1, "fix": {}});
    let err = decode::<Diagnostic>(&json).unwrap_err();
    assert_eq!(err.type_name(), Some("Fix"));
    assert_eq!(err.path(), Some("$.fix"));
}

#[test]
fn test_float_is_not_an_integer() {
    let err = decode::<Diagnostic>(&json!({"severity": "INFO", "offset": 1.5})).unwrap_err();
    assert_eq!(err.path(), Some("$.offset"));
    assert!(matches!(err.problem(), Some(Problem::WrongType { .. })));
}

#[test]
fn test_array_element_path() {
    let err = decode::<Diagnostic>(&json!({"severity": "INFO", "offset": 1, "tags": ["a", 2]}))
        .unwrap_err();
    assert_eq!(err.path(), Some("$.tags[1]"));
}

#[test]
fn test_absent_optionals_are_omitted() {
    let d = Diagnostic {
        severity: Severity::new("HINT_FROM_NEWER_SERVER"),
        offset: 3,
        tags: None,
        fix: None,
    };
    assert_eq!(
        encode_string(&d),
        r#"{"severity":"HINT_FROM_NEWER_SERVER","offset":3}"#
    );
    assert!(!d.severity.is_known());
    assert_eq!(decode::<Diagnostic>(&encode(&d)).unwrap(), d);
}

#[test]
fn test_serde_bridge() {
    #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
    struct Envelope {
        diagnostic: Diagnostic,
    }

    let text = r#"{"diagnostic":{"severity":"ERROR","offset":0,"tags":[]}}"#;
    let envelope: Envelope = serde_json::from_str(text).unwrap();
    assert_eq!(envelope.diagnostic.severity, Severity::ERROR);
    assert_eq!(serde_json::to_string(&envelope).unwrap(), text);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Block {
    offset: i64,
    length: i64,
}

impl TreePayload for Block {
    const TYPE_NAME: &'static str = "Block";

    fn decode(reader: &ObjectReader<'_, '_>) -> Result<Self> {
        Ok(Self {
            offset: reader.required("offset")?,
            length: reader.required("length")?,
        })
    }

    fn encode(&self, writer: &mut ObjectWriter) {
        writer.put("offset", &self.offset);
        writer.put("length", &self.length);
    }

    fn range(&self) -> TextRange {
        TextRange::new(self.offset, self.length)
    }
}

fn nested_ok(parent: (i64, i64), children: &[(i64, i64)]) -> bool {
    let outer = TextRange::new(parent.0, parent.1);
    let mut previous: Option<TextRange> = None;
    for &(offset, length) in children {
        let range = TextRange::new(offset, length);
        if length < 0 || !outer.contains(&range) {
            return false;
        }
        if previous.is_some_and(|prev| offset < prev.offset || offset < prev.end()) {
            return false;
        }
        previous = Some(range);
    }
    true
}

proptest! {
    #[test]
    fn prop_tree_containment(
        parent_len in 0i64..40,
        children in prop::collection::vec((0i64..50, -4i64..10), 0..6),
    ) {
        let json = json!({
            "offset": 0,
            "length": parent_len,
            "children": children
                .iter()
                .map(|&(offset, length)| json!({"offset": offset, "length": length}))
                .collect::<Vec<_>>()
        });
        let expected_ok = nested_ok((0, parent_len), &children);

        let strict = decode::<Tree<Block>>(&json);
        prop_assert_eq!(strict.is_ok(), expected_ok);

        let lenient = DecodeConfig::new().with_tree_ranges(RangePolicy::Flag);
        let tree = decode_with::<Tree<Block>>(&json, &lenient).unwrap();
        prop_assert_eq!(tree.violations().is_empty(), expected_ok);
        prop_assert_eq!(encode(&tree), json);
    }
}

#[test]
fn test_inverted_child_is_reported() {
    let json = json!({
        "offset": 0,
        "length": 10,
        "children": [{"offset": 5, "length": -3}, {"offset": 3, "length": 2}]
    });
    let err = decode::<Tree<Block>>(&json).unwrap_err();
    assert_eq!(err.path(), Some("$.children[0]"));

    let lenient = DecodeConfig::new().with_tree_ranges(RangePolicy::Flag);
    let tree = decode_with::<Tree<Block>>(&json, &lenient).unwrap();
    let problems: Vec<&Problem> = tree.violations().iter().map(|v| &v.problem).collect();
    assert_eq!(
        problems,
        vec![&Problem::NegativeLength {
            offset: 5,
            length: -3
        }]
    );
}
