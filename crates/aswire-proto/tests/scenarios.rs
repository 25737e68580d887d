//! End-to-end decode scenarios for table-bearing and tree-bearing messages.

use aswire_core::{decode, decode_str, encode, encode_string, Error, Problem};
use aswire_proto::{
    AnalysisNavigationParams, AnalysisOutlineParams, ContentOverlay, FlutterWidgetPropertyValue,
    Notification,
};
use serde_json::json;

#[test]
fn test_add_overlay_reencodes_type_then_content() {
    let text = r#"{"type":"add","content":"hello"}"#;
    let overlay: ContentOverlay = decode_str(text).unwrap();
    let ContentOverlay::Add(add) = &overlay else {
        panic!("expected an add overlay, got {overlay:?}");
    };
    assert_eq!(add.content, "hello");
    assert_eq!(encode_string(&overlay), text);
}

#[test]
fn test_navigation_region_binds_file_zero_target() {
    let json = json!({
        "file": "/main.dart",
        "regions": [{"offset": 0, "length": 4, "targets": [0]}],
        "targets": [{
            "kind": "CLASS",
            "fileIndex": 0,
            "offset": 10,
            "length": 4,
            "startLine": 2,
            "startColumn": 7
        }],
        "files": ["/lib/a.dart"]
    });
    let params: AnalysisNavigationParams = decode(&json).unwrap();
    let resolved = params.resolve().unwrap();

    assert_eq!(resolved.regions.len(), 1);
    let targets = &resolved.regions[0].targets;
    assert_eq!(targets.len(), 1);
    assert!(std::ptr::eq(targets[0].target, &params.targets[0]));
    assert_eq!(targets[0].file, "/lib/a.dart");
    assert_eq!((targets[0].target.offset, targets[0].target.length), (10, 4));
}

#[test]
fn test_outline_children_share_parent() {
    let node = |name: &str, offset: i64, length: i64| {
        json!({
            "element": {"kind": "FIELD", "name": name, "flags": 0},
            "offset": offset,
            "length": length,
            "codeOffset": offset,
            "codeLength": length
        })
    };
    let mut root = node("C", 0, 20);
    root["children"] = json!([node("a", 5, 3), node("b", 10, 2)]);
    let json = json!({"file": "/a.dart", "kind": "LIBRARY", "outline": root});

    let params: AnalysisOutlineParams = decode(&json).unwrap();
    let tree = &params.outline;
    let root_id = tree.root();
    let children = tree.node(root_id).children();
    assert_eq!(children.len(), 2);

    let first_parent = tree.node(children[0]).parent();
    let second_parent = tree.node(children[1]).parent();
    assert_eq!(first_parent, Some(root_id));
    assert_eq!(first_parent, second_parent);
    assert_eq!(tree.node(root_id).parent(), None);
    assert_ne!(first_parent, tree.node(root_id).parent());
}

#[test]
fn test_out_of_range_index_never_partially_resolves() {
    let json = json!({
        "file": "/main.dart",
        "regions": [
            {"offset": 0, "length": 4, "targets": [0]},
            {"offset": 6, "length": 4, "targets": [1]}
        ],
        "targets": [{
            "kind": "CLASS", "fileIndex": 0, "offset": 10, "length": 4,
            "startLine": 2, "startColumn": 7
        }],
        "files": ["/lib/a.dart"]
    });
    match decode::<AnalysisNavigationParams>(&json) {
        Err(Error::MalformedMessage { path, problem, .. }) => {
            assert_eq!(path, "$.regions[1].targets[0]");
            assert!(matches!(problem, Problem::IndexOutOfRange { index: 1, len: 1, .. }));
        }
        other => panic!("expected MalformedMessage, got {other:?}"),
    }
}

#[test]
fn test_ambiguous_widget_value_inside_notification() {
    let notification = Notification {
        event: "flutter.widgetValue".into(),
        params: Some(json!({"stringValue": "a", "expression": "'a'"})),
    };
    let err = notification
        .params_as::<FlutterWidgetPropertyValue>()
        .unwrap_err();
    match err {
        Error::AmbiguousUnion {
            path, alternatives, ..
        } => {
            assert_eq!(path, "$.params");
            assert_eq!(alternatives, vec!["stringValue", "expression"]);
        }
        other => panic!("expected AmbiguousUnion, got {other:?}"),
    }
}

#[test]
fn test_unknown_enum_members_survive() {
    let json = json!({
        "file": "/main.dart",
        "regions": [],
        "targets": [{
            "kind": "EXTENSION_TYPE_FROM_THE_FUTURE", "fileIndex": 0, "offset": 1, "length": 1,
            "startLine": 1, "startColumn": 2
        }],
        "files": ["/a.dart"]
    });
    let params: AnalysisNavigationParams = decode(&json).unwrap();
    assert!(!params.targets[0].kind.is_known());
    assert_eq!(encode(&params), json);
}
