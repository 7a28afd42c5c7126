// tests/conversion.rs

//! End-to-end conversion tests over the public crate surface, exercising
//! the paths package loading actually takes: selectable conversion of an
//! attribute, then label extraction over the result.

use mason_attrs::{
    AttrType, AttrValue, Label, RawValue, Selectable, Selector, DEFAULT_CONDITION_KEY,
};

fn rule() -> Label {
    Label::parse_absolute("//app/server:server").unwrap()
}

/// A deps-shaped attribute: list of labels, converted and then walked for
/// dependency edges
#[test]
fn test_deps_attribute_end_to_end() {
    let ty = AttrType::label_list();
    let raw = RawValue::list(vec![
        RawValue::from(":handler"),
        RawValue::from("//base/log:log"),
        RawValue::from(":handler"), // duplicate collapses in extraction
    ]);

    let result = ty
        .selectable_convert(&raw, "attribute 'deps' of rule //app/server:server", Some(&rule()))
        .unwrap();
    let Selectable::Value(value) = result else {
        panic!("plain list input must not produce a selector");
    };

    let edges: Vec<String> = ty
        .extract_labels(&value)
        .iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(edges, vec!["//app/server:handler", "//base/log:log"]);
}

/// A configurable deps attribute: each arm typed against the declared
/// type, arms reachable for per-arm edge extraction
#[test]
fn test_configurable_deps_attribute() {
    let ty = AttrType::label_list();
    let raw = RawValue::Select(vec![
        (
            RawValue::from("//conditions:opt"),
            RawValue::list(vec![RawValue::from(":fast")]),
        ),
        (
            RawValue::from(DEFAULT_CONDITION_KEY),
            RawValue::list(vec![RawValue::from(":portable")]),
        ),
    ]);

    let result = ty
        .selectable_convert(&raw, "attribute 'deps' of rule //app/server:server", Some(&rule()))
        .unwrap();
    let Selectable::Selector(selector) = result else {
        panic!("select() input must produce a selector");
    };

    assert_eq!(*selector.original_type(), ty);
    assert_eq!(selector.entries().len(), 2);

    // Per-arm extraction is how the graph builder consumes a selector
    let mut edges = Vec::new();
    for (condition, value) in selector.entries() {
        if !Selector::is_reserved(condition) {
            edges.push(condition.to_string());
        }
        for label in ty.extract_labels(value) {
            edges.push(label.to_string());
        }
    }
    assert_eq!(
        edges,
        vec![
            "//conditions:opt",
            "//app/server:fast",
            "//app/server:portable"
        ]
    );

    let fallback: Vec<_> = ty
        .extract_labels(selector.default_value())
        .iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(fallback, vec!["//app/server:portable"]);
}

/// Conversion failures carry the caller's description so package loading
/// can attribute them to a source location
#[test]
fn test_failure_attribution() {
    let err = AttrType::Int
        .convert(
            &RawValue::from("fast"),
            "attribute 'jobs' of rule //app/server:server",
            None,
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected value of type 'int' for attribute 'jobs' of rule //app/server:server, \
         but got 'fast' (string)"
    );
}

/// An ordered dictionary of label lists keeps entry order and feeds
/// per-entry edges through extraction
#[test]
fn test_label_list_dict_attribute() {
    let ty = AttrType::label_list_dict();
    let raw = RawValue::Dict(vec![
        (
            RawValue::from("linux"),
            RawValue::list(vec![RawValue::from(":epoll")]),
        ),
        (
            RawValue::from("mac"),
            RawValue::list(vec![RawValue::from(":kqueue")]),
        ),
    ]);

    let value = ty
        .convert(&raw, "attribute 'platform_deps' of rule //app/server:server", Some(&rule()))
        .unwrap();

    let keys: Vec<String> = value
        .as_list()
        .unwrap()
        .elements
        .iter()
        .map(|entry| entry.as_pair().unwrap().0.to_string())
        .collect();
    assert_eq!(keys, vec!["linux", "mac"]);

    let edges: Vec<String> = ty
        .extract_labels(&value)
        .iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(edges, vec!["//app/server:epoll", "//app/server:kqueue"]);
}

/// Tag filtering: booleans and string lists are taggable, everything else
/// is reported as not taggable rather than silently empty
#[test]
fn test_tag_filtering_surface() {
    let flaky = AttrValue::Bool(true);
    let tags = AttrType::Bool.to_tag_set(Some(&flaky), "flaky").unwrap();
    assert!(tags.contains("flaky"));

    let raw = RawValue::list(vec![RawValue::from("integration"), RawValue::from("slow")]);
    let ty = AttrType::string_list();
    let value = ty
        .convert(&raw, "attribute 'tags' of rule //app/server:server", None)
        .unwrap();
    let tags = ty.to_tag_set(Some(&value), "tags").unwrap();
    assert!(tags.contains("integration") && tags.contains("slow"));

    let count = AttrValue::Int(4);
    assert!(AttrType::Int.to_tag_set(Some(&count), "shards").is_err());
}

/// Types that never contribute edges can be skipped wholesale
#[test]
fn test_edge_accounting_shortcut() {
    let labelish = [
        AttrType::Label,
        AttrType::label_list(),
        AttrType::label_list_dict(),
    ];
    for ty in &labelish {
        assert!(ty.is_label_type(), "{} should take part in edge accounting", ty);
    }

    let plain = [AttrType::String, AttrType::string_dict(), AttrType::Bool];
    for ty in &plain {
        assert!(!ty.is_label_type(), "{} should be skippable", ty);
    }
}
