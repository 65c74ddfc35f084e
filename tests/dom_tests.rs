use dom_history::dom::builder::{AttributeOrder, NewElement, TreeBuilder, parse_tree};
use dom_history::dom::indexer::{build_snapshot, find_element_by_index};
use dom_history::dom::serializer::{clickable_elements_to_string, text_of, tree_to_json};
use dom_history::{DomError, DomNode, snapshot_from_json};
use serde_json::json;

use crate::common::fixtures::{element, first_tag, login_dump, scenario_tree, snapshot_of, text};

mod common;

// =========================================================================
// Tree construction from driver dumps
// =========================================================================

#[test]
fn dump_builds_tree_in_document_order() {
    let snapshot = snapshot_of(&login_dump());
    let tags: Vec<_> = snapshot
        .tree()
        .elements()
        .map(|el| el.tag_name.clone())
        .collect();

    assert_eq!(
        tags,
        vec!["html", "body", "nav", "a", "form", "input", "input", "button"],
        "Elements should come out in pre-order"
    );
}

#[test]
fn dump_preserves_attribute_order_as_received() {
    let dump = element(
        "html",
        json!({}),
        false,
        vec![element("input", json!({"type": "text", "name": "q", "class": "x"}), true, vec![])],
    );
    let snapshot = snapshot_of(&dump);
    let input = snapshot.tree().element(first_tag(snapshot.tree(), "input")).unwrap();

    let keys: Vec<_> = input.attributes.keys().cloned().collect();
    assert_eq!(keys, vec!["type", "name", "class"]);
}

#[test]
fn dump_defaults_missing_fields() {
    let tree = parse_tree(
        r#"{"type": "element", "tagName": "html", "children": [{"type": "text", "text": "x"}]}"#,
        AttributeOrder::AsReceived,
    )
    .unwrap();

    let root = tree.root_element();
    assert!(root.attributes.is_empty());
    assert_eq!(root.xpath, "");
    assert!(!root.is_visible && !root.is_interactive && !root.is_top_element && !root.is_shadow_root);
    assert_eq!(root.children().len(), 1);
}

#[test]
fn invalid_json_is_a_json_error() {
    let err = parse_tree(r#"{"type": "element", "tagName": "#, AttributeOrder::AsReceived).unwrap_err();
    assert!(matches!(err, DomError::Json { .. }), "Got {:?}", err);

    let err = parse_tree(r#"{"type": "comment"}"#, AttributeOrder::AsReceived).unwrap_err();
    assert!(matches!(err, DomError::Json { .. }), "Unknown node type, got {:?}", err);
}

#[test]
fn element_without_tag_is_malformed() {
    let err = parse_tree(r#"{"type": "element"}"#, AttributeOrder::AsReceived).unwrap_err();
    assert!(matches!(err, DomError::MalformedNode(_)), "Got {:?}", err);
    assert!(err.is_structural());

    let err = parse_tree(
        r#"{"type": "element", "tagName": "html", "children": [{"type": "text"}]}"#,
        AttributeOrder::AsReceived,
    )
    .unwrap_err();
    assert!(matches!(err, DomError::MalformedNode(_)), "Text without text, got {:?}", err);
}

#[test]
fn text_root_is_rejected() {
    let err = parse_tree(r#"{"type": "text", "text": "lonely"}"#, AttributeOrder::AsReceived)
        .unwrap_err();
    assert!(matches!(err, DomError::TextRoot), "Got {:?}", err);
    assert!(err.is_structural());
    assert_eq!(err.to_string(), "dump root is a text node, expected an element");
}

// =========================================================================
// Parent chain and predicates
// =========================================================================

#[test]
fn parent_chain_reaches_root() {
    let tree = scenario_tree();
    let button = tree.element(first_tag(&tree, "button")).unwrap();

    let chain: Vec<_> = button.ancestors().map(|el| el.tag_name.clone()).collect();
    assert_eq!(chain, vec!["div", "html"]);
    assert_eq!(button.parent_branch_path(), vec!["html", "div"]);
    assert!(tree.root_element().parent().is_none());
    assert!(tree.root_element().parent_branch_path().is_empty());
}

#[test]
fn every_child_points_back_at_its_parent() {
    let snapshot = snapshot_of(&login_dump());
    let tree = snapshot.tree();

    for el in tree.elements() {
        for &child in el.children() {
            assert_eq!(tree.node(child).unwrap().parent(), Some(el.id()));
        }
    }
}

#[test]
fn interactive_ancestor_requires_an_index() {
    let tree = scenario_tree();
    let hi = tree
        .iter()
        .find(|&id| matches!(tree.node(id), Some(DomNode::Text(_))))
        .unwrap();
    assert!(!tree.has_interactive_ancestor(hi));

    let snapshot = snapshot_of(&login_dump());
    let tree = snapshot.tree();
    let log_in = tree
        .iter()
        .find(|&id| matches!(tree.node(id), Some(DomNode::Text(t)) if t.text == "Log in"))
        .unwrap();
    assert!(tree.has_interactive_ancestor(log_in));

    // Flagged interactive but not yet indexed: not an interactive ancestor.
    let mut b = TreeBuilder::new();
    let root = b.root(NewElement::new("button").interactive()).unwrap();
    let inner = b.text(root, "x", true).unwrap();
    let unindexed = b.build().unwrap();
    assert!(!unindexed.has_interactive_ancestor(inner));
}

#[test]
fn file_upload_detection() {
    let dump = element("html", json!({}), false, vec![
        element("label", json!({}), true, vec![text("Upload")]),
        element("div", json!({}), false, vec![
            element("input", json!({"type": "file", "name": "doc"}), true, vec![]),
        ]),
        element("input", json!({"type": "text"}), true, vec![]),
    ]);
    let snapshot = snapshot_of(&dump);
    let tree = snapshot.tree();

    let label = tree.element(first_tag(tree, "label")).unwrap();
    assert!(!label.is_file_upload());
    assert!(label.find_file_upload_element(false).is_none(), "Nothing inside the label");

    let found = label.find_file_upload_element(true).expect("file input among siblings");
    assert!(found.is_file_upload());
    assert_eq!(found.attributes["name"], "doc");

    let text_input = tree
        .elements()
        .find(|el| el.attributes.get("type").is_some_and(|t| t == "text"))
        .unwrap();
    assert!(!text_input.is_file_upload());

    let root = tree.root_element();
    assert_eq!(root.find_file_upload_element(false).map(|el| el.id()), Some(found.id()));
}

#[test]
fn element_display_lists_flags() {
    let mut b = TreeBuilder::new();
    let root = b.root(NewElement::new("html")).unwrap();
    b.element(
        root,
        NewElement::new("button")
            .attr("id", "go")
            .interactive()
            .top()
            .shadow_root(),
    )
    .unwrap();
    let snapshot = build_snapshot(b.build().unwrap());
    let button = snapshot.tree().element(first_tag(snapshot.tree(), "button")).unwrap();

    assert_eq!(
        button.to_string(),
        r#"<button id="go"> [interactive, top, shadow-root, highlight:1]"#
    );
    assert_eq!(snapshot.root_element().to_string(), "<html>");
}

#[test]
fn tree_json_export_nests_children() {
    let snapshot = snapshot_of(&login_dump());
    let value = tree_to_json(snapshot.tree());

    assert_eq!(value["type"], "element");
    assert_eq!(value["tagName"], "html");
    assert!(value["highlightIndex"].is_null());

    let nav_link = &value["children"][0]["children"][0]["children"][0];
    assert_eq!(nav_link["tagName"], "a");
    assert_eq!(nav_link["highlightIndex"], 1);
    assert_eq!(nav_link["attributes"]["href"], "/home");
    assert_eq!(nav_link["children"][0], json!({"type": "text", "text": "Home"}));
}

// =========================================================================
// Deep documents
// =========================================================================

#[test]
fn deep_tree_is_walked_without_recursion() {
    const DEPTH: usize = 50_000;

    let mut b = TreeBuilder::new();
    let mut parent = b.root(NewElement::new("html")).unwrap();
    for _ in 0..DEPTH {
        parent = b.element(parent, NewElement::new("div")).unwrap();
    }
    let leaf = b.element(parent, NewElement::new("button").interactive()).unwrap();
    b.text(leaf, "deep", true).unwrap();
    let snapshot = build_snapshot(b.build().unwrap());

    let button = snapshot.tree().element(leaf).unwrap();
    assert_eq!(button.highlight_index(), Some(1));
    assert_eq!(button.parent_branch_path().len(), DEPTH + 1);
    assert_eq!(text_of(&button), "deep");
    assert_eq!(
        clickable_elements_to_string(snapshot.tree(), &["id"]),
        "1[:]<button>deep</button>"
    );
}

/// `html > div > ... > div > button > "deep"` as raw JSON text.
fn deep_dump(depth: usize) -> String {
    let open = r#"{"type": "element", "tagName": "div", "isVisible": true, "children": ["#;
    let mut dump = String::from(r#"{"type": "element", "tagName": "html", "children": ["#);
    for _ in 0..depth {
        dump.push_str(open);
    }
    dump.push_str(
        r#"{"type": "element", "tagName": "button", "isInteractive": true, "isVisible": true, "children": [{"type": "text", "text": "deep"}]}"#,
    );
    for _ in 0..=depth {
        dump.push_str("]}");
    }
    dump
}

#[test]
fn deep_dump_parses_past_the_json_recursion_limit() {
    const DEPTH: usize = 10_000;

    let snapshot = snapshot_from_json(&deep_dump(DEPTH), AttributeOrder::AsReceived)
        .expect("deeply nested dump should parse");

    let button = find_element_by_index(&snapshot, 1).expect("button is indexed");
    assert_eq!(button.tag_name, "button");
    assert_eq!(button.parent_branch_path().len(), DEPTH + 1);
    assert_eq!(text_of(&button), "deep");
    assert_eq!(snapshot.tree().len(), DEPTH + 3);
}

#[test]
fn deep_dump_with_a_bad_leaf_fails_cleanly() {
    const DEPTH: usize = 10_000;

    let dump = deep_dump(DEPTH).replace(r#""tagName": "button", "#, "");
    let err = parse_tree(&dump, AttributeOrder::AsReceived).unwrap_err();
    assert!(matches!(err, DomError::MalformedNode(_)), "Got {:?}", err);
}
