#![allow(dead_code)]

use dom_history::dom::builder::{AttributeOrder, NewElement, RawNode, TreeBuilder, build_tree};
use dom_history::dom::indexer::{Snapshot, build_snapshot};
use dom_history::{DomTree, NodeId};
use serde_json::{Value, json};

/// `html > div#a > [button#b (interactive), span > "Hi"]`
pub fn scenario_tree() -> DomTree {
    let mut b = TreeBuilder::new();
    let html = b.root(NewElement::new("html").xpath("/html")).unwrap();
    let div = b
        .element(html, NewElement::new("div").attr("id", "a").xpath("/html/div"))
        .unwrap();
    b.element(
        div,
        NewElement::new("button")
            .attr("id", "b")
            .xpath("/html/div/button")
            .interactive(),
    )
    .unwrap();
    let span = b.element(div, NewElement::new("span")).unwrap();
    b.text(span, "Hi", true).unwrap();
    b.build().unwrap()
}

pub fn scenario_snapshot() -> Snapshot {
    build_snapshot(scenario_tree())
}

pub fn element(tag: &str, attributes: Value, interactive: bool, children: Vec<Value>) -> Value {
    json!({
        "type": "element",
        "tagName": tag,
        "attributes": attributes,
        "isVisible": true,
        "isInteractive": interactive,
        "children": children,
    })
}

pub fn text(value: &str) -> Value {
    json!({ "type": "text", "text": value, "isVisible": true })
}

/// A login page: a nav link, a form with two inputs and a submit button.
pub fn login_dump() -> Value {
    element("html", json!({}), false, vec![
        element("body", json!({}), false, vec![
            element("nav", json!({}), false, vec![
                element("a", json!({"href": "/home"}), true, vec![text("Home")]),
            ]),
            element("form", json!({"id": "login"}), false, vec![
                text("Sign in"),
                element("input", json!({"type": "email", "name": "email"}), true, vec![]),
                element("input", json!({"type": "password", "name": "password"}), true, vec![]),
                element("button", json!({"type": "submit"}), true, vec![text("Log in")]),
            ]),
        ]),
    ])
}

pub fn snapshot_of(dump: &Value) -> Snapshot {
    snapshot_with(dump, AttributeOrder::AsReceived)
}

pub fn snapshot_with(dump: &Value, order: AttributeOrder) -> Snapshot {
    let raw: RawNode = serde_json::from_value(dump.clone()).unwrap();
    build_snapshot(build_tree(raw, order).unwrap())
}

/// First element with the given tag, in document order.
pub fn first_tag(tree: &DomTree, tag: &str) -> NodeId {
    tree.elements()
        .find(|el| el.tag_name == tag)
        .map(|el| el.id())
        .unwrap()
}
