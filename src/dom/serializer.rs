use serde_json::{Value, json};

use crate::dom::dom_model::{DomNode, DomTree, ElementRef};

/// Text of `element` for display, excluding text owned by nested interactive
/// elements. Parts are joined with newlines in document order, then trimmed.
pub fn text_of(element: &ElementRef<'_>) -> String {
    let tree = element.tree();
    let mut parts: Vec<&str> = Vec::new();

    let mut stack = vec![element.id()];
    while let Some(id) = stack.pop() {
        match tree.node(id) {
            Some(DomNode::Element(el)) => {
                if id != element.id() && el.highlight_index().is_some() {
                    continue;
                }
                stack.extend(el.children().iter().rev().copied());
            }
            Some(DomNode::Text(text)) => parts.push(&text.text),
            None => {}
        }
    }

    parts.join("\n").trim().to_string()
}

/// Flatten a snapshot tree into one line per reportable node.
///
/// Interactive elements render as `<index>[:]<tag attrs>text</tag>` with only
/// the attributes named in `include_attributes`; text outside every
/// interactive element renders as `_[:]text`.
pub fn clickable_elements_to_string<S: AsRef<str>>(tree: &DomTree, include_attributes: &[S]) -> String {
    let mut lines = Vec::new();

    for id in tree.iter() {
        match tree.node(id) {
            Some(DomNode::Element(_)) => {
                let Some(el) = tree.element(id) else { continue };
                let Some(index) = el.highlight_index() else { continue };

                let mut attrs = String::new();
                for key in include_attributes {
                    let key = key.as_ref();
                    match el.attributes.get(key) {
                        Some(value) if !value.is_empty() => {
                            attrs.push_str(&format!(" {}=\"{}\"", key, value));
                        }
                        _ => {}
                    }
                }

                lines.push(format!(
                    "{}[:]<{}{}>{}</{}>",
                    index,
                    el.tag_name,
                    attrs,
                    text_of(&el),
                    el.tag_name
                ));
            }
            Some(DomNode::Text(text)) => {
                if !tree.has_interactive_ancestor(id) {
                    lines.push(format!("_[:]{}", text.text));
                }
            }
            None => {}
        }
    }

    lines.join("\n")
}

/// JSON rendering of the whole tree.
///
/// Nodes are visited from the highest id down, so every child value exists
/// before its parent is assembled.
pub fn tree_to_json(tree: &DomTree) -> Value {
    let mut built: Vec<Option<Value>> = vec![None; tree.len()];

    for index in (0..tree.len()).rev() {
        let value = match &tree.nodes[index] {
            DomNode::Text(text) => json!({ "type": "text", "text": text.text }),
            DomNode::Element(el) => {
                let children: Vec<Value> = el
                    .children()
                    .iter()
                    .filter_map(|child| built[child.index()].take())
                    .collect();

                json!({
                    "type": "element",
                    "tagName": el.tag_name,
                    "attributes": el.attributes,
                    "highlightIndex": el.highlight_index(),
                    "children": children,
                })
            }
        };
        built[index] = Some(value);
    }

    built
        .get_mut(tree.root().index())
        .and_then(Option::take)
        .unwrap_or(Value::Null)
}
