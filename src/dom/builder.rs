use std::time::Instant;

use serde::Deserialize;
use tracing::debug;

use crate::dom::dom_model::{Attributes, DomNode, DomTree, ElementNode, NodeId, TextNode};
use crate::error::{DomError, Result};

/// Kind of a dump node, from its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawKind {
    Element,
    Text,
}

/// One node of the structural dump produced by the document driver.
///
/// Visibility, interactivity and shadow-root flags are computed upstream and
/// trusted as-is. Kept as a flat struct rather than a tagged enum so that
/// deserialization never buffers a whole subtree before decoding it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub kind: RawKind,
    #[serde(rename = "tagName", default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub xpath: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub children: Vec<RawNode>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "isVisible", default)]
    pub is_visible: bool,
    #[serde(rename = "isInteractive", default)]
    pub is_interactive: bool,
    #[serde(rename = "isTopElement", default)]
    pub is_top_element: bool,
    #[serde(rename = "shadowRoot", default)]
    pub shadow_root: bool,
}

/// How attribute mappings are stored when a tree is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributeOrder {
    /// Keep the order the driver reported. Reordering between captures
    /// changes the attributes hash.
    #[default]
    AsReceived,
    /// Sort by attribute name so identity ignores reordering.
    Sorted,
}

/// Element fields supplied by the caller; links are filled in by the builder.
#[derive(Debug, Clone, Default)]
pub struct NewElement {
    pub tag_name: String,
    pub xpath: String,
    pub attributes: Attributes,
    pub is_visible: bool,
    pub is_interactive: bool,
    pub is_top_element: bool,
    pub is_shadow_root: bool,
}

impl NewElement {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            is_visible: true,
            ..Default::default()
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn xpath(mut self, xpath: impl Into<String>) -> Self {
        self.xpath = xpath.into();
        self
    }

    pub fn interactive(mut self) -> Self {
        self.is_interactive = true;
        self
    }

    pub fn top(mut self) -> Self {
        self.is_top_element = true;
        self
    }

    pub fn shadow_root(mut self) -> Self {
        self.is_shadow_root = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }
}

/// Incremental tree construction with structural checks.
///
/// Every node must name an existing element as parent, which rules out cycles
/// and keeps parents allocated before their children.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<DomNode>,
    root: Option<NodeId>,
    attribute_order: AttributeOrder,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute_order(mut self, order: AttributeOrder) -> Self {
        self.attribute_order = order;
        self
    }

    pub fn root(&mut self, element: NewElement) -> Result<NodeId> {
        if self.root.is_some() {
            return Err(DomError::MultipleRoots);
        }
        let id = self.push_element(element, None);
        self.root = Some(id);
        Ok(id)
    }

    pub fn element(&mut self, parent: NodeId, element: NewElement) -> Result<NodeId> {
        self.check_parent(parent)?;
        let id = self.push_element(element, Some(parent));
        self.attach(parent, id);
        Ok(id)
    }

    pub fn text(&mut self, parent: NodeId, text: impl Into<String>, is_visible: bool) -> Result<NodeId> {
        self.check_parent(parent)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode::Text(TextNode {
            text: text.into(),
            is_visible,
            parent: Some(parent),
        }));
        self.attach(parent, id);
        Ok(id)
    }

    pub fn build(self) -> Result<DomTree> {
        let root = self.root.ok_or(DomError::EmptyTree)?;
        Ok(DomTree {
            nodes: self.nodes,
            root,
        })
    }

    fn check_parent(&self, parent: NodeId) -> Result<()> {
        match self.nodes.get(parent.0) {
            Some(DomNode::Element(_)) => Ok(()),
            Some(DomNode::Text(_)) => Err(DomError::TextParent(parent)),
            None => Err(DomError::DanglingParent(parent)),
        }
    }

    fn push_element(&mut self, element: NewElement, parent: Option<NodeId>) -> NodeId {
        let mut attributes = element.attributes;
        if self.attribute_order == AttributeOrder::Sorted {
            attributes.sort_keys();
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode::Element(ElementNode {
            tag_name: element.tag_name,
            xpath: element.xpath,
            attributes,
            is_visible: element.is_visible,
            is_interactive: element.is_interactive,
            is_top_element: element.is_top_element,
            is_shadow_root: element.is_shadow_root,
            highlight_index: None,
            children: Vec::new(),
            parent,
        }));
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(DomNode::Element(el)) = self.nodes.get_mut(parent.0) {
            el.children.push(child);
        }
    }
}

/// Build an unindexed tree from a driver dump.
///
/// Consumes the dump: each node's children are moved onto the work stack, so
/// neither building nor dropping the dump recurses.
pub fn build_tree(raw: RawNode, order: AttributeOrder) -> Result<DomTree> {
    let start = Instant::now();
    let mut builder = TreeBuilder::new().with_attribute_order(order);

    let mut stack: Vec<(RawNode, Option<NodeId>)> = vec![(raw, None)];
    let built = drain_into(&mut builder, &mut stack);

    // Left over only after an error: take it apart level by level.
    while let Some((mut node, _)) = stack.pop() {
        let children = std::mem::take(&mut node.children);
        stack.extend(children.into_iter().map(|child| (child, None)));
    }
    built?;

    let tree = builder.build()?;
    debug!(
        nodes = tree.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "parse dom"
    );
    Ok(tree)
}

/// On error the failing node is pushed back, so the caller still owns and
/// dismantles everything that was not consumed.
fn drain_into(builder: &mut TreeBuilder, stack: &mut Vec<(RawNode, Option<NodeId>)>) -> Result<()> {
    while let Some((mut node, parent)) = stack.pop() {
        let outcome = match (node.kind, parent) {
            (RawKind::Text, None) => Err(DomError::TextRoot),
            (RawKind::Text, Some(_)) if !node.children.is_empty() => Err(DomError::MalformedNode(
                "text node with children".into(),
            )),
            (RawKind::Text, Some(parent)) => match node.text.take() {
                Some(text) => builder.text(parent, text, node.is_visible),
                None => Err(DomError::MalformedNode("text node without text".into())),
            },
            (RawKind::Element, parent) => match node.tag_name.take() {
                Some(tag_name) => {
                    let element = NewElement {
                        tag_name,
                        xpath: std::mem::take(&mut node.xpath),
                        attributes: std::mem::take(&mut node.attributes),
                        is_visible: node.is_visible,
                        is_interactive: node.is_interactive,
                        is_top_element: node.is_top_element,
                        is_shadow_root: node.shadow_root,
                    };
                    match parent {
                        Some(parent) => builder.element(parent, element),
                        None => builder.root(element),
                    }
                }
                None => Err(DomError::MalformedNode("element without tagName".into())),
            },
        };

        match outcome {
            Ok(id) => {
                let children = std::mem::take(&mut node.children);
                stack.extend(children.into_iter().rev().map(|child| (child, Some(id))));
            }
            Err(e) => {
                stack.push((node, parent));
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Parse a JSON driver dump and build its tree.
///
/// Nesting depth is unbounded: the recursion limit is lifted and the
/// deserializer grows its stack on the heap as documents get deeper.
pub fn parse_tree(json: &str, order: AttributeOrder) -> Result<DomTree> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let raw = RawNode::deserialize(serde_stacker::Deserializer::new(&mut de))
        .map_err(|e| DomError::json("driver dump", e))?;
    de.end().map_err(|e| DomError::json("driver dump", e))?;
    build_tree(raw, order)
}
