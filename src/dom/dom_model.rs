use std::fmt;
use std::ops::Deref;

use indexmap::IndexMap;

/// Attribute mapping in the order the driver reported it.
pub type Attributes = IndexMap<String, String>;

/// Position of a node inside its tree's arena.
///
/// Ids are only meaningful for the tree that issued them. A parent is always
/// allocated before its children, so a parent's id is lower than any id below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum DomNode {
    Element(ElementNode),
    Text(TextNode),
}

impl DomNode {
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            DomNode::Element(el) => el.parent,
            DomNode::Text(text) => text.parent,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            DomNode::Element(el) => el.is_visible,
            DomNode::Text(text) => text.is_visible,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            DomNode::Element(el) => Some(el),
            DomNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            DomNode::Text(text) => Some(text),
            DomNode::Element(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag_name: String,
    /// Driver-supplied locator; informational only.
    pub xpath: String,
    pub attributes: Attributes,
    pub is_visible: bool,
    pub is_interactive: bool,
    pub is_top_element: bool,
    pub is_shadow_root: bool,

    pub(crate) highlight_index: Option<u32>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl ElementNode {
    /// Interaction index assigned by the snapshot indexer, if any.
    pub fn highlight_index(&self) -> Option<u32> {
        self.highlight_index
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_file_upload(&self) -> bool {
        self.tag_name == "input" && self.attributes.get("type").is_some_and(|t| t == "file")
    }
}

impl fmt::Display for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag_name)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }
        write!(f, ">")?;

        let mut extras = Vec::new();
        if self.is_interactive {
            extras.push("interactive".to_string());
        }
        if self.is_top_element {
            extras.push("top".to_string());
        }
        if self.is_shadow_root {
            extras.push("shadow-root".to_string());
        }
        if let Some(index) = self.highlight_index {
            extras.push(format!("highlight:{}", index));
        }

        if !extras.is_empty() {
            write!(f, " [{}]", extras.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TextNode {
    pub text: String,
    pub is_visible: bool,
    pub(crate) parent: Option<NodeId>,
}

impl TextNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// One captured document: an arena of nodes with a single element root.
///
/// Children are owned by the arena; parent links are plain ids, so upward
/// walks are O(1) per step and the structure holds no reference cycles.
#[derive(Debug, Clone)]
pub struct DomTree {
    pub(crate) nodes: Vec<DomNode>,
    pub(crate) root: NodeId,
}

impl DomTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_element(&self) -> ElementRef<'_> {
        // The builder only ever installs an element as root.
        match self.element(self.root) {
            Some(el) => el,
            None => unreachable!("tree root is always an element"),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        match self.nodes.get(id.0)? {
            DomNode::Element(element) => Some(ElementRef {
                tree: self,
                id,
                element,
            }),
            DomNode::Text(_) => None,
        }
    }

    /// Pre-order walk of the whole tree.
    pub fn iter(&self) -> PreOrder<'_> {
        self.descendants(self.root)
    }

    /// Pre-order walk of the subtree rooted at `id`, `id` included.
    pub fn descendants(&self, id: NodeId) -> PreOrder<'_> {
        let stack = if self.node(id).is_some() { vec![id] } else { vec![] };
        PreOrder { tree: self, stack }
    }

    /// Elements of the whole tree in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.iter().filter_map(move |id| self.element(id))
    }

    /// Enclosing elements of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).and_then(DomNode::parent),
        }
    }

    pub fn has_interactive_ancestor(&self, id: NodeId) -> bool {
        self.ancestors(id)
            .any(|ancestor| ancestor.highlight_index.is_some())
    }
}

/// Depth-first pre-order traversal driven by an explicit stack.
pub struct PreOrder<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(DomNode::Element(el)) = self.tree.node(id) {
            self.stack.extend(el.children.iter().rev().copied());
        }
        Some(id)
    }
}

pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<ElementRef<'a>> {
        let current = self.tree.element(self.next?)?;
        self.next = current.element.parent;
        Some(current)
    }
}

/// Borrowed view of an element together with the tree it lives in.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
    element: &'a ElementNode,
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a DomTree {
        self.tree
    }

    pub fn node(&self) -> &'a ElementNode {
        self.element
    }

    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.tree.element(self.element.parent?)
    }

    pub fn ancestors(&self) -> Ancestors<'a> {
        self.tree.ancestors(self.id)
    }

    pub fn has_interactive_ancestor(&self) -> bool {
        self.tree.has_interactive_ancestor(self.id)
    }

    /// Tag names from the document root down to, but excluding, this element.
    pub fn parent_branch_path(&self) -> Vec<&'a str> {
        let mut path: Vec<&'a str> = self
            .ancestors()
            .map(|ancestor| ancestor.element.tag_name.as_str())
            .collect();
        path.reverse();
        path
    }

    /// Locate the file input an action on this element would most likely target.
    ///
    /// Checks the element itself, then its subtree, then (if `check_siblings`)
    /// the subtrees of its sibling elements.
    pub fn find_file_upload_element(&self, check_siblings: bool) -> Option<ElementRef<'a>> {
        if let Some(found) = self.first_file_upload_in_subtree() {
            return Some(found);
        }

        if !check_siblings {
            return None;
        }

        let parent = self.parent()?;
        parent
            .element
            .children
            .iter()
            .filter(|&&sibling| sibling != self.id)
            .filter_map(|&sibling| self.tree.element(sibling))
            .find_map(|sibling| sibling.first_file_upload_in_subtree())
    }

    fn first_file_upload_in_subtree(&self) -> Option<ElementRef<'a>> {
        self.tree
            .descendants(self.id)
            .filter_map(|id| self.tree.element(id))
            .find(|el| el.is_file_upload())
    }
}

impl Deref for ElementRef<'_> {
    type Target = ElementNode;

    fn deref(&self) -> &ElementNode {
        self.element
    }
}

impl fmt::Display for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.element, f)
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}
