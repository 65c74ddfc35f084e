use std::collections::BTreeMap;
use std::time::Instant;

use tracing::debug;

use crate::dom::dom_model::{DomNode, DomTree, ElementRef, NodeId};
use crate::error::{DomError, Result};

/// Interaction index to element, scoped to one snapshot.
pub type SelectorMap = BTreeMap<u32, NodeId>;

/// An indexed capture of the document. Immutable once built.
#[derive(Debug, Clone)]
pub struct Snapshot {
    tree: DomTree,
    selector_map: SelectorMap,
}

impl Snapshot {
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn selector_map(&self) -> &SelectorMap {
        &self.selector_map
    }

    pub fn root_element(&self) -> ElementRef<'_> {
        self.tree.root_element()
    }

    /// Interactive elements in index order.
    pub fn interactive_elements(&self) -> impl Iterator<Item = (u32, ElementRef<'_>)> {
        self.selector_map
            .iter()
            .filter_map(|(&index, &id)| Some((index, self.tree.element(id)?)))
    }

    /// Give the tree back, e.g. to index it again.
    pub fn into_tree(self) -> DomTree {
        self.tree
    }
}

/// Assign interaction indices in pre-order, starting at 1, and record them in
/// the selector map. Indices from any earlier indexing are discarded.
pub fn build_snapshot(mut tree: DomTree) -> Snapshot {
    let start = Instant::now();
    let order: Vec<NodeId> = tree.iter().collect();

    let mut selector_map = SelectorMap::new();
    let mut next_index = 1;
    for id in order {
        if let Some(DomNode::Element(el)) = tree.nodes.get_mut(id.0) {
            el.highlight_index = None;
            if el.is_interactive {
                el.highlight_index = Some(next_index);
                selector_map.insert(next_index, id);
                next_index += 1;
            }
        }
    }

    debug!(
        interactive = selector_map.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "create selector map"
    );
    Snapshot { tree, selector_map }
}

/// Look an index up in the snapshot's selector map.
pub fn find_element_by_index(snapshot: &Snapshot, index: u32) -> Option<ElementRef<'_>> {
    let id = snapshot.selector_map.get(&index)?;
    snapshot.tree.element(*id)
}

/// Like [`find_element_by_index`], but a miss is a [`DomError::UnknownIndex`].
pub fn resolve_index(snapshot: &Snapshot, index: u32) -> Result<ElementRef<'_>> {
    find_element_by_index(snapshot, index).ok_or(DomError::UnknownIndex(index))
}
