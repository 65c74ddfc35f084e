use std::time::Instant;

use tracing::debug;

use crate::dom::dom_model::ElementRef;
use crate::dom::indexer::Snapshot;
use crate::history::hasher::StructuralIdentity;
use crate::history::history_model::{HashedIdentity, HistoryElement};

/// Capture the durable descriptor of an element at the moment it is acted on.
pub fn to_history_element(element: &ElementRef<'_>) -> HistoryElement {
    HistoryElement {
        tag_name: element.tag_name.clone(),
        xpath: element.xpath.clone(),
        highlight_index: element.highlight_index(),
        parent_branch_path: element
            .parent_branch_path()
            .into_iter()
            .map(str::to_string)
            .collect(),
        attributes: element.attributes.clone(),
        shadow_root: element.is_shadow_root,
    }
}

/// Find the first interactive element, in document order, whose identity
/// equals the target's. Elements with identical structure are not told apart.
pub fn find_in_tree<'a>(target: &HistoryElement, snapshot: &'a Snapshot) -> Option<ElementRef<'a>> {
    let start = Instant::now();
    let wanted = target.identity();

    let found = snapshot
        .tree()
        .elements()
        .filter(|el| el.highlight_index().is_some())
        .find(|el| same_identity(&wanted, el));

    debug!(
        tag = %target.tag_name,
        found = found.map(|el| el.id().index()),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "find history element in tree"
    );
    found
}

/// Whether `candidate` is structurally the element `target` was captured from.
pub fn matches(target: &HistoryElement, candidate: &ElementRef<'_>) -> bool {
    same_identity(&target.identity(), candidate)
}

fn same_identity(wanted: &HashedIdentity, candidate: &ElementRef<'_>) -> bool {
    candidate.identity() == *wanted
}
