use crate::{
    dom::{
        builder::{AttributeOrder, parse_tree},
        indexer::{Snapshot, build_snapshot},
    },
    error::Result,
};

pub mod cli;
pub mod dom;
pub mod error;
pub mod history;
pub mod trace;

pub use dom::dom_model::{Attributes, DomNode, DomTree, ElementNode, ElementRef, NodeId, TextNode};
pub use dom::indexer::{SelectorMap, find_element_by_index, resolve_index};
pub use error::DomError;
pub use history::hasher::{StructuralIdentity, identity_of};
pub use history::history_model::{HashedIdentity, HistoryElement};
pub use history::processor::{find_in_tree, matches, to_history_element};

/// Take a snapshot from a JSON driver dump: build the tree, then index it.
pub fn snapshot_from_json(json: &str, order: AttributeOrder) -> Result<Snapshot> {
    let tree = parse_tree(json, order)?;
    Ok(build_snapshot(tree))
}

/// Read a driver dump from disk and snapshot it.
pub fn snapshot_from_file(path: &str, order: AttributeOrder) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path).map_err(|e| DomError::io(path, e))?;
    snapshot_from_json(&json, order)
}
