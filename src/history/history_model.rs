use serde::{Deserialize, Serialize};

use crate::dom::dom_model::Attributes;

/// Snapshot-independent descriptor of an element an action targeted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryElement {
    #[serde(rename = "tagName")]
    pub tag_name: String,
    pub xpath: String,
    /// Index the element carried when captured. Never used for matching.
    #[serde(rename = "highlightIndex")]
    pub highlight_index: Option<u32>,
    /// Tag names from the document root down to, excluding, the element.
    #[serde(rename = "entireParentBranchPath")]
    pub parent_branch_path: Vec<String>,
    pub attributes: Attributes,
    #[serde(rename = "shadowRoot", default)]
    pub shadow_root: bool,
}

/// Structural identity: digests of the branch path and of the attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashedIdentity {
    #[serde(rename = "branchPathHash")]
    pub branch_path_hash: String,
    #[serde(rename = "attributesHash")]
    pub attributes_hash: String,
}
