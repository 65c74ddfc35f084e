use sha2::{Digest, Sha256};

use crate::dom::dom_model::{Attributes, ElementRef};
use crate::history::history_model::{HashedIdentity, HistoryElement};

/// SHA-256 of the path joined with `/`. Order and case sensitive.
pub fn branch_path_hash<S: AsRef<str>>(path: &[S]) -> String {
    let joined = path.iter().map(|s| s.as_ref()).collect::<Vec<&str>>().join("/");
    digest(joined.as_bytes())
}

/// SHA-256 of `key=value` pairs concatenated in the mapping's iteration order.
///
/// No sorting happens here: the same attributes inserted in a different order
/// hash differently. Build trees with sorted attributes to ignore order.
pub fn attributes_hash(attributes: &Attributes) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in attributes {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Anything with a structural identity: a captured history element or a live
/// element of some snapshot. The interaction index never takes part.
pub trait StructuralIdentity {
    fn identity(&self) -> HashedIdentity;
}

impl StructuralIdentity for HistoryElement {
    fn identity(&self) -> HashedIdentity {
        HashedIdentity {
            branch_path_hash: branch_path_hash(&self.parent_branch_path),
            attributes_hash: attributes_hash(&self.attributes),
        }
    }
}

impl StructuralIdentity for ElementRef<'_> {
    fn identity(&self) -> HashedIdentity {
        HashedIdentity {
            branch_path_hash: branch_path_hash(&self.parent_branch_path()),
            attributes_hash: attributes_hash(&self.attributes),
        }
    }
}

pub fn identity_of(x: &impl StructuralIdentity) -> HashedIdentity {
    x.identity()
}
