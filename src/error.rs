use thiserror::Error;

use crate::dom::dom_model::NodeId;

#[derive(Debug, Error)]
pub enum DomError {
    /// Index absent from the selector map of the snapshot it was resolved against
    #[error("unknown interaction index {0}")]
    UnknownIndex(u32),

    #[error("tree has no root element")]
    EmptyTree,

    #[error("dump root is a text node, expected an element")]
    TextRoot,

    #[error("malformed dump node: {0}")]
    MalformedNode(String),

    #[error("tree already has a root element")]
    MultipleRoots,

    #[error("parent {0} does not exist in this tree")]
    DanglingParent(NodeId),

    #[error("node {0} is a text node and cannot own children")]
    TextParent(NodeId),

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl DomError {
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Structural violations come from a defective driver and are never retried.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DomError::EmptyTree
                | DomError::TextRoot
                | DomError::MalformedNode(_)
                | DomError::MultipleRoots
                | DomError::DanglingParent(_)
                | DomError::TextParent(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DomError>;
