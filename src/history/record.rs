use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::dom::dom_model::ElementRef;
use crate::dom::indexer::{Snapshot, find_element_by_index};
use crate::history::history_model::HistoryElement;
use crate::history::processor::{find_in_tree, to_history_element};

/// What one agent step touched, in a form that outlives its snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: u64,
    pub url: String,
    pub title: String,
    /// One entry per action of the step; `None` for actions without a target.
    #[serde(rename = "interactedElement")]
    pub interacted_element: Vec<Option<HistoryElement>>,
}

impl StepRecord {
    pub fn now(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
            url: url.into(),
            title: title.into(),
            interacted_element: vec![],
        }
    }

    pub fn with_elements(mut self, elements: Vec<Option<HistoryElement>>) -> Self {
        self.interacted_element = elements;
        self
    }
}

/// Capture the elements targeted by a step's actions.
///
/// An action without an index, or with an index this snapshot does not know,
/// yields `None`.
pub fn interacted_elements(indices: &[Option<u32>], snapshot: &Snapshot) -> Vec<Option<HistoryElement>> {
    indices
        .iter()
        .map(|index| {
            let el = find_element_by_index(snapshot, (*index)?)?;
            Some(to_history_element(&el))
        })
        .collect()
}

/// Re-locate every element recorded in `record` inside a later snapshot.
pub fn relocate<'a>(record: &StepRecord, snapshot: &'a Snapshot) -> Vec<Option<ElementRef<'a>>> {
    record
        .interacted_element
        .iter()
        .map(|element| find_in_tree(element.as_ref()?, snapshot))
        .collect()
}
