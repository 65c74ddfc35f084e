use tracing::{debug, info, warn};

use crate::dom::builder::AttributeOrder;
use crate::dom::indexer::resolve_index;
use crate::dom::serializer::{clickable_elements_to_string, text_of};
use crate::error::DomError;
use crate::history::history_model::HistoryElement;
use crate::history::processor::{find_in_tree, to_history_element};
use crate::history::record::{StepRecord, relocate};
use crate::snapshot_from_file;
use crate::trace::logger::{HistoryLogger, load_history};

// ============================================================================
// serialize subcommand
// ============================================================================

pub fn cmd_serialize(
    dump: &str,
    include_attributes: &[String],
    order: AttributeOrder,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = snapshot_from_file(dump, order)?;
    println!("{}", clickable_elements_to_string(snapshot.tree(), include_attributes));
    Ok(())
}

// ============================================================================
// inspect subcommand
// ============================================================================

pub fn cmd_inspect(dump: &str, order: AttributeOrder) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = snapshot_from_file(dump, order)?;
    let tree = snapshot.tree();

    for el in tree.elements() {
        let depth = el.ancestors().count();
        println!("{}{}", "  ".repeat(depth), el);
    }

    println!(
        "{} nodes, {} interactive",
        tree.len(),
        snapshot.selector_map().len()
    );
    Ok(())
}

// ============================================================================
// capture subcommand
// ============================================================================

pub fn cmd_capture(
    dump: &str,
    index: u32,
    url: &str,
    title: &str,
    log_path: &str,
    order: AttributeOrder,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = snapshot_from_file(dump, order)?;
    let element = resolve_index(&snapshot, index)?;
    debug!(index, text = %text_of(&element), "capturing element");

    let history = to_history_element(&element);
    println!("{}", serde_json::to_string_pretty(&history)?);

    let logger = HistoryLogger::new(log_path);
    let record = StepRecord::now(url, title).with_elements(vec![Some(history)]);
    if logger.log(&record)? {
        info!(log = log_path, "step recorded");
    } else {
        warn!(log = log_path, "history log disabled, step not recorded");
    }
    Ok(())
}

// ============================================================================
// locate subcommand
// ============================================================================

/// Returns whether the element was found.
pub fn cmd_locate(
    dump: &str,
    element_path: &str,
    order: AttributeOrder,
) -> Result<bool, Box<dyn std::error::Error>> {
    let snapshot = snapshot_from_file(dump, order)?;
    let content =
        std::fs::read_to_string(element_path).map_err(|e| DomError::io(element_path, e))?;
    let target: HistoryElement =
        serde_json::from_str(&content).map_err(|e| DomError::json("history element", e))?;

    match find_in_tree(&target, &snapshot) {
        Some(el) => {
            println!("{}[:]{}", el.highlight_index().unwrap_or_default(), el);
            Ok(true)
        }
        None => {
            println!("not found");
            Ok(false)
        }
    }
}

// ============================================================================
// replay subcommand
// ============================================================================

pub fn cmd_replay(
    dump: &str,
    log_path: &str,
    order: AttributeOrder,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = snapshot_from_file(dump, order)?;
    let records = load_history(log_path)?;

    if records.is_empty() {
        eprintln!("No step records found in: {}", log_path);
        return Ok(());
    }

    for (step, record) in records.iter().enumerate() {
        println!("step {} ({})", step + 1, record.url);
        let located = relocate(record, &snapshot);
        for (captured, found) in record.interacted_element.iter().zip(located) {
            let Some(captured) = captured else {
                println!("  - no target");
                continue;
            };
            let was = captured
                .highlight_index
                .map(|i| i.to_string())
                .unwrap_or_else(|| "?".into());
            match found.and_then(|el| el.highlight_index()) {
                Some(now) => println!("  <{}> {} -> {}", captured.tag_name, was, now),
                None => println!("  <{}> {} -> not found", captured.tag_name, was),
            }
        }
    }
    Ok(())
}
