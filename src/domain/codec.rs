//! Text to forest and back.

use tracing::debug;

use crate::domain::builder::HierarchyBuilder;
use crate::domain::csv::{parse_rows, serialize_rows, Row, HEADER};
use crate::domain::entities::{Forest, Node};
use crate::domain::record::{normalize_row, HeaderIndex, ItemRecord};

/// Normalize every data row of `text`. The first surviving row is the header.
pub fn records_from_text(text: &str) -> Vec<ItemRecord> {
    let mut rows = parse_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header = HeaderIndex::new(&header);
    rows.map(|row| normalize_row(&header, &row)).collect()
}

/// Parse CSV text into a canonical forest. Never fails; see the field
/// normalizer for per-cell fallbacks.
pub fn import_text(text: &str) -> Forest {
    let builder: HierarchyBuilder = records_from_text(text).into_iter().collect();
    debug!("import: {} distinct record(s)", builder.len());
    builder.build()
}

/// Flatten a forest into data rows in pre-order, each row carrying its
/// immediate parent's id (empty for roots).
pub fn forest_to_rows(forest: &Forest) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut stack: Vec<(&Node, &str)> = forest.roots.iter().rev().map(|n| (n, "")).collect();
    while let Some((node, parent_id)) = stack.pop() {
        rows.push(node_row(node, parent_id));
        for child in node.children.iter().rev() {
            stack.push((child, node.id.as_str()));
        }
    }
    rows
}

fn node_row(node: &Node, parent_id: &str) -> Row {
    vec![
        node.id.clone(),
        node.code.clone(),
        node.description.clone(),
        node.kind.to_string(),
        node.quantity.map(|q| q.to_string()).unwrap_or_default(),
        node.unit.clone().unwrap_or_default(),
        parent_id.to_string(),
    ]
}

/// Serialize a forest with the fixed header.
pub fn export_text(forest: &Forest) -> String {
    let header: Row = HEADER.iter().map(|h| h.to_string()).collect();
    serialize_rows(std::iter::once(header).chain(forest_to_rows(forest)))
}
