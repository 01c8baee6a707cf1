//! Hierarchy builder: flat typed records to a canonical forest.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::domain::entities::{Forest, Node};
use crate::domain::order::canonicalize;
use crate::domain::record::ItemRecord;

/// Constructs a forest from imported records in two passes.
///
/// Pass one maps every id to a fresh childless node; a later record with the
/// same id replaces the earlier one (last write wins). Pass two attaches each
/// node to its parent when the parent id resolves inside the same batch and
/// makes it a root otherwise.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    index: HashMap<String, usize>,
    records: Vec<ItemRecord>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record; duplicates overwrite the earlier entry in place.
    pub fn push(&mut self, record: ItemRecord) {
        match self.index.get(&record.id) {
            Some(&pos) => {
                warn!(id = %record.id, "duplicate id in import, keeping the later row");
                self.records[pos] = record;
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[instrument(level = "debug", skip(self), fields(records = self.records.len()))]
    pub fn build(self) -> Forest {
        let count = self.records.len();
        let mut parent_of: Vec<Option<usize>> = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, record)| {
                record
                    .parent_id
                    .as_ref()
                    .and_then(|pid| self.index.get(pid).copied())
                    .filter(|&parent| parent != pos)
            })
            .collect();

        break_cycles(&mut parent_of);

        let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut roots = Vec::new();
        for (pos, parent) in parent_of.iter().enumerate() {
            match parent {
                Some(parent) => children_of[*parent].push(pos),
                None => roots.push(pos),
            }
        }

        // Reverse pre-order puts every descendant before its ancestor
        let mut preorder = Vec::with_capacity(count);
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(pos) = stack.pop() {
            preorder.push(pos);
            stack.extend(children_of[pos].iter().rev());
        }

        let mut slots: Vec<Option<Node>> = self
            .records
            .into_iter()
            .map(|record| Some(into_node(record)))
            .collect();
        for &pos in preorder.iter().rev() {
            let children: Vec<Node> = children_of[pos]
                .iter()
                .filter_map(|&child| slots[child].take())
                .collect();
            if let Some(node) = slots[pos].as_mut() {
                node.children = children;
            }
        }

        let roots: Vec<Node> = roots.iter().filter_map(|&pos| slots[pos].take()).collect();
        debug!("built {} root(s) from {} record(s)", roots.len(), count);
        canonicalize(Forest::new(roots))
    }
}

impl FromIterator<ItemRecord> for HierarchyBuilder {
    fn from_iter<I: IntoIterator<Item = ItemRecord>>(iter: I) -> Self {
        let mut builder = Self::new();
        for record in iter {
            builder.push(record);
        }
        builder
    }
}

/// Build a canonical forest from records.
pub fn build_forest(records: impl IntoIterator<Item = ItemRecord>) -> Forest {
    records.into_iter().collect::<HierarchyBuilder>().build()
}

fn into_node(record: ItemRecord) -> Node {
    Node {
        id: record.id,
        code: record.code,
        description: record.description,
        kind: record.kind,
        quantity: record.quantity,
        unit: Some(record.unit).filter(|u| !u.is_empty()),
        children: Vec::new(),
    }
}

/// Demote nodes so that every parent chain ends at a root.
///
/// Nodes are visited in input order; the first node found on a chain that loops
/// back into itself loses its parent.
fn break_cycles(parent_of: &mut [Option<usize>]) {
    // 0 = unvisited, 1 = on the current chain, 2 = known to reach a root
    let mut state = vec![0u8; parent_of.len()];
    for start in 0..parent_of.len() {
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(pos) = current {
            match state[pos] {
                2 => break,
                1 => {
                    let head = chain
                        .iter()
                        .position(|&p| p == pos)
                        .map(|i| chain[i..].iter().copied().min().unwrap_or(pos))
                        .unwrap_or(pos);
                    warn!(position = head, "parent cycle in import, promoting node to root");
                    parent_of[head] = None;
                    break;
                }
                _ => {
                    state[pos] = 1;
                    chain.push(pos);
                    current = parent_of[pos];
                }
            }
        }
        for pos in chain {
            state[pos] = 2;
        }
    }
}
