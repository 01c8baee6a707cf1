//! Tree mutation engine.
//!
//! Every operation takes the current forest and returns a new canonical one. A
//! missing target id leaves the forest unchanged. Cycle freedom of a reparent is
//! the caller's job (see [`crate::domain::parents`]).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::entities::{Forest, Node, NodeFields, NodeKind};
use crate::domain::ids::{allocate_id, TokenSource, RANDOM_ID_PREFIX};
use crate::domain::order::canonicalize;

/// Placeholder values for nodes created by [`add`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewItemTemplate {
    pub description: String,
    pub unit: String,
    pub code_prefix: String,
    pub quantity: Option<f64>,
    pub kind: NodeKind,
}

impl Default for NewItemTemplate {
    fn default() -> Self {
        Self {
            description: "New Item".into(),
            unit: "EA".into(),
            code_prefix: RANDOM_ID_PREFIX.into(),
            quantity: Some(1.0),
            kind: NodeKind::Part,
        }
    }
}

impl NewItemTemplate {
    pub fn instantiate(&self, id: &str) -> Node {
        let code = if id.starts_with(&self.code_prefix) {
            id.to_string()
        } else {
            format!("{}{}", self.code_prefix, id)
        };
        Node {
            id: id.to_string(),
            code,
            description: self.description.clone(),
            kind: self.kind,
            quantity: self.quantity,
            unit: Some(self.unit.clone()).filter(|u| !u.is_empty()),
            children: Vec::new(),
        }
    }
}

/// Append a new placeholder leaf under `parent_id`.
///
/// Returns the new forest and the allocated id, or the unchanged forest and
/// `None` when the parent does not exist.
pub fn add(
    forest: &Forest,
    parent_id: &str,
    template: &NewItemTemplate,
    tokens: &mut impl TokenSource,
) -> (Forest, Option<String>) {
    if !forest.contains(parent_id) {
        warn!(parent_id, "add: parent not found, nothing to do");
        return (forest.clone(), None);
    }
    let id = allocate_id(forest, tokens);
    let mut next = forest.clone();
    if let Some(parent) = next.find_mut(parent_id) {
        parent.children.push(template.instantiate(&id));
    }
    debug!(parent_id, id = %id, "add: new node");
    (canonicalize(next), Some(id))
}

/// Replace the fields of `id` and optionally move it.
///
/// Same old and new parent: fields change in place, children stay. Different
/// parents: the node is detached with its subtree and appended under
/// `new_parent`, or to the root list when `new_parent` is `None` or no longer
/// resolves.
pub fn update(
    forest: &Forest,
    id: &str,
    fields: &NodeFields,
    new_parent: Option<&str>,
    old_parent: Option<&str>,
) -> Forest {
    if !forest.contains(id) {
        warn!(id, "update: node not found, nothing to do");
        return forest.clone();
    }
    let mut next = forest.clone();

    if new_parent == old_parent {
        if let Some(node) = next.find_mut(id) {
            node.apply(fields);
        }
        return canonicalize(next);
    }

    let Some(mut node) = next.detach(id) else {
        return forest.clone();
    };
    node.apply(fields);

    match new_parent.and_then(|pid| next.find_mut(pid)) {
        Some(parent) => parent.children.push(node),
        None => {
            if let Some(pid) = new_parent {
                warn!(id, parent_id = pid, "update: new parent not found, moving to root");
            }
            next.roots.push(node);
        }
    }
    debug!(id, ?new_parent, ?old_parent, "update: reparented");
    canonicalize(next)
}

/// Remove `id` and its entire subtree.
pub fn delete(forest: &Forest, id: &str) -> Forest {
    let mut next = forest.clone();
    match next.detach(id) {
        Some(removed) => {
            debug!(id, removed = removed.children.len() + 1, "delete: removed subtree");
            canonicalize(next)
        }
        None => {
            warn!(id, "delete: node not found, nothing to do");
            forest.clone()
        }
    }
}
