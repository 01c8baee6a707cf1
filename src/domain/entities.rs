//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Kind of an entry in the asset hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Location,
    #[default]
    Equipment,
    Assembly,
    Part,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Location,
        NodeKind::Equipment,
        NodeKind::Assembly,
        NodeKind::Part,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Location => "location",
            NodeKind::Equipment => "equipment",
            NodeKind::Assembly => "assembly",
            NodeKind::Part => "part",
        }
    }

    /// Lenient conversion used on import: unrecognized input maps to `Equipment`.
    pub fn from_cell(cell: &str) -> Self {
        cell.parse().unwrap_or_default()
    }
}

impl FromStr for NodeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownNodeKind(s.to_string()))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a user-supplied quantity. Blank input means "no quantity".
pub fn parse_quantity(input: &str) -> Result<Option<f64>, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(q) if q.is_finite() && q >= 0.0 => Ok(Some(q)),
        _ => Err(DomainError::InvalidQuantity(input.to_string())),
    }
}

/// Single entry in the asset hierarchy.
///
/// The parent relation is implied by position in the forest; there is no
/// `parent_id` field to keep in sync. `Clone`, `PartialEq` and `Drop` walk the
/// subtree with an explicit stack so depth is bounded by memory only.
#[derive(Debug)]
pub struct Node {
    pub id: String,
    pub code: String,
    pub description: String,
    pub kind: NodeKind,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    /// Create a leaf with the given id and kind; everything else empty.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            description: String::new(),
            kind,
            quantity: None,
            unit: None,
            children: Vec::new(),
        }
    }

    /// Copy of this node's own fields, without children.
    fn shallow(&self) -> Self {
        Self {
            id: self.id.clone(),
            code: self.code.clone(),
            description: self.description.clone(),
            kind: self.kind,
            quantity: self.quantity,
            unit: self.unit.clone(),
            children: Vec::with_capacity(self.children.len()),
        }
    }

    fn same_fields(&self, other: &Self) -> bool {
        self.id == other.id
            && self.code == other.code
            && self.description == other.description
            && self.kind == other.kind
            && self.quantity == other.quantity
            && self.unit == other.unit
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Overwrite the editable fields, keeping `id` and `children`.
    pub fn apply(&mut self, fields: &NodeFields) {
        self.code = fields.code.clone();
        self.description = fields.description.clone();
        self.kind = fields.kind;
        self.quantity = fields.quantity;
        self.unit = fields.unit.clone().filter(|u| !u.is_empty());
    }

    pub fn fields(&self) -> NodeFields {
        NodeFields {
            code: self.code.clone(),
            description: self.description.clone(),
            kind: self.kind,
            quantity: self.quantity,
            unit: self.unit.clone(),
        }
    }

    /// Text shown for this node inside a path label.
    pub fn path_segment(&self) -> &str {
        if self.description.is_empty() {
            &self.code
        } else {
            &self.description
        }
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        // Pre-order copies, then reattach bottom-up. Children of a node always
        // have larger indices than the node itself.
        let mut parents: Vec<Option<usize>> = Vec::new();
        let mut slots: Vec<Option<Node>> = Vec::new();
        let mut stack: Vec<(&Node, Option<usize>)> = vec![(self, None)];
        while let Some((node, parent)) = stack.pop() {
            let pos = slots.len();
            slots.push(Some(node.shallow()));
            parents.push(parent);
            stack.extend(node.children.iter().rev().map(|child| (child, Some(pos))));
        }
        for pos in (1..slots.len()).rev() {
            let Some(mut node) = slots[pos].take() else {
                continue;
            };
            // Children arrived in reverse pre-order
            node.children.reverse();
            if let Some(parent) = parents[pos].and_then(|p| slots[p].as_mut()) {
                parent.children.push(node);
            }
        }
        let mut root = slots
            .swap_remove(0)
            .unwrap_or_else(|| self.shallow());
        root.children.reverse();
        root
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if !a.same_fields(b) || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(b.children.iter()));
        }
        true
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {} [{}]", self.code, self.description, self.kind)?;
        if let Some(q) = self.quantity {
            write!(f, " {}", q)?;
            if let Some(unit) = &self.unit {
                write!(f, " {}", unit)?;
            }
        }
        write!(f, " ({})", self.id)
    }
}

/// Editable fields of a node, as submitted by an update intent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeFields {
    pub code: String,
    pub description: String,
    pub kind: NodeKind,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

/// A legal reparent target. `id == None` is the "root / no parent" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentOption {
    pub id: Option<String>,
    pub label: String,
}

/// Ordered sequence of root nodes; the whole state managed by the core.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forest {
    pub roots: Vec<Node>,
}

impl Forest {
    pub fn new(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order iterator over every node, in display order.
    pub fn iter(&self) -> ForestIter<'_> {
        ForestIter::new(&self.roots)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|node| node.id.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.iter().find(|node| node.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        let mut stack: Vec<&mut Node> = self.roots.iter_mut().collect();
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter_mut());
        }
        None
    }

    /// Id of the immediate parent of `id`; `None` for roots and unknown ids.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        let mut stack: Vec<&Node> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            if node.children.iter().any(|child| child.id == id) {
                return Some(node.id.as_str());
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Remove the node with `id` from wherever it is nested, returning it with
    /// its subtree intact.
    pub fn detach(&mut self, id: &str) -> Option<Node> {
        let mut stack: Vec<&mut Vec<Node>> = vec![&mut self.roots];
        while let Some(list) = stack.pop() {
            if let Some(pos) = list.iter().position(|node| node.id == id) {
                return Some(list.remove(pos));
            }
            for node in list.iter_mut() {
                stack.push(&mut node.children);
            }
        }
        None
    }

    /// Number of levels; an empty forest has depth 0.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&Node, usize)> = self.roots.iter().map(|n| (n, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        max_depth
    }
}

/// Stack-based pre-order traversal.
pub struct ForestIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> ForestIter<'a> {
    fn new(roots: &'a [Node]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for ForestIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
