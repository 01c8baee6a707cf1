//! Canonical sibling order.
//!
//! Numeric ids sort numerically, everything else byte-wise. Mixed sets put
//! numeric ids first so the comparator stays a total order.

use std::cmp::Ordering;

use crate::domain::entities::{Forest, Node};

/// Parse an id as a base-10 integer; the whole string must be consumed.
pub fn numeric_id(id: &str) -> Option<i64> {
    id.parse::<i64>().ok()
}

pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (numeric_id(a), numeric_id(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

pub fn compare_nodes(a: &Node, b: &Node) -> Ordering {
    compare_ids(&a.id, &b.id)
}

/// Sort the root list and every child list in place, without recursion.
pub fn sort_lists(roots: &mut Vec<Node>) {
    let mut stack: Vec<&mut Vec<Node>> = vec![roots];
    while let Some(list) = stack.pop() {
        list.sort_by(compare_nodes);
        for node in list.iter_mut() {
            stack.push(&mut node.children);
        }
    }
}

/// Return the forest in canonical order.
pub fn canonicalize(mut forest: Forest) -> Forest {
    sort_lists(&mut forest.roots);
    forest
}

/// True when every sibling list is already in canonical order.
pub fn is_canonical(forest: &Forest) -> bool {
    let mut stack: Vec<&[Node]> = vec![forest.roots.as_slice()];
    while let Some(list) = stack.pop() {
        if list
            .windows(2)
            .any(|pair| compare_nodes(&pair[0], &pair[1]) == Ordering::Greater)
        {
            return false;
        }
        stack.extend(list.iter().map(|node| node.children.as_slice()));
    }
    true
}
