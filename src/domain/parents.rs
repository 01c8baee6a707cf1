//! Parent-option resolver: the legal reparent targets of a node.
//!
//! This is the only cycle prevention; [`crate::domain::mutation::update`] trusts
//! whatever parent it is given.

use std::collections::HashSet;

use itertools::Itertools;

use crate::domain::entities::{Forest, Node, ParentOption};

pub const ROOT_LABEL: &str = "(root level)";
pub const LABEL_SEPARATOR: &str = " / ";

/// A node together with the path segments from its root down to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatNode {
    pub id: String,
    pub code: String,
    pub path: Vec<String>,
}

impl FlatNode {
    pub fn label(&self, separator: &str) -> String {
        format!("{} ({})", self.path.iter().join(separator), self.code)
    }
}

/// Pre-order listing of every node with its ancestry, without recursion.
pub fn flatten_with_paths(forest: &Forest) -> Vec<FlatNode> {
    let mut flat = Vec::new();
    let mut stack: Vec<(&Node, Vec<String>)> = forest
        .roots
        .iter()
        .rev()
        .map(|node| (node, Vec::new()))
        .collect();

    while let Some((node, mut path)) = stack.pop() {
        path.push(node.path_segment().to_string());
        for child in node.children.iter().rev() {
            stack.push((child, path.clone()));
        }
        flat.push(FlatNode {
            id: node.id.clone(),
            code: node.code.clone(),
            path,
        });
    }
    flat
}

/// Ids of every strict descendant of `id`; empty when `id` is unknown.
pub fn descendant_ids<'a>(forest: &'a Forest, id: &str) -> HashSet<&'a str> {
    let mut ids = HashSet::new();
    let Some(node) = forest.find(id) else {
        return ids;
    };
    let mut stack: Vec<&Node> = node.children.iter().collect();
    while let Some(current) = stack.pop() {
        ids.insert(current.id.as_str());
        stack.extend(current.children.iter());
    }
    ids
}

/// Resolves parent options with configurable labels.
#[derive(Debug, Clone)]
pub struct ParentResolver {
    pub root_label: String,
    pub separator: String,
}

impl Default for ParentResolver {
    fn default() -> Self {
        Self {
            root_label: ROOT_LABEL.to_string(),
            separator: LABEL_SEPARATOR.to_string(),
        }
    }
}

impl ParentResolver {
    pub fn new(root_label: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            root_label: root_label.into(),
            separator: separator.into(),
        }
    }

    /// Root sentinel first, then every node except `id` and its descendants,
    /// in canonical pre-order.
    pub fn options(&self, forest: &Forest, id: &str) -> Vec<ParentOption> {
        let mut excluded = descendant_ids(forest, id);
        excluded.insert(id);

        let mut options = vec![ParentOption {
            id: None,
            label: self.root_label.clone(),
        }];
        options.extend(
            flatten_with_paths(forest)
                .into_iter()
                .filter(|flat| !excluded.contains(flat.id.as_str()))
                .map(|flat| ParentOption {
                    label: flat.label(&self.separator),
                    id: Some(flat.id),
                }),
        );
        options
    }

    /// Whether `parent` (`None` = root) is among the options for `id`.
    /// Unknown parent ids are not options.
    pub fn is_allowed(&self, forest: &Forest, id: &str, parent: Option<&str>) -> bool {
        match parent {
            None => true,
            Some(parent) => {
                parent != id
                    && forest.contains(parent)
                    && !descendant_ids(forest, id).contains(parent)
            }
        }
    }
}

/// Parent options with the default labels.
pub fn parent_options(forest: &Forest, id: &str) -> Vec<ParentOption> {
    ParentResolver::default().options(forest, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NodeKind;

    fn node(id: &str, description: &str, children: Vec<Node>) -> Node {
        let mut node = Node::new(id, NodeKind::Equipment).with_children(children);
        node.code = format!("C{id}");
        node.description = description.to_string();
        node
    }

    fn fixture() -> Forest {
        Forest::new(vec![node(
            "1",
            "Plant",
            vec![
                node("2", "Line", vec![node("4", "", vec![])]),
                node("3", "Packer", vec![]),
            ],
        )])
    }

    #[test]
    fn given_forest_when_flattening_then_paths_use_description_or_code() {
        let flat = flatten_with_paths(&fixture());
        let four = flat.iter().find(|f| f.id == "4").unwrap();
        assert_eq!(four.path, vec!["Plant", "Line", "C4"]);
        assert_eq!(four.label(LABEL_SEPARATOR), "Plant / Line / C4 (C4)");
    }

    #[test]
    fn given_node_when_resolving_then_self_and_descendants_excluded() {
        let options = parent_options(&fixture(), "2");
        let ids: Vec<Option<&str>> = options.iter().map(|o| o.id.as_deref()).collect();
        assert_eq!(ids, vec![None, Some("1"), Some("3")]);
        assert_eq!(options[0].label, ROOT_LABEL);
    }

    #[test]
    fn given_unknown_node_when_resolving_then_everything_offered() {
        let options = parent_options(&fixture(), "99");
        assert_eq!(options.len(), 5);
    }

    #[test]
    fn given_descendant_target_when_checking_then_not_allowed() {
        let resolver = ParentResolver::default();
        let forest = fixture();
        assert!(!resolver.is_allowed(&forest, "1", Some("4")));
        assert!(!resolver.is_allowed(&forest, "2", Some("2")));
        assert!(resolver.is_allowed(&forest, "4", Some("3")));
        assert!(resolver.is_allowed(&forest, "4", None));
        assert!(!resolver.is_allowed(&forest, "4", Some("missing")));
    }
}
