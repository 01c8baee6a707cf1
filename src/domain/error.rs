//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent rejected user input.
///
/// Imported data never produces these: malformed cells fall back to defaults and
/// dangling parent references demote a node to root.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("unknown node type: {0} (expected location, equipment, assembly or part)")]
    UnknownNodeKind(String),

    #[error("invalid quantity: {0} (expected a non-negative number)")]
    InvalidQuantity(String),

    #[error("illegal parent {parent} for node {id}: would create a cycle")]
    IllegalParent { id: String, parent: String },
}
