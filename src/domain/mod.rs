//! Domain layer: the hierarchy engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).
//! Every operation is a pure function from one forest snapshot to the next.

pub mod builder;
pub mod codec;
pub mod csv;
pub mod entities;
pub mod error;
pub mod ids;
pub mod mutation;
pub mod order;
pub mod parents;
pub mod record;
pub mod sample;

pub use builder::{build_forest, HierarchyBuilder};
pub use codec::{export_text, forest_to_rows, import_text};
pub use entities::*;
pub use error::DomainError;
pub use ids::{allocate_id, TokenSource, UuidTokens};
pub use mutation::{add, delete, update, NewItemTemplate};
pub use order::{canonicalize, compare_ids};
pub use parents::{parent_options, ParentResolver};
