//! Field normalizer: raw row cells to a closed, fully typed record.
//!
//! Every field has its own fallback, so a row is never rejected.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::entities::NodeKind;

/// One imported row after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub id: String,
    pub code: String,
    pub description: String,
    pub kind: NodeKind,
    pub quantity: Option<f64>,
    pub unit: String,
    pub parent_id: Option<String>,
}

/// Column lookup built from the header row.
///
/// Names match case-insensitively; a second, looser key drops every
/// non-alphanumeric character so `parent_id`, `parentid` and `Parent Id` all
/// resolve to the same column. The first column with a given key wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    exact: HashMap<String, usize>,
    loose: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        let mut index = Self::default();
        for (pos, name) in header.iter().enumerate() {
            let exact = name.as_ref().trim().to_lowercase();
            index.loose.entry(loose_key(&exact)).or_insert(pos);
            index.exact.entry(exact).or_insert(pos);
        }
        index
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        let exact = name.to_lowercase();
        self.exact
            .get(&exact)
            .or_else(|| self.loose.get(&loose_key(&exact)))
            .copied()
    }

    /// First non-blank cell among the candidate column names.
    fn lookup<'r>(&self, row: &'r [String], names: &[&str]) -> Option<&'r str> {
        names
            .iter()
            .filter_map(|name| self.column(name))
            .filter_map(|pos| row.get(pos))
            .map(String::as_str)
            .find(|cell| !cell.trim().is_empty())
    }
}

fn loose_key(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Token used when a row has neither `id` nor `code`. Unique across batches.
pub fn generated_token() -> String {
    format!("row-{}", Uuid::new_v4().simple())
}

/// Normalize one data row against the header.
///
/// | field       | columns tried                   | fallback            |
/// |-------------|---------------------------------|---------------------|
/// | id          | id, code                        | generated token     |
/// | code        | code, id                        | same token          |
/// | description | description                     | empty               |
/// | kind        | type                            | equipment           |
/// | quantity    | quantity, qty                   | absent              |
/// | unit        | unit                            | empty               |
/// | parent_id   | parentId, parent_id, parent     | absent (root)       |
pub fn normalize_row(header: &HeaderIndex, row: &[String]) -> ItemRecord {
    let id = header.lookup(row, &["id", "code"]).map(|s| s.trim().to_string());
    let code = header.lookup(row, &["code", "id"]).map(str::to_string);
    let (id, code) = match (id, code) {
        (Some(id), Some(code)) => (id, code),
        _ => {
            let token = generated_token();
            (token.clone(), token)
        }
    };

    ItemRecord {
        id,
        code,
        description: header
            .lookup(row, &["description"])
            .unwrap_or_default()
            .to_string(),
        kind: header
            .lookup(row, &["type"])
            .map(NodeKind::from_cell)
            .unwrap_or_default(),
        quantity: header
            .lookup(row, &["quantity", "qty"])
            .and_then(parse_cell_quantity),
        unit: header.lookup(row, &["unit"]).unwrap_or_default().to_string(),
        parent_id: header
            .lookup(row, &["parentId", "parent_id", "parent"])
            .map(|s| s.trim().to_string()),
    }
}

/// Lenient quantity: anything that is not a finite, non-negative number is absent.
fn parse_cell_quantity(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite() && *q >= 0.0)
}
