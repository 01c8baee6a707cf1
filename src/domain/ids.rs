//! Id allocation for nodes created without a caller-supplied id.

use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::entities::Forest;
use crate::domain::order::numeric_id;

/// Prefix of ids drawn from the random branch.
pub const RANDOM_ID_PREFIX: &str = "NEW-";

/// Source of random id candidates.
pub trait TokenSource {
    fn next_token(&mut self) -> String;
}

/// Upper-case hex tokens from v4 uuids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&mut self) -> String {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        format!("{}{}", RANDOM_ID_PREFIX, &hex[..12])
    }
}

impl<F: FnMut() -> String> TokenSource for F {
    fn next_token(&mut self) -> String {
        self()
    }
}

/// Allocate an id that is not used anywhere in `forest`.
///
/// All-numeric forests get `max + 1`, stepping past reserved values; any
/// non-numeric id switches to random candidates retried until unused.
pub fn allocate_id(forest: &Forest, tokens: &mut impl TokenSource) -> String {
    let existing: HashSet<&str> = forest.ids().collect();

    let numeric: Option<Vec<i64>> = existing.iter().map(|id| numeric_id(id)).collect();
    if let Some(values) = numeric {
        let mut next = values.iter().max().map_or(Some(1), |max| max.checked_add(1));
        while let Some(candidate) = next {
            let text = candidate.to_string();
            if !existing.contains(text.as_str()) {
                return text;
            }
            next = candidate.checked_add(1);
        }
    }

    loop {
        let candidate = tokens.next_token();
        if !existing.contains(candidate.as_str()) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Node, NodeKind};

    fn flat(ids: &[&str]) -> Forest {
        Forest::new(ids.iter().map(|id| Node::new(*id, NodeKind::Part)).collect())
    }

    #[test]
    fn given_numeric_ids_when_allocating_then_max_plus_one() {
        let forest = flat(&["1", "2", "3"]);
        assert_eq!(allocate_id(&forest, &mut UuidTokens), "4");
    }

    #[test]
    fn given_zero_padded_ids_when_allocating_then_uses_numeric_value() {
        let forest = flat(&["3", "007"]);
        assert_eq!(allocate_id(&forest, &mut UuidTokens), "8");
    }

    #[test]
    fn given_empty_forest_when_allocating_then_starts_at_one() {
        assert_eq!(allocate_id(&Forest::default(), &mut UuidTokens), "1");
    }

    #[test]
    fn given_text_id_when_allocating_then_random_branch() {
        let forest = flat(&["1", "PUMP"]);
        let id = allocate_id(&forest, &mut UuidTokens);
        assert!(id.starts_with(RANDOM_ID_PREFIX));
        assert!(!forest.contains(&id));
    }

    #[test]
    fn given_colliding_tokens_when_allocating_then_retries() {
        let forest = flat(&["NEW-A", "NEW-B"]);
        let mut scripted = vec!["NEW-C", "NEW-B", "NEW-A"];
        let mut tokens = || scripted.pop().unwrap_or("NEW-Z").to_string();
        assert_eq!(allocate_id(&forest, &mut tokens), "NEW-C");
    }

    #[test]
    fn given_max_integer_id_when_allocating_then_falls_back_to_random() {
        let max = i64::MAX.to_string();
        let forest = flat(&[max.as_str()]);
        assert!(allocate_id(&forest, &mut UuidTokens).starts_with(RANDOM_ID_PREFIX));
    }
}
