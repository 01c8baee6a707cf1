//! Tests for HierarchyBuilder, the sort policy and the text codec

use rstest::rstest;

use bomtree::domain::order::is_canonical;
use bomtree::domain::sample::SAMPLE_CSV;
use bomtree::domain::{canonicalize, export_text, import_text, Forest};
use bomtree::util::testing::{forest_from_pairs, init_test_setup};

fn child_ids<'a>(forest: &'a Forest, id: &str) -> Vec<&'a str> {
    forest
        .find(id)
        .map(|n| n.children.iter().map(|c| c.id.as_str()).collect())
        .unwrap_or_default()
}

#[test]
fn given_children_out_of_order_when_importing_then_numeric_order() {
    // Arrange
    init_test_setup();
    let text = "id,code,parentId\n1,ROOT,\n15,L15,1\n2,L2,1\n";

    // Act
    let forest = import_text(text);

    // Assert
    assert_eq!(forest.roots.len(), 1);
    assert_eq!(child_ids(&forest, "1"), vec!["2", "15"]);
}

#[test]
fn given_quoted_description_when_importing_then_literal_comma_kept() {
    let forest = import_text("id,code,description\n5,MOT,\"Motor, 5HP\"\n");

    let motor = forest.find("5").unwrap();
    assert_eq!(motor.description, "Motor, 5HP");
    assert_eq!(motor.code, "MOT");
}

#[rstest]
#[case::dangling(&[("1", None), ("2", Some("99"))], 2)]
#[case::self_parent(&[("1", Some("1")), ("2", Some("1"))], 1)]
#[case::all_roots(&[("b", None), ("a", None), ("c", None)], 3)]
fn given_unresolved_parents_when_building_then_nodes_become_roots(
    #[case] pairs: &[(&str, Option<&str>)],
    #[case] roots: usize,
) {
    let forest = forest_from_pairs(pairs);

    assert_eq!(forest.roots.len(), roots);
    assert_eq!(forest.len(), pairs.len());
}

#[test]
fn given_parent_cycle_when_building_then_first_cycle_member_becomes_root() {
    let forest = forest_from_pairs(&[("a", Some("b")), ("b", Some("a")), ("c", Some("a"))]);

    assert_eq!(forest.len(), 3);
    assert_eq!(forest.roots.len(), 1);
    assert_eq!(forest.roots[0].id, "a");
    assert_eq!(forest.parent_of("b"), Some("a"));
    assert_eq!(forest.parent_of("c"), Some("a"));
}

#[test]
fn given_duplicate_ids_when_importing_then_last_row_wins() {
    let forest = import_text("id,description,parentId\n1,first,\n2,child,1\n1,second,\n");

    assert_eq!(forest.len(), 2);
    assert_eq!(forest.find("1").unwrap().description, "second");
    assert_eq!(forest.parent_of("2"), Some("1"));
}

#[test]
fn given_text_ids_when_importing_then_lexicographic_order() {
    let forest = forest_from_pairs(&[("b", None), ("B", None), ("a", None), ("10", None)]);

    let ids: Vec<&str> = forest.roots.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["10", "B", "a", "b"]);
}

#[test]
fn given_canonical_forest_when_sorting_again_then_unchanged() {
    let forest = import_text(SAMPLE_CSV);
    assert!(is_canonical(&forest));

    let again = canonicalize(forest.clone());

    assert_eq!(again, forest);
}

#[test]
fn given_sample_when_round_tripping_then_forest_identical() {
    // Arrange
    let forest = import_text(SAMPLE_CSV);

    // Act
    let exported = export_text(&forest);
    let reimported = import_text(&exported);

    // Assert
    assert_eq!(reimported, forest);
    assert_eq!(export_text(&reimported), exported);
}

#[test]
fn given_sample_when_exporting_then_fixed_header_and_parent_column() {
    let exported = export_text(&import_text(SAMPLE_CSV));
    let mut lines = exported.lines();

    assert_eq!(
        lines.next(),
        Some("\"id\",\"code\",\"description\",\"type\",\"quantity\",\"unit\",\"parentId\"")
    );
    assert_eq!(
        lines.next(),
        Some("\"1\",\"PLANT-A\",\"Manufacturing Plant A\",\"location\",\"\",\"\",\"\"")
    );
    assert_eq!(
        lines.next(),
        Some("\"2\",\"LINE-01\",\"Production Line 1\",\"location\",\"\",\"\",\"1\"")
    );
    assert!(exported.contains("\"5\",\"MOT-5HP-001\",\"Motor, 5HP Electric\",\"part\",\"1\",\"EA\",\"4\""));
    assert!(!exported.ends_with('\n'));
}
