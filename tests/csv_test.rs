//! Tests for the CSV tokenizer, serializer and field normalizer

use rstest::rstest;

use bomtree::domain::csv::{parse_rows, serialize_rows, HEADER};
use bomtree::domain::record::{normalize_row, HeaderIndex};
use bomtree::domain::NodeKind;

fn cells(row: &[&str]) -> Vec<String> {
    row.iter().map(|c| c.to_string()).collect()
}

#[test]
fn given_quoted_comma_when_parsing_then_description_is_one_cell() {
    // Arrange
    let text = "id,code,description\n5,MOT-5HP,\"Motor, 5HP\"\n";

    // Act
    let rows = parse_rows(text);

    // Assert
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], cells(&["5", "MOT-5HP", "Motor, 5HP"]));
}

#[test]
fn given_newline_and_doubled_quote_inside_quotes_when_parsing_then_literal() {
    let rows = parse_rows("a,b\n\"line1\nline2\",\"say \"\"hi\"\"\"\n");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "line1\nline2");
    assert_eq!(rows[1][1], "say \"hi\"");
}

#[rstest]
#[case::lf("a,b\n1,2\n3,4")]
#[case::crlf("a,b\r\n1,2\r\n3,4\r\n")]
#[case::blank_rows("a,b\n\n1,2\n,\n3,4\n")]
fn given_line_endings_when_parsing_then_same_rows(#[case] text: &str) {
    let rows = parse_rows(text);

    assert_eq!(
        rows,
        vec![cells(&["a", "b"]), cells(&["1", "2"]), cells(&["3", "4"])]
    );
}

#[test]
fn given_short_and_long_rows_when_parsing_then_kept_as_is() {
    let rows = parse_rows("a,b,c\n1\n1,2,3,4\n");

    assert_eq!(rows[1], cells(&["1"]));
    assert_eq!(rows[2].len(), 4);
}

#[test]
fn given_rows_when_serializing_then_every_cell_quoted_and_lf_joined() {
    let text = serialize_rows(vec![vec!["id", "description"], vec!["5", "say \"hi\", ok"]]);

    assert_eq!(text, "\"id\",\"description\"\n\"5\",\"say \"\"hi\"\", ok\"");
}

#[test]
fn given_serialized_rows_when_parsing_then_original_cells() {
    let original = vec![
        cells(&["1", "A, B", "multi\nline", ""]),
        cells(&["2", "\"quoted\"", "", "x"]),
    ];

    let parsed = parse_rows(&serialize_rows(&original));

    assert_eq!(parsed, original);
}

#[rstest]
#[case::snake("parent_id")]
#[case::flat("parentid")]
#[case::spaced("Parent Id")]
#[case::camel("parentId")]
#[case::short("parent")]
fn given_parent_header_variant_when_normalizing_then_parent_resolved(#[case] column: &str) {
    let header = HeaderIndex::new(&["id", column]);

    let record = normalize_row(&header, &cells(&["7", " 3 "]));

    assert_eq!(record.parent_id.as_deref(), Some("3"));
}

#[test]
fn given_missing_id_when_normalizing_then_code_used() {
    let header = HeaderIndex::new(&["ID", "Code", "Type"]);

    let record = normalize_row(&header, &cells(&["", "PUMP-1", "PART"]));

    assert_eq!(record.id, "PUMP-1");
    assert_eq!(record.code, "PUMP-1");
    assert_eq!(record.kind, NodeKind::Part);
}

#[test]
fn given_neither_id_nor_code_when_normalizing_then_unique_generated_tokens() {
    let header = HeaderIndex::new(&HEADER);
    let blank = cells(&["", "", "orphan", "", "", "", ""]);

    let first = normalize_row(&header, &blank);
    let second = normalize_row(&header, &blank);

    assert!(!first.id.is_empty());
    assert_eq!(first.id, first.code);
    assert_ne!(first.id, second.id);
}

#[rstest]
#[case::valid("2.5", Some(2.5))]
#[case::blank("", None)]
#[case::text("lots", None)]
#[case::negative("-1", None)]
#[case::nan("NaN", None)]
fn given_quantity_cell_when_normalizing_then_parsed_or_absent(
    #[case] cell: &str,
    #[case] expected: Option<f64>,
) {
    let header = HeaderIndex::new(&["id", "quantity"]);

    let record = normalize_row(&header, &cells(&["1", cell]));

    assert_eq!(record.quantity, expected);
}

#[test]
fn given_qty_column_when_normalizing_then_used_as_quantity() {
    let header = HeaderIndex::new(&["id", "qty", "type"]);

    let record = normalize_row(&header, &cells(&["1", "3", "gizmo"]));

    assert_eq!(record.quantity, Some(3.0));
    assert_eq!(record.kind, NodeKind::Equipment);
    assert!(record.parent_id.is_none());
}
