//! Quote-aware CSV tokenizer and serializer.
//!
//! Reading accepts quoted and unquoted cells and `\n` or `\r\n` row endings.
//! Writing always quotes every cell and joins rows with `\n`.

use itertools::Itertools;

/// Column order of every written file.
pub const HEADER: [&str; 7] = [
    "id",
    "code",
    "description",
    "type",
    "quantity",
    "unit",
    "parentId",
];

pub type Row = Vec<String>;

/// Split text into rows of cells.
///
/// - `,` separates cells; `"` opens a quoted cell in which `,`, newlines and
///   text are literal and `""` is an escaped quote
/// - row separators are only recognized outside quotes
/// - rows whose cells are all blank are dropped
/// - rows are never rejected for their shape
pub fn parse_rows(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut row: Row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                _ => cell.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut cell));
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => cell.push(c),
        }
    }

    // Final row without trailing newline; an unterminated quote runs to end of input
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        push_row(&mut rows, row);
    }
    rows
}

fn push_row(rows: &mut Vec<Row>, row: Row) {
    if row.iter().any(|cell| !cell.trim().is_empty()) {
        rows.push(row);
    }
}

/// Quote a single cell, doubling embedded quotes.
pub fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Serialize rows; every cell is quoted, rows are joined with `\n`.
pub fn serialize_rows<R, C>(rows: R) -> String
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: AsRef<str>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(|cell| quote(cell.as_ref())).join(","))
        .join("\n")
}
