//! Row projection to and from delimited text lines

use crate::formats::ods::{Cell, Row, Sheet};

/// Serialize a sheet to one delimited line per row
///
/// Each line has exactly `column_count` fields and ends with a newline.
/// Only cell text is projected; styles are rebuilt when hunks are applied.
#[must_use]
pub fn serialize_sheet(sheet: &Sheet, delimiter: char) -> String {
    let separator = delimiter.to_string();
    let mut text = String::new();
    for row in &sheet.rows {
        text.push_str(&row.texts(sheet.column_count()).join(&separator));
        text.push('\n');
    }
    text
}

/// Build a row from one delimited line
///
/// Extra fields past `column_count` are dropped and missing ones are
/// filled with empty cells, so the row always has `column_count` cells.
#[must_use]
pub fn deserialize_line(line: &str, delimiter: char, column_count: usize) -> Row {
    let mut cells: Vec<Cell> = line
        .split(delimiter)
        .take(column_count)
        .map(Cell::new)
        .collect();
    cells.resize_with(column_count, Cell::default);
    Row::new(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sheet(rows: &[&[&str]], column_count: usize) -> Sheet {
        let rows = rows
            .iter()
            .map(|cells| Row::new(cells.iter().map(|&t| Cell::new(t)).collect()))
            .collect();
        Sheet::new("S", column_count, rows)
    }

    #[test]
    fn test_serialize_pads_and_truncates() {
        let sheet = sheet(&[&["a", "b"], &["c"], &["d", "e", "f"], &[]], 2);
        assert_eq!(serialize_sheet(&sheet, ';'), "a;b\nc;\nd;e\n;\n");
    }

    #[test]
    fn test_serialize_empty_sheet() {
        assert_eq!(serialize_sheet(&sheet(&[], 3), ';'), "");
    }

    #[test]
    fn test_deserialize_fits_column_count() {
        let texts = |row: &Row| row.cells.iter().map(|c| c.text.clone()).collect::<Vec<_>>();
        assert_eq!(texts(&deserialize_line("x;y;z", ';', 2)), ["x", "y"]);
        assert_eq!(texts(&deserialize_line("x", ';', 3)), ["x", "", ""]);
        assert_eq!(texts(&deserialize_line("", ';', 2)), ["", ""]);
    }

    #[test]
    fn test_row_round_trip() {
        let original = sheet(&[&["1", "two", ""], &["", "", "x y"]], 3);
        let text = serialize_sheet(&original, '\t');
        let rows: Vec<Row> = text
            .lines()
            .map(|line| deserialize_line(line, '\t', 3))
            .collect();
        assert_eq!(rows, original.rows);
    }
}
