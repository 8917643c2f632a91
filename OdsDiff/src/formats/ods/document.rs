//! ODS document structures
//!
//! [`OdsDocument`] is the ownership root for one parsed `content.xml`.
//! [`Sheet`], [`Row`] and [`Cell`] are owned views read out of it; rows and
//! cells remember the markup they came from so untouched rows can be written
//! back exactly as read.

use std::path::Path;
use std::sync::Arc;

use super::names::{BODY, DOCUMENT_CONTENT, SPREADSHEET, TABLE};
use super::{reader, styles, writer};
use crate::config::DiffStyles;
use crate::error::{Error, Result};
use crate::formats::xml::{XmlDocument, XmlElement, parse_xml, read_xml, serialize_xml, write_xml};

/// A single cell: its text content and style reference
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Text content (empty for blank cells)
    pub text: String,
    /// Name of the style the cell references, if any
    pub style: Option<String>,
    /// Markup the cell was read from, without its repeat attribute
    pub(crate) markup: Option<XmlElement>,
}

impl Cell {
    /// Create an unstyled cell with the given text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the style reference
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// A row of cells
///
/// A row carries no identity beyond its position in the sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// Cells in column order
    pub cells: Vec<Cell>,
    /// Row element this row was expanded from; shared by repeated rows
    pub(crate) source: Option<Arc<XmlElement>>,
    /// Position of the source element among the table's row elements
    pub(crate) slot: Option<usize>,
    /// Set once the row has been tagged and must be rebuilt on write
    pub(crate) touched: bool,
    /// How the diff classified the row
    pub(crate) mark: RowMark,
}

/// Diff classification of a merged row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum RowMark {
    /// Present in both sheets
    #[default]
    Kept,
    /// Only in the modified sheet
    Added,
    /// Only in the origin sheet
    Removed,
}

impl Row {
    /// Create a new row from cells
    #[must_use]
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            source: None,
            slot: None,
            touched: true,
            mark: RowMark::Kept,
        }
    }

    /// Cell texts padded or truncated to `column_count` fields
    #[must_use]
    pub fn texts(&self, column_count: usize) -> Vec<&str> {
        let mut texts: Vec<&str> = self
            .cells
            .iter()
            .take(column_count)
            .map(|cell| cell.text.as_str())
            .collect();
        texts.resize(column_count, "");
        texts
    }

    /// Tag every cell with `style`, creating empty cells up to `column_count`
    pub fn tag(&mut self, style: &str, column_count: usize) {
        if self.cells.len() < column_count {
            self.cells.resize_with(column_count, Cell::default);
        }
        for cell in &mut self.cells {
            cell.style = Some(style.to_string());
        }
        self.touched = true;
    }

    /// Forget the markup the row was read from; it is rebuilt from its cells
    pub(crate) fn detach(&mut self) {
        self.source = None;
        self.slot = None;
        self.touched = true;
        for cell in &mut self.cells {
            cell.markup = None;
        }
    }

    /// Whether the row will be rebuilt from its cells when written
    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.touched || self.source.is_none()
    }

    /// Whether every cell is empty
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.text.is_empty())
    }
}

/// A sheet: a named table with a fixed column count
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet name (`table:name`)
    pub name: String,
    column_count: usize,
    /// Rows in order, excluding the trailing blank rows
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create a new sheet
    #[must_use]
    pub fn new(name: impl Into<String>, column_count: usize, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            column_count,
            rows,
        }
    }

    /// Number of columns declared by the sheet's first column definition
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the sheet has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A parsed ODS `content.xml`
#[derive(Debug, Clone, PartialEq)]
pub struct OdsDocument {
    xml: XmlDocument,
}

impl OdsDocument {
    /// Parse `content.xml` markup
    ///
    /// # Errors
    /// Returns an error if the markup is malformed or has no spreadsheet body.
    pub fn parse(content: &str) -> Result<Self> {
        let doc = Self {
            xml: parse_xml(content)?,
        };
        doc.spreadsheet()?;
        Ok(doc)
    }

    /// Read and parse a `content.xml` file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a spreadsheet.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = Self {
            xml: read_xml(path)?,
        };
        doc.spreadsheet()?;
        Ok(doc)
    }

    /// Number of sheets in the spreadsheet body
    ///
    /// # Errors
    /// Returns an error if the spreadsheet body is missing.
    pub fn sheet_count(&self) -> Result<usize> {
        Ok(self.spreadsheet()?.elements().filter(|el| el.is(TABLE)).count())
    }

    /// Read every sheet in document order
    ///
    /// # Errors
    /// Returns an error if the body is missing or a table has no column definition.
    pub fn sheets(&self) -> Result<Vec<Sheet>> {
        self.spreadsheet()?
            .elements()
            .filter(|el| el.is(TABLE))
            .map(reader::read_sheet)
            .collect()
    }

    /// Replace the rows of the sheet at `index` with `sheet`'s rows
    ///
    /// Rows read from this sheet go back in place of their own elements, so
    /// header rows and row groups keep their rows. The table's trailing blank
    /// rows and everything that is not a row are kept.
    ///
    /// # Errors
    /// Returns an error if there is no sheet at `index`.
    pub fn replace_rows(&mut self, index: usize, sheet: &Sheet) -> Result<()> {
        let table = self
            .spreadsheet_mut()?
            .children
            .iter_mut()
            .filter_map(|node| node.as_element_mut())
            .filter(|el| el.is(TABLE))
            .nth(index)
            .ok_or_else(|| Error::Structure {
                path: format!("{SPREADSHEET}/{TABLE}[{index}]"),
            })?;
        writer::splice_rows(table, &sheet.rows)
    }

    /// Append the added-row and removed-row cell styles to the automatic styles
    ///
    /// Each call appends another pair; call it once per document.
    ///
    /// # Errors
    /// Returns an error if the document root is not `office:document-content`.
    pub fn register_diff_styles(&mut self, diff_styles: &DiffStyles) -> Result<()> {
        styles::register(&mut self.xml, diff_styles)
    }

    /// Serialize back to markup
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<String> {
        serialize_xml(&self.xml)
    }

    /// Serialize and write to a file
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_xml(&self.xml, path)
    }

    fn spreadsheet(&self) -> Result<&XmlElement> {
        self.xml
            .root()
            .filter(|root| root.is(DOCUMENT_CONTENT))
            .and_then(|root| root.child(BODY))
            .and_then(|body| body.child(SPREADSHEET))
            .ok_or_else(spreadsheet_missing)
    }

    fn spreadsheet_mut(&mut self) -> Result<&mut XmlElement> {
        self.xml
            .root_mut()
            .filter(|root| root.is(DOCUMENT_CONTENT))
            .and_then(|root| root.child_mut(BODY))
            .and_then(|body| body.child_mut(SPREADSHEET))
            .ok_or_else(spreadsheet_missing)
    }
}

fn spreadsheet_missing() -> Error {
    Error::Structure {
        path: format!("{DOCUMENT_CONTENT}/{BODY}/{SPREADSHEET}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" "#,
        r#"xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" "#,
        r#"xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">"#,
        r#"<office:automatic-styles/><office:body><office:spreadsheet>"#,
        r#"<table:table table:name="One"><table:table-column table:number-columns-repeated="2"/>"#,
        r#"<table:table-row><table:table-cell><text:p>a</text:p></table:table-cell>"#,
        r#"<table:table-cell><text:p>b</text:p></table:table-cell></table:table-row>"#,
        r#"<table:table-row table:number-rows-repeated="1048000"><table:table-cell table:number-columns-repeated="2"/></table:table-row>"#,
        r#"</table:table>"#,
        r#"<table:table table:name="Two"><table:table-column/></table:table>"#,
        r#"</office:spreadsheet></office:body></office:document-content>"#
    );

    #[test]
    fn test_sheets_in_document_order() {
        let doc = OdsDocument::parse(CONTENT).unwrap();
        assert_eq!(doc.sheet_count().unwrap(), 2);

        let sheets = doc.sheets().unwrap();
        assert_eq!(sheets[0].name, "One");
        assert_eq!(sheets[0].column_count(), 2);
        assert_eq!(sheets[0].len(), 1);
        assert_eq!(sheets[0].rows[0].texts(2), vec!["a", "b"]);
        assert_eq!(sheets[1].name, "Two");
        assert!(sheets[1].is_empty());
    }

    #[test]
    fn test_missing_body_is_structure_error() {
        let err = OdsDocument::parse("<office:document-content/>").unwrap_err();
        assert!(matches!(err, Error::Structure { ref path } if path.ends_with("office:spreadsheet")));
    }

    #[test]
    fn test_untouched_rows_serialize_unchanged() {
        let mut doc = OdsDocument::parse(CONTENT).unwrap();
        let sheets = doc.sheets().unwrap();
        for (index, sheet) in sheets.iter().enumerate() {
            doc.replace_rows(index, sheet).unwrap();
        }
        assert_eq!(doc.serialize().unwrap(), CONTENT);
    }

    #[test]
    fn test_replace_rows_out_of_range() {
        let mut doc = OdsDocument::parse(CONTENT).unwrap();
        let sheet = Sheet::new("Three", 1, Vec::new());
        assert!(matches!(
            doc.replace_rows(2, &sheet),
            Err(Error::Structure { .. })
        ));
    }

    #[test]
    fn test_row_tag_pads_to_column_count() {
        let mut row = Row::new(vec![Cell::new("x")]);
        row.tag("removed", 3);
        assert_eq!(row.cells.len(), 3);
        assert!(row.cells.iter().all(|c| c.style.as_deref() == Some("removed")));
        assert_eq!(row.texts(3), vec!["x", "", ""]);
        assert!(row.is_touched());
    }
}
