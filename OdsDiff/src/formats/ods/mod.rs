//! ODS (OpenDocument spreadsheet) content module
//!
//! [`OdsDocument`] owns a parsed `content.xml`; [`Sheet`]s are read out of it
//! as owned row sequences, mutated, and spliced back in place.

mod document;
mod reader;
mod styles;
mod writer;

pub use document::{Cell, OdsDocument, Row, Sheet};
pub(crate) use document::RowMark;
pub use reader::{MAX_ROWS, cell_text};

/// Qualified element and attribute names used by the ODS layers.
pub(crate) mod names {
    pub const DOCUMENT_CONTENT: &str = "office:document-content";
    pub const AUTOMATIC_STYLES: &str = "office:automatic-styles";
    pub const BODY: &str = "office:body";
    pub const SPREADSHEET: &str = "office:spreadsheet";

    pub const TABLE: &str = "table:table";
    pub const TABLE_NAME: &str = "table:name";
    pub const COLUMN: &str = "table:table-column";
    pub const COLUMN_CONTAINERS: [&str; 3] = [
        "table:table-columns",
        "table:table-header-columns",
        "table:table-column-group",
    ];
    pub const ROW: &str = "table:table-row";
    pub const ROW_CONTAINERS: [&str; 3] = [
        "table:table-header-rows",
        "table:table-rows",
        "table:table-row-group",
    ];
    pub const CELL: &str = "table:table-cell";
    pub const COVERED_CELL: &str = "table:covered-table-cell";
    pub const STYLE_NAME: &str = "table:style-name";
    pub const ROWS_REPEATED: &str = "table:number-rows-repeated";
    pub const COLUMNS_REPEATED: &str = "table:number-columns-repeated";

    pub const PARAGRAPH: &str = "text:p";
    pub const SPACE: &str = "text:s";
    pub const SPACE_COUNT: &str = "text:c";
    pub const TAB: &str = "text:tab";
    pub const LINE_BREAK: &str = "text:line-break";
    pub const ANNOTATION: &str = "office:annotation";
    pub const VALUE_TYPE: &str = "office:value-type";
}
