//! File format handlers for OpenDocument spreadsheets
//!
//! `xml` is the lossless markup tree every other layer builds on; `ods`
//! is the typed spreadsheet view over a parsed `content.xml`.

pub mod ods;
pub mod xml;

// Re-export main document types
pub use ods::{Cell, OdsDocument, Row, Sheet};
pub use xml::{XmlDocument, XmlElement, XmlNode};
