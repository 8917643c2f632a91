//! Row-level diff of ODS spreadsheets
//!
//! Each sheet is projected to one delimited line per row, the two
//! projections are line-diffed, and the hunks are applied back onto the
//! origin rows: removed rows stay in place with the removed style, added
//! rows are inserted with the added style.
//!
//! # Diffing Files
//!
//! ```no_run
//! use odsdiff::config::DiffConfig;
//! use odsdiff::diff::diff_files;
//!
//! let report = diff_files("sheet-origin.ods", "sheet-modified.ods", &DiffConfig::default())?;
//!
//! println!("{}", report.summary());
//! for sheet in &report.sheets {
//!     println!("{}", sheet);
//! }
//! # Ok::<(), odsdiff::Error>(())
//! ```
//!
//! # Working on Sheets
//!
//! ```
//! use odsdiff::config::DiffStyles;
//! use odsdiff::diff::{apply_hunks, diff_lines, serialize_sheet};
//! use odsdiff::formats::ods::{Cell, Row, Sheet};
//!
//! let row = |a: &str, b: &str| Row::new(vec![Cell::new(a), Cell::new(b)]);
//! let mut origin = Sheet::new("Sheet1", 2, vec![row("a", "b"), row("c", "d")]);
//! let modified = Sheet::new("Sheet1", 2, vec![row("a", "b"), row("X", "Y")]);
//!
//! let hunks = diff_lines(&serialize_sheet(&origin, ';'), &serialize_sheet(&modified, ';'));
//! let stats = apply_hunks(&mut origin, &hunks, &DiffStyles::default(), ';')?;
//!
//! assert_eq!(stats.added, 1);
//! assert_eq!(origin.len(), 3);
//! # Ok::<(), odsdiff::Error>(())
//! ```

mod apply;
mod lines;
mod ods_diff;
mod rows;
mod types;

pub use apply::{ApplyStats, apply_hunks, rebase_rows};
pub use lines::{diff_lines, patch};
pub use ods_diff::{diff_files, diff_files_with_progress};
pub use rows::{deserialize_line, serialize_sheet};
pub use types::{DiffHunk, DiffPhase, DiffProgress, DiffReport, ProgressCallback, SheetReport};
