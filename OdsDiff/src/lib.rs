//! # odsdiff
//!
//! A pure-Rust library for row-level diffing of OpenDocument spreadsheets.
//!
//! Two `.ods` files are compared sheet by sheet. The result is a copy of the
//! modified file where every removed row is kept and highlighted in red and
//! every added row is inserted and highlighted in green.
//!
//! ## Quick Start
//!
//! ### Diffing Two Files
//!
//! ```no_run
//! use odsdiff::config::DiffConfig;
//! use odsdiff::diff::diff_files;
//!
//! // Writes sheet-origin__diff__sheet-modified.ods next to the origin file
//! let report = diff_files("sheet-origin.ods", "sheet-modified.ods", &DiffConfig::default())?;
//! println!("{}", report.summary());
//! # Ok::<(), odsdiff::Error>(())
//! ```
//!
//! ### Custom Output and Delimiter
//!
//! ```no_run
//! use odsdiff::config::DiffConfig;
//! use odsdiff::diff::diff_files;
//!
//! let config = DiffConfig::new()
//!     .with_output_path("review.ods")
//!     .with_delimiter('\t');
//! diff_files("v1.ods", "v2.ods", &config)?;
//! # Ok::<(), odsdiff::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use odsdiff::prelude::*;
//!
//! // Now you have access to:
//! // - diff_files, DiffConfig, DiffReport, DiffHunk
//! // - OdsDocument, Sheet, Row, Cell
//! // - Error, Result, and more
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `odsdiff` command-line binary

pub mod config;
pub mod diff;
pub mod error;
pub mod formats;
pub mod package;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{CellStyle, DiffConfig, DiffStyles};
    pub use crate::error::{Error, Result, Stage};
    pub use crate::formats::ods::{Cell, OdsDocument, Row, Sheet};

    // Diff operations
    pub use crate::diff::{
        DiffHunk, DiffPhase, DiffProgress, DiffReport, SheetReport, apply_hunks, diff_files,
        diff_files_with_progress, diff_lines, rebase_rows, serialize_sheet,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
