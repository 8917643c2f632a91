//! Diff configuration
//!
//! Style names, colors and the row delimiter live here rather than in
//! globals so two runs with different settings can share a process.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default cell delimiter used when projecting rows to lines
pub const DEFAULT_DELIMITER: char = ';';

/// Separator placed between the two input names in the output file name
pub const OUTPUT_NAME_SEPARATOR: &str = "__diff__";

/// A named cell style with a background color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    /// Style name referenced by `table:style-name`
    pub name: String,
    /// Background color (`fo:background-color`)
    pub background_color: String,
}

impl CellStyle {
    /// Create a new cell style
    pub fn new(name: impl Into<String>, background_color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background_color: background_color.into(),
        }
    }
}

/// The two styles used to highlight diff rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStyles {
    /// Style applied to every cell of an added row
    pub added: CellStyle,
    /// Style applied to every cell of a removed row
    pub removed: CellStyle,
}

impl Default for DiffStyles {
    fn default() -> Self {
        Self {
            added: CellStyle::new("odsdiff_newline", "#00ff66"),
            removed: CellStyle::new("odsdiff_removedline", "#ff9999"),
        }
    }
}

/// Options for a diff run
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Log every hunk at `info` level
    pub verbose: bool,
    /// Output file; derived from the input names when `None`
    pub output_file_path: Option<PathBuf>,
    /// Cell delimiter for the row projection
    pub csv_delimiter: char,
    /// Added/removed row styles
    pub styles: DiffStyles,
    /// Root for working directories; the system temp dir when `None`
    pub work_dir: Option<PathBuf>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            output_file_path: None,
            csv_delimiter: DEFAULT_DELIMITER,
            styles: DiffStyles::default(),
            work_dir: None,
        }
    }
}

impl DiffConfig {
    /// Create a default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable verbose hunk logging
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Write the output to an explicit path
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file_path = Some(path.into());
        self
    }

    /// Use a different cell delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Use different diff styles
    #[must_use]
    pub fn with_styles(mut self, styles: DiffStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Create working directories under `path`
    #[must_use]
    pub fn with_work_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(path.into());
        self
    }

    /// Check that the configuration can be used
    ///
    /// # Errors
    /// Returns an error if the delimiter is a line break.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.csv_delimiter, '\n' | '\r') {
            return Err(Error::InvalidDelimiter(self.csv_delimiter));
        }
        Ok(())
    }

    /// Output path: the override, or `<origin-stem>__diff__<modified-stem><origin-ext>`
    /// next to the origin file
    ///
    /// # Errors
    /// Returns an error if either input path has no file name.
    pub fn output_path(&self, origin: &Path, modified: &Path) -> Result<PathBuf> {
        if let Some(path) = &self.output_file_path {
            return Ok(path.clone());
        }

        let origin_stem = file_stem(origin)?;
        let modified_stem = file_stem(modified)?;
        let ext = origin
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let name = format!("{origin_stem}{OUTPUT_NAME_SEPARATOR}{modified_stem}{ext}");

        Ok(origin
            .parent()
            .map_or_else(|| PathBuf::from(&name), |dir| dir.join(&name)))
    }

    /// Root directory for working directories
    #[must_use]
    pub fn work_root(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

pub(crate) fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| Error::InvalidPath(format!("{} has no file name", path.display())))
}
