//! Error types for `odsdiff`

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline stage an error was raised in, used to give errors file context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Unzipping an input container.
    Extract,
    /// Reading and parsing `content.xml`.
    Parse,
    /// Copying the modified container into the output working directory.
    Prepare,
    /// Diffing and merging sheets.
    Compare,
    /// Writing the merged `content.xml`.
    Write,
    /// Zipping the output working directory.
    Package,
}

impl Stage {
    /// Get a human-readable description of this stage
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extract => "extracting",
            Self::Parse => "parsing",
            Self::Prepare => "preparing output",
            Self::Compare => "comparing",
            Self::Write => "writing",
            Self::Package => "packaging",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error type for `odsdiff` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Container Errors ====================
    /// The ZIP container could not be read or written.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A required entry is missing from an extracted container.
    #[error("missing container entry: {entry}")]
    MissingEntry {
        /// Path of the entry inside the container.
        entry: String,
    },

    // ==================== Document Structure Errors ====================
    /// The expected markup path is absent (malformed or unsupported ODS document).
    #[error("unsupported document structure: {path} not found")]
    Structure {
        /// The markup path that could not be resolved.
        path: String,
    },

    /// The two documents do not have the same number of sheets.
    #[error("sheet count mismatch: origin has {origin} sheet(s), modified has {modified}")]
    SheetCountMismatch {
        /// Number of sheets in the origin document.
        origin: usize,
        /// Number of sheets in the modified document.
        modified: usize,
    },

    /// A diff hunk addresses rows past the end of the sheet.
    #[error("hunk addresses row {row} but sheet '{sheet}' has {len} row(s)")]
    HunkOutOfRange {
        /// Sheet name.
        sheet: String,
        /// Row index the failing hunk starts at.
        row: usize,
        /// Number of rows in the sheet.
        len: usize,
    },

    /// The row delimiter cannot be used to serialize rows.
    #[error("invalid row delimiter: {0:?}")]
    InvalidDelimiter(char),

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// An element was closed without being opened, or never closed.
    #[error("XML parse error: unbalanced element <{name}>")]
    UnbalancedXml {
        /// Qualified name of the offending element.
        name: String,
    },

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    // ==================== Context ====================
    /// An error raised while processing a specific file at a specific stage.
    #[error("{stage} {}: {source}", path.display())]
    Stage {
        /// The stage that failed.
        stage: Stage,
        /// The file or directory being processed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the stage and file it occurred in.
    #[must_use]
    pub fn at(self, stage: Stage, path: impl Into<PathBuf>) -> Self {
        Error::Stage {
            stage,
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any [`Error::Stage`] context.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

// Add conversion from quick_xml::events::attributes::AttrError
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// Extension for attaching [`Stage`] context to results.
pub trait ResultExt<T> {
    /// Wrap the error, if any, with the stage and file it occurred in.
    fn at(self, stage: Stage, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn at(self, stage: Stage, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| e.into().at(stage, path))
    }
}

/// A specialized Result type for `odsdiff` operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_context_display() {
        let err = Error::Structure {
            path: "office:body".to_string(),
        }
        .at(Stage::Parse, "origin.ods");
        assert_eq!(
            err.to_string(),
            "parsing origin.ods: unsupported document structure: office:body not found"
        );
        assert!(matches!(err.root(), Error::Structure { .. }));
    }
}
