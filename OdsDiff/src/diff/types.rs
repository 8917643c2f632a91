//! Core types for diff operations
//!

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One span of a line diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffHunk {
    /// Lines present in both texts
    Unchanged(usize),
    /// Lines only present in the origin text
    Removed(usize),
    /// Lines only present in the modified text
    Added {
        /// Number of lines in `text`
        count: usize,
        /// The added lines, each terminated by a newline except possibly the last
        text: String,
    },
}

impl DiffHunk {
    /// Number of origin lines this hunk consumes
    #[must_use]
    pub fn origin_count(&self) -> usize {
        match self {
            Self::Unchanged(count) | Self::Removed(count) => *count,
            Self::Added { .. } => 0,
        }
    }
}

impl fmt::Display for DiffHunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged(count) => write!(f, "= {count} line(s)"),
            Self::Removed(count) => write!(f, "- {count} line(s)"),
            Self::Added { count, text } => {
                write!(f, "+ {count} line(s)")?;
                for line in text.lines() {
                    write!(f, "\n    {line}")?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for diff operations
pub type ProgressCallback<'a> = &'a (dyn Fn(&DiffProgress) + Sync + Send);

/// Progress information during a diff run
#[derive(Debug, Clone)]
pub struct DiffProgress {
    /// Current operation phase
    pub phase: DiffPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file or sheet being processed (if applicable)
    pub current_item: Option<String>,
}

impl DiffProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: DiffPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_item: None,
        }
    }

    /// Create a progress update with a file or sheet name
    #[must_use]
    pub fn with_item(
        phase: DiffPhase,
        current: usize,
        total: usize,
        item: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            current_item: Some(item.into()),
        }
    }
}

/// Phase of a diff run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffPhase {
    /// Unzipping both inputs
    Extracting,
    /// Parsing both `content.xml` files
    Parsing,
    /// Diffing and merging sheets
    Comparing,
    /// Writing the merged `content.xml`
    Writing,
    /// Zipping the output
    Packaging,
    /// Done
    Complete,
}

impl DiffPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extracting => "Extracting documents",
            Self::Parsing => "Parsing content",
            Self::Comparing => "Comparing sheets",
            Self::Writing => "Writing content",
            Self::Packaging => "Packaging output",
            Self::Complete => "Complete",
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Result of diffing one sheet pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    /// Sheet name (from the origin document)
    pub name: String,
    /// Rows in the origin sheet
    pub origin_rows: usize,
    /// Rows inserted as added
    pub added: usize,
    /// Rows tagged as removed
    pub removed: usize,
    /// Rows in the merged sheet
    pub final_rows: usize,
}

impl SheetReport {
    /// Check if the sheet has any added or removed rows
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

impl fmt::Display for SheetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.has_changes() { "~" } else { "=" };
        write!(
            f,
            "{marker} {}: +{} -{} ({} -> {} rows)",
            self.name, self.added, self.removed, self.origin_rows, self.final_rows
        )
    }
}

/// Result of a diff run
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffReport {
    /// Path of the written output file
    pub output: PathBuf,
    /// Per-sheet results in document order
    pub sheets: Vec<SheetReport>,
}

impl DiffReport {
    /// Check if there are no differences
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.sheets.iter().any(SheetReport::has_changes)
    }

    /// Total rows added across all sheets
    #[must_use]
    pub fn added(&self) -> usize {
        self.sheets.iter().map(|s| s.added).sum()
    }

    /// Total rows removed across all sheets
    #[must_use]
    pub fn removed(&self) -> usize {
        self.sheets.iter().map(|s| s.removed).sum()
    }

    /// Count sheets with changes
    #[must_use]
    pub fn sheets_changed(&self) -> usize {
        self.sheets.iter().filter(|s| s.has_changes()).count()
    }

    /// Get a summary string
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_empty() {
            "No differences".to_string()
        } else {
            format!(
                "{} added, {} removed row(s) in {} sheet(s)",
                self.added(),
                self.removed(),
                self.sheets_changed()
            )
        }
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sheet in &self.sheets {
            writeln!(f, "{sheet}")?;
        }
        writeln!(f, "\n{}", self.summary())?;
        write!(f, "Output: {}", self.output.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary() {
        let mut report = DiffReport {
            output: PathBuf::from("a__diff__b.ods"),
            sheets: vec![SheetReport {
                name: "Sheet1".to_string(),
                origin_rows: 3,
                final_rows: 3,
                ..SheetReport::default()
            }],
        };
        assert!(report.is_empty());
        assert_eq!(report.summary(), "No differences");

        report.sheets.push(SheetReport {
            name: "Sheet2".to_string(),
            origin_rows: 3,
            added: 2,
            removed: 1,
            final_rows: 5,
        });
        assert_eq!(report.summary(), "2 added, 1 removed row(s) in 1 sheet(s)");
        assert_eq!(report.sheets[1].to_string(), "~ Sheet2: +2 -1 (3 -> 5 rows)");
    }

    #[test]
    fn test_hunk_display() {
        let hunk = DiffHunk::Added {
            count: 2,
            text: "x;y\nz;w\n".to_string(),
        };
        assert_eq!(hunk.to_string(), "+ 2 line(s)\n    x;y\n    z;w");
        assert_eq!(hunk.origin_count(), 0);
        assert_eq!(DiffHunk::Removed(4).to_string(), "- 4 line(s)");
    }
}
