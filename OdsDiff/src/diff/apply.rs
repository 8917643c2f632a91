//! Applying line hunks to a sheet's rows
//!
//! Removed rows are kept and tagged with the removed style; added rows are
//! rebuilt from their serialized line and inserted at the cursor. The merged
//! rows can then be rebased onto the modified sheet, so that everything but
//! the removed rows is written with the modified document's markup.

use super::rows::deserialize_line;
use super::types::DiffHunk;
use crate::config::DiffStyles;
use crate::error::{Error, Result};
use crate::formats::ods::{Row, RowMark, Sheet};

/// Row counts produced by [`apply_hunks`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Rows inserted
    pub added: usize,
    /// Rows tagged as removed
    pub removed: usize,
}

/// Apply hunks to `sheet` in a single pass
///
/// The hunks must come from diffing this sheet's own serialization.
/// Origin rows not reached by any hunk are kept unchanged at the end.
///
/// # Errors
/// Returns [`Error::HunkOutOfRange`] if the hunks address rows past the end
/// of the sheet. The sheet is not modified in that case.
pub fn apply_hunks(
    sheet: &mut Sheet,
    hunks: &[DiffHunk],
    styles: &DiffStyles,
    delimiter: char,
) -> Result<ApplyStats> {
    check_range(sheet, hunks)?;

    let column_count = sheet.column_count();
    let mut origin = std::mem::take(&mut sheet.rows).into_iter();
    let mut merged: Vec<Row> = Vec::with_capacity(origin.len());
    let mut stats = ApplyStats::default();

    for hunk in hunks {
        match hunk {
            DiffHunk::Unchanged(count) => {
                merged.extend(origin.by_ref().take(*count));
            }
            DiffHunk::Removed(count) => {
                for mut row in origin.by_ref().take(*count) {
                    row.tag(&styles.removed.name, column_count);
                    row.mark = RowMark::Removed;
                    merged.push(row);
                }
                stats.removed += count;
            }
            DiffHunk::Added { count, text } => {
                // Splitting on '\n' leaves an empty entry after the last newline
                for line in text.split('\n').take(*count) {
                    let mut row = deserialize_line(line, delimiter, column_count);
                    row.tag(&styles.added.name, column_count);
                    row.mark = RowMark::Added;
                    merged.push(row);
                    stats.added += 1;
                }
            }
        }
    }
    merged.extend(origin);

    tracing::debug!(
        "Applied {} hunk(s) to '{}': +{} -{}",
        hunks.len(),
        sheet.name,
        stats.added,
        stats.removed
    );
    sheet.rows = merged;
    Ok(stats)
}

/// Carry the modified sheet's markup over to the rows of `merged`
///
/// `merged` is the result of [`apply_hunks`] on the origin sheet. Its kept and
/// added rows pair up in order with the rows of `modified`, which hold the
/// same content, and are replaced by them so they reference the modified
/// document's styles. Added rows keep the added style. Removed rows drop the
/// origin markup and are rebuilt from their text.
///
/// # Errors
/// Returns [`Error::HunkOutOfRange`] if `merged` holds more kept and added
/// rows than `modified` has. `merged` is not modified in that case.
pub fn rebase_rows(merged: &mut Sheet, modified: Sheet, styles: &DiffStyles) -> Result<()> {
    let paired = merged
        .rows
        .iter()
        .filter(|row| row.mark != RowMark::Removed)
        .count();
    let len = modified.len();
    if paired > len {
        return Err(Error::HunkOutOfRange {
            sheet: modified.name,
            row: len,
            len,
        });
    }

    let column_count = merged.column_count();
    let mut counterparts = modified.rows.into_iter();
    for row in &mut merged.rows {
        if row.mark == RowMark::Removed {
            row.detach();
            continue;
        }
        if let Some(mut counterpart) = counterparts.next() {
            if row.mark == RowMark::Added {
                counterpart.tag(&styles.added.name, column_count);
                counterpart.mark = RowMark::Added;
            }
            *row = counterpart;
        }
    }
    merged.rows.extend(counterparts);
    Ok(())
}

fn check_range(sheet: &Sheet, hunks: &[DiffHunk]) -> Result<()> {
    let len = sheet.len();
    let mut cursor = 0;
    for hunk in hunks {
        let end = cursor + hunk.origin_count();
        if end > len {
            return Err(Error::HunkOutOfRange {
                sheet: sheet.name.clone(),
                row: cursor,
                len,
            });
        }
        cursor = end;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{diff_lines, serialize_sheet};
    use crate::formats::ods::Cell;
    use pretty_assertions::assert_eq;

    fn sheet(lines: &[&str]) -> Sheet {
        let rows = lines
            .iter()
            .map(|line| deserialize_line(line, ';', 2))
            .map(|row| Row {
                touched: false,
                ..row
            })
            .collect();
        Sheet::new("Sheet1", 2, rows)
    }

    fn styles_of(row: &Row) -> Vec<Option<&str>> {
        row.cells.iter().map(|c| c.style.as_deref()).collect()
    }

    #[test]
    fn test_replaced_row_is_marked_and_inserted() {
        let styles = DiffStyles::default();
        let mut origin = sheet(&["a;b", "c;d", "e;f"]);
        let modified = sheet(&["a;b", "X;Y", "e;f"]);
        let hunks = diff_lines(
            &serialize_sheet(&origin, ';'),
            &serialize_sheet(&modified, ';'),
        );

        let stats = apply_hunks(&mut origin, &hunks, &styles, ';').unwrap();
        assert_eq!(stats, ApplyStats { added: 1, removed: 1 });
        assert_eq!(serialize_sheet(&origin, ';'), "a;b\nc;d\nX;Y\ne;f\n");

        let removed = Some("odsdiff_removedline");
        let added = Some("odsdiff_newline");
        assert_eq!(styles_of(&origin.rows[0]), [None, None]);
        assert_eq!(styles_of(&origin.rows[1]), [removed, removed]);
        assert_eq!(styles_of(&origin.rows[2]), [added, added]);
        assert_eq!(styles_of(&origin.rows[3]), [None, None]);
        assert!(!origin.rows[0].touched);
        assert!(!origin.rows[3].touched);
    }

    #[test]
    fn test_final_row_count_is_origin_plus_added() {
        let styles = DiffStyles::default();
        let mut origin = sheet(&["1;1", "2;2", "3;3", "4;4"]);
        let modified = sheet(&["0;0", "2;2", "4;4", "5;5", "6;6"]);
        let hunks = diff_lines(
            &serialize_sheet(&origin, ';'),
            &serialize_sheet(&modified, ';'),
        );

        let stats = apply_hunks(&mut origin, &hunks, &styles, ';').unwrap();
        assert_eq!(origin.len(), 4 + stats.added);
        assert!(origin.rows.iter().all(|row| row.cells.len() == 2));
    }

    #[test]
    fn test_added_text_without_trailing_newline() {
        let styles = DiffStyles::default();
        let mut origin = sheet(&["a;b"]);
        let hunks = [
            DiffHunk::Unchanged(1),
            DiffHunk::Added {
                count: 2,
                text: "x;y;z\nw".to_string(),
            },
        ];

        let stats = apply_hunks(&mut origin, &hunks, &styles, ';').unwrap();
        assert_eq!(stats.added, 2);
        assert_eq!(serialize_sheet(&origin, ';'), "a;b\nx;y\nw;\n");
    }

    #[test]
    fn test_short_removed_row_is_padded() {
        let styles = DiffStyles::default();
        let mut origin = Sheet::new("S", 3, vec![Row::new(vec![Cell::new("only")])]);
        apply_hunks(&mut origin, &[DiffHunk::Removed(1)], &styles, ';').unwrap();
        assert_eq!(origin.rows[0].cells.len(), 3);
        assert!(
            origin.rows[0]
                .cells
                .iter()
                .all(|c| c.style.as_deref() == Some("odsdiff_removedline"))
        );
    }

    #[test]
    fn test_out_of_range_hunk_leaves_sheet_untouched() {
        let styles = DiffStyles::default();
        let mut origin = sheet(&["a;b"]);
        let before = origin.clone();
        let err = apply_hunks(
            &mut origin,
            &[DiffHunk::Unchanged(1), DiffHunk::Removed(1)],
            &styles,
            ';',
        )
        .unwrap_err();

        assert!(matches!(err, Error::HunkOutOfRange { row: 1, len: 1, .. }));
        assert_eq!(origin, before);

        let mut longer = sheet(&["a;b", "c;d", "e;f"]);
        let err = apply_hunks(
            &mut longer,
            &[DiffHunk::Unchanged(1), DiffHunk::Removed(5)],
            &styles,
            ';',
        )
        .unwrap_err();
        assert!(matches!(err, Error::HunkOutOfRange { row: 1, len: 3, .. }));
    }

    fn styled(lines: &[&str], style: &str) -> Sheet {
        let rows = lines
            .iter()
            .enumerate()
            .map(|(slot, line)| Row {
                cells: line
                    .split(';')
                    .map(|text| Cell::new(text).with_style(style))
                    .collect(),
                slot: Some(slot),
                touched: false,
                ..Row::default()
            })
            .collect();
        Sheet::new("Sheet1", 2, rows)
    }

    #[test]
    fn test_rebase_takes_modified_markup() {
        let styles = DiffStyles::default();
        let mut merged = styled(&["keep;1", "gone;2"], "ce9");
        let modified = styled(&["keep;1", "new;3"], "ce1");
        let hunks = diff_lines(
            &serialize_sheet(&merged, ';'),
            &serialize_sheet(&modified, ';'),
        );
        apply_hunks(&mut merged, &hunks, &styles, ';').unwrap();
        rebase_rows(&mut merged, modified, &styles).unwrap();

        assert_eq!(serialize_sheet(&merged, ';'), "keep;1\ngone;2\nnew;3\n");
        let removed = Some("odsdiff_removedline");
        let added = Some("odsdiff_newline");
        assert_eq!(styles_of(&merged.rows[0]), [Some("ce1"), Some("ce1")]);
        assert_eq!(styles_of(&merged.rows[1]), [removed, removed]);
        assert_eq!(styles_of(&merged.rows[2]), [added, added]);

        let slots: Vec<Option<usize>> = merged.rows.iter().map(|row| row.slot).collect();
        assert_eq!(slots, [Some(0), None, Some(1)]);
        assert!(!merged.rows[0].touched);
        assert!(merged.rows[1].source.is_none());
        assert!(merged.rows[1].cells.iter().all(|c| c.markup.is_none()));
    }

    #[test]
    fn test_rebase_keeps_cells_holding_the_delimiter() {
        let styles = DiffStyles::default();
        let mut merged = sheet(&["a;b"]);
        let mut modified = sheet(&["a;b"]);
        modified.rows.push(Row::new(vec![Cell::new("x;y"), Cell::new("z")]));

        let hunks = diff_lines(
            &serialize_sheet(&merged, ';'),
            &serialize_sheet(&modified, ';'),
        );
        apply_hunks(&mut merged, &hunks, &styles, ';').unwrap();
        assert_eq!(merged.rows[1].texts(2), ["x", "y"]);

        rebase_rows(&mut merged, modified, &styles).unwrap();
        assert_eq!(merged.rows[1].texts(2), ["x;y", "z"]);
    }

    #[test]
    fn test_rebase_rejects_short_modified_sheet() {
        let styles = DiffStyles::default();
        let mut merged = sheet(&["a;b", "c;d"]);
        let before = merged.clone();
        let err = rebase_rows(&mut merged, sheet(&["a;b"]), &styles).unwrap_err();
        assert!(matches!(err, Error::HunkOutOfRange { len: 1, .. }));
        assert_eq!(merged, before);
    }
}
