//! Line diff over serialized sheets

use similar::{Algorithm, DiffTag, TextDiff};

use super::types::DiffHunk;

/// Compute the line hunks that turn `origin` into `modified`
///
/// Uses Myers' algorithm. A replaced span is reported as a `Removed` hunk
/// followed by an `Added` hunk.
#[must_use]
pub fn diff_lines(origin: &str, modified: &str) -> Vec<DiffHunk> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(origin, modified);
    let new_lines = diff.new_slices();

    let mut hunks = Vec::new();
    for op in diff.ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => hunks.push(DiffHunk::Unchanged(old_range.len())),
            DiffTag::Delete => hunks.push(DiffHunk::Removed(old_range.len())),
            DiffTag::Insert => hunks.push(DiffHunk::Added {
                count: new_range.len(),
                text: new_lines[new_range].concat(),
            }),
            DiffTag::Replace => {
                hunks.push(DiffHunk::Removed(old_range.len()));
                hunks.push(DiffHunk::Added {
                    count: new_range.len(),
                    text: new_lines[new_range].concat(),
                });
            }
        }
    }
    hunks
}

/// Apply hunks to the origin text
///
/// Returns `None` if the hunks do not consume exactly the lines of `origin`.
#[must_use]
pub fn patch(origin: &str, hunks: &[DiffHunk]) -> Option<String> {
    let mut lines = origin.split_inclusive('\n');
    let mut out = String::with_capacity(origin.len());

    for hunk in hunks {
        match hunk {
            DiffHunk::Unchanged(count) => {
                for _ in 0..*count {
                    out.push_str(lines.next()?);
                }
            }
            DiffHunk::Removed(count) => {
                for _ in 0..*count {
                    lines.next()?;
                }
            }
            DiffHunk::Added { text, .. } => out.push_str(text),
        }
    }

    if lines.next().is_some() {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ORIGIN: &str = "a;b\nc;d\ne;f\n";
    const MODIFIED: &str = "a;b\nX;Y\ne;f\n";

    #[test]
    fn test_replaced_line() {
        assert_eq!(
            diff_lines(ORIGIN, MODIFIED),
            vec![
                DiffHunk::Unchanged(1),
                DiffHunk::Removed(1),
                DiffHunk::Added {
                    count: 1,
                    text: "X;Y\n".to_string()
                },
                DiffHunk::Unchanged(1),
            ]
        );
    }

    #[test]
    fn test_identical_and_empty() {
        assert_eq!(diff_lines(ORIGIN, ORIGIN), vec![DiffHunk::Unchanged(3)]);
        assert!(diff_lines("", "").is_empty());
        assert_eq!(
            diff_lines("", "x\n"),
            vec![DiffHunk::Added {
                count: 1,
                text: "x\n".to_string()
            }]
        );
    }

    #[test]
    fn test_patch_round_trip() {
        let cases = [
            (ORIGIN, MODIFIED),
            ("1\n2\n3\n4\n", "0\n2\n4\n5\n6\n"),
            ("only\n", ""),
            ("a\nb", "a\nc\nd"),
        ];
        for (origin, modified) in cases {
            let hunks = diff_lines(origin, modified);
            assert_eq!(patch(origin, &hunks).as_deref(), Some(modified));

            let origin_lines: usize = hunks.iter().map(DiffHunk::origin_count).sum();
            assert_eq!(origin_lines, origin.lines().count());
        }
    }

    #[test]
    fn test_patch_rejects_mismatched_hunks() {
        assert_eq!(patch("a\n", &[DiffHunk::Unchanged(2)]), None);
        assert_eq!(patch("a\nb\n", &[DiffHunk::Removed(1)]), None);
    }

    #[test]
    fn test_deterministic() {
        let a = "x\ny\nz\nx\ny\n";
        let b = "y\nx\nz\ny\nx\n";
        assert_eq!(diff_lines(a, b), diff_lines(a, b));
    }
}
