//! ODS file diffing
//!
//! Extracts both containers, diffs every sheet pair by position, writes the
//! merged rows into a copy of the modified document and repackages it. Rows
//! present in the modified file keep its markup; only removed rows are
//! rebuilt from their text.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::apply::{apply_hunks, rebase_rows};
use super::lines::diff_lines;
use super::rows::serialize_sheet;
use super::types::{DiffPhase, DiffProgress, DiffReport, ProgressCallback, SheetReport};
use crate::config::{DiffConfig, file_stem};
use crate::error::{Error, Result, ResultExt, Stage};
use crate::formats::ods::{OdsDocument, Sheet};
use crate::package::{CONTENT_XML, WorkDir, copy_dir, extract_container, pack_container};

/// Diff two ODS files and write the highlighted result
///
/// The output path comes from `config` (see [`DiffConfig::output_path`]).
///
/// # Errors
/// Returns an error if either file cannot be read, the sheet counts differ,
/// or the output cannot be written. No output file is left behind on error.
pub fn diff_files<P: AsRef<Path>>(origin: P, modified: P, config: &DiffConfig) -> Result<DiffReport> {
    diff_files_with_progress(origin, modified, config, &|_: &DiffProgress| {})
}

/// Diff two ODS files with progress callback
///
/// # Errors
/// Returns an error if either file cannot be read, the sheet counts differ,
/// or the output cannot be written. No output file is left behind on error.
pub fn diff_files_with_progress<P: AsRef<Path>>(
    origin: P,
    modified: P,
    config: &DiffConfig,
    progress: ProgressCallback,
) -> Result<DiffReport> {
    let origin = origin.as_ref();
    let modified = modified.as_ref();
    config.validate()?;
    let output = config.output_path(origin, modified)?;
    let root = config.work_root();

    tracing::info!(
        "Diffing {} against {} into {}",
        origin.display(),
        modified.display(),
        output.display()
    );

    // Step 1: Extract both containers
    progress(&DiffProgress::new(DiffPhase::Extracting, 0, 2));
    let (origin_dir, modified_dir) =
        rayon::join(|| unpack(origin, &root), || unpack(modified, &root));
    let origin_dir = origin_dir?;
    let modified_dir = modified_dir?;

    // Step 2: Parse both content.xml files
    progress(&DiffProgress::new(DiffPhase::Parsing, 0, 2));
    let (origin_doc, modified_doc) = rayon::join(
        || load(&origin_dir, origin),
        || load(&modified_dir, modified),
    );
    let origin_doc = origin_doc?;
    let mut modified_doc = modified_doc?;

    let origin_count = origin_doc.sheet_count().at(Stage::Parse, origin)?;
    let modified_count = modified_doc.sheet_count().at(Stage::Parse, modified)?;
    if origin_count != modified_count {
        return Err(Error::SheetCountMismatch {
            origin: origin_count,
            modified: modified_count,
        });
    }

    let origin_sheets = origin_doc.sheets().at(Stage::Parse, origin)?;
    let modified_sheets = modified_doc.sheets().at(Stage::Parse, modified)?;
    drop(origin_doc);

    // Step 3: Start the output from a copy of the modified container
    let output_dir = WorkDir::new(&root, &file_stem(&output)?).at(Stage::Prepare, &output)?;
    let copied = copy_dir(modified_dir.path(), output_dir.path()).at(Stage::Prepare, modified)?;
    tracing::debug!("Copied {} files into {}", copied, output_dir.path().display());

    // Step 4: Diff and merge every sheet pair
    let total = origin_sheets.len();
    let done = AtomicUsize::new(0);
    progress(&DiffProgress::new(DiffPhase::Comparing, 0, total));

    let merged: Vec<(Sheet, SheetReport)> = origin_sheets
        .into_par_iter()
        .zip(modified_sheets.into_par_iter())
        .enumerate()
        .map(|(index, (origin_sheet, modified_sheet))| -> Result<(Sheet, SheetReport)> {
            let result = merge_sheet(index, origin_sheet, modified_sheet, config)
                .at(Stage::Compare, origin)?;
            let current = done.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&DiffProgress::with_item(
                DiffPhase::Comparing,
                current,
                total,
                &result.1.name,
            ));
            Ok(result)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut report = DiffReport {
        output: output.clone(),
        sheets: Vec::with_capacity(total),
    };
    for (index, (sheet, sheet_report)) in merged.into_iter().enumerate() {
        modified_doc
            .replace_rows(index, &sheet)
            .at(Stage::Compare, modified)?;
        report.sheets.push(sheet_report);
    }
    modified_doc
        .register_diff_styles(&config.styles)
        .at(Stage::Compare, modified)?;

    // Step 5: Write content.xml and repackage
    progress(&DiffProgress::new(DiffPhase::Writing, 0, 1));
    modified_doc
        .write(output_dir.join(CONTENT_XML))
        .at(Stage::Write, &output)?;

    progress(&DiffProgress::new(DiffPhase::Packaging, 0, 1));
    let entries = pack_container(output_dir.path(), &output).at(Stage::Package, &output)?;

    progress(&DiffProgress::new(DiffPhase::Complete, 1, 1));
    tracing::info!(
        "Wrote {} ({} entries): {}",
        output.display(),
        entries,
        report.summary()
    );

    Ok(report)
}

/// Diff one sheet pair, apply the hunks to the origin sheet's rows and move
/// the result onto the modified sheet's markup.
fn merge_sheet(
    index: usize,
    origin: Sheet,
    modified: Sheet,
    config: &DiffConfig,
) -> Result<(Sheet, SheetReport)> {
    if origin.name != modified.name {
        tracing::warn!(
            "Sheet {} is named '{}' in origin but '{}' in modified, pairing by position",
            index + 1,
            origin.name,
            modified.name
        );
    }

    // Both sides are projected with the origin's column count
    let modified = Sheet::new(modified.name, origin.column_count(), modified.rows);
    let delimiter = config.csv_delimiter;
    let hunks = diff_lines(
        &serialize_sheet(&origin, delimiter),
        &serialize_sheet(&modified, delimiter),
    );

    if config.verbose {
        for hunk in &hunks {
            tracing::info!("[{}] {}", origin.name, hunk);
        }
    }

    let origin_rows = origin.len();
    let mut merged = origin;
    let stats = apply_hunks(&mut merged, &hunks, &config.styles, delimiter)?;
    rebase_rows(&mut merged, modified, &config.styles)?;

    let report = SheetReport {
        name: merged.name.clone(),
        origin_rows,
        added: stats.added,
        removed: stats.removed,
        final_rows: merged.len(),
    };
    tracing::debug!("{}", report);
    Ok((merged, report))
}

fn unpack(path: &Path, root: &Path) -> Result<WorkDir> {
    let dir = WorkDir::new(root, &file_stem(path)?).at(Stage::Extract, path)?;
    extract_container(path, dir.path()).at(Stage::Extract, path)?;
    Ok(dir)
}

fn load(dir: &WorkDir, source: &Path) -> Result<OdsDocument> {
    let content = dir.join(CONTENT_XML);
    if !content.is_file() {
        return Err(Error::MissingEntry {
            entry: CONTENT_XML.to_string(),
        }
        .at(Stage::Parse, source));
    }
    OdsDocument::read(&content).at(Stage::Parse, source)
}
