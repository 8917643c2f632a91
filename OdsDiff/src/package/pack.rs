//! Container packaging

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use super::MIMETYPE;
use crate::error::{Error, Result};

/// Zip the files under `src` into an ODF container at `output`
///
/// `mimetype` is written first and stored; all other files follow in
/// name order, deflated. Returns the number of entries written. A partially
/// written `output` is removed on failure.
///
/// # Errors
/// Returns an error if a file cannot be read or the archive cannot be written.
pub fn pack_container(src: &Path, output: &Path) -> Result<usize> {
    let file = File::create(output)?;
    match write_container(src, file) {
        Ok(count) => {
            tracing::debug!("Packed {} entries into {}", count, output.display());
            Ok(count)
        }
        Err(e) => {
            if let Err(remove) = fs::remove_file(output) {
                tracing::warn!(
                    "Failed to remove partial output {}: {}",
                    output.display(),
                    remove
                );
            }
            Err(e)
        }
    }
}

fn write_container(src: &Path, file: File) -> Result<usize> {
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut count = 0;

    let mimetype = src.join(MIMETYPE);
    if mimetype.is_file() {
        zip.start_file(MIMETYPE, stored)?;
        zip.write_all(&fs::read(&mimetype)?)?;
        count += 1;
    } else {
        tracing::warn!("No {} entry in {}", MIMETYPE, src.display());
    }

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let name = entry_name(src, entry.path())?;
        if name == MIMETYPE {
            continue;
        }
        zip.start_file(name, deflated)?;
        io::copy(&mut File::open(entry.path())?, &mut zip)?;
        count += 1;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(count)
}

/// Archive entry name: the path relative to `root`, '/'-separated.
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|e| Error::InvalidPath(e.to_string()))?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
