//! Container extraction

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Extract every entry of a zip container into `dest`
///
/// # Errors
/// Returns an error if the file is not a readable zip archive or an entry
/// cannot be written.
pub fn extract_container(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(BufReader::new(file))?;
    let entries = zip.len();
    zip.extract(dest)?;
    tracing::debug!(
        "Extracted {} entries from {} into {}",
        entries,
        archive.display(),
        dest.display()
    );
    Ok(())
}

/// Recursively copy the contents of `src` into `dest`
///
/// Returns the number of files copied.
///
/// # Errors
/// Returns an error if a directory cannot be read or a file cannot be copied.
pub fn copy_dir(src: &Path, dest: &Path) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::InvalidPath(e.to_string()))?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_extract_then_copy() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("a.ods");
        {
            let mut zip = zip::ZipWriter::new(File::create(&archive).unwrap());
            let options = SimpleFileOptions::default();
            zip.start_file("mimetype", options).unwrap();
            zip.write_all(b"application/vnd.oasis.opendocument.spreadsheet").unwrap();
            zip.start_file("META-INF/manifest.xml", options).unwrap();
            zip.write_all(b"<manifest/>").unwrap();
            zip.finish().unwrap();
        }

        let extracted = temp.path().join("extracted");
        extract_container(&archive, &extracted).unwrap();
        assert!(extracted.join("META-INF/manifest.xml").is_file());

        let copied = temp.path().join("copied");
        assert_eq!(copy_dir(&extracted, &copied).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(copied.join("mimetype")).unwrap(),
            "application/vnd.oasis.opendocument.spreadsheet"
        );
    }

    #[test]
    fn test_extract_rejects_non_zip() {
        let temp = tempfile::tempdir().unwrap();
        let bogus = temp.path().join("bogus.ods");
        fs::write(&bogus, "not a zip").unwrap();
        assert!(matches!(
            extract_container(&bogus, temp.path()),
            Err(Error::Zip(_))
        ));
    }
}
