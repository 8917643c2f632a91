//! ODS container handling
//!
//! An ODS file is a zip archive. Inputs are extracted into scoped working
//! directories, and the output is zipped back with the `mimetype` entry
//! first and stored uncompressed.

mod extract;
mod pack;
mod workdir;

pub use extract::{copy_dir, extract_container};
pub use pack::pack_container;
pub use workdir::WorkDir;

/// Entry holding the spreadsheet content
pub const CONTENT_XML: &str = "content.xml";

/// Entry holding the container media type
pub const MIMETYPE: &str = "mimetype";
