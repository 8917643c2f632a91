//! Generic XML tree (lossless) format module

mod document;
mod reader;
mod writer;

pub use document::{XmlDocument, XmlElement, XmlNode};
pub use reader::{read_xml, parse_xml};
pub use writer::{write_xml, serialize_xml};
