//! XML file writing
//!
//! Events are written back exactly as they were read; only elements whose
//! children or attributes were changed produce different bytes.

use super::document::{XmlDocument, XmlElement, XmlNode};
use crate::error::Result;
use quick_xml::Writer;
use quick_xml::events::Event;
use std::fs;
use std::path::Path;

/// Write an XML document to disk
///
/// # Errors
/// Returns an error if serialization or file writing fails.
pub fn write_xml<P: AsRef<Path>>(doc: &XmlDocument, path: P) -> Result<()> {
    let xml = serialize_xml(doc)?;
    fs::write(path, xml)?;
    Ok(())
}

/// Serialize an XML document to a string
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_xml(doc: &XmlDocument) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    for node in &doc.nodes {
        write_node(&mut writer, node)?;
    }
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<()> {
    match node {
        XmlNode::Element(element) => write_element(writer, element),
        XmlNode::Event(event) => {
            writer.write_event(event.clone())?;
            Ok(())
        }
    }
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<()> {
    if element.children.is_empty() && element.self_closing {
        writer.write_event(Event::Empty(element.start.borrow()))?;
        return Ok(());
    }

    writer.write_event(Event::Start(element.start.borrow()))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(element.start.to_end()))?;
    Ok(())
}
