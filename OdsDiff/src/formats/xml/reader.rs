//! SPDX-FileCopyrightText: 2025 CyberDeco
//!
//! SPDX-License-Identifier: MIT
//!
//! XML file reading into a lossless tree

use super::document::{XmlDocument, XmlElement, XmlNode};
use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Read an XML file from disk
///
/// # Errors
/// Returns an error if the file cannot be read or has invalid XML.
pub fn read_xml<P: AsRef<Path>>(path: P) -> Result<XmlDocument> {
    let content = fs::read_to_string(path)?;
    parse_xml(&content)
}

/// Parse XML from a string, keeping whitespace and every non-element event
///
/// # Errors
/// Returns an error if the XML is malformed or an element is left unclosed.
pub fn parse_xml(content: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(false);

    let mut doc = XmlDocument::default();
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(XmlElement {
                    start: e.into_owned(),
                    children: Vec::new(),
                    self_closing: false,
                });
            }
            Ok(Event::Empty(e)) => {
                let element = XmlElement {
                    start: e.into_owned(),
                    children: Vec::new(),
                    self_closing: true,
                };
                attach(&mut stack, &mut doc, XmlNode::Element(element));
            }
            Ok(Event::End(e)) => {
                let Some(completed) = stack.pop() else {
                    return Err(Error::UnbalancedXml {
                        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    });
                };
                attach(&mut stack, &mut doc, XmlNode::Element(completed));
            }
            Ok(Event::Eof) => break,
            Ok(event) => attach(&mut stack, &mut doc, XmlNode::Event(event.into_owned())),
            Err(e) => return Err(Error::XmlError(e)),
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::UnbalancedXml {
            name: String::from_utf8_lossy(open.name()).into_owned(),
        });
    }

    Ok(doc)
}

fn attach(stack: &mut [XmlElement], doc: &mut XmlDocument, node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else {
        doc.nodes.push(node);
    }
}
