//! Lossless XML tree structures
//!
//! Elements keep their raw start tag; every other event (declarations, text,
//! comments, processing instructions) is kept verbatim so that a parsed
//! document serializes back to the same bytes.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;

use crate::error::Result;

/// A parsed XML document: the top-level nodes (prolog, root element, trailing misc).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlDocument {
    /// Top-level nodes in document order.
    pub nodes: Vec<XmlNode>,
}

/// A node in the XML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// An element with its children.
    Element(XmlElement),
    /// Any non-element event (text, comment, declaration, ...), kept as read.
    Event(Event<'static>),
}

/// An element in the XML tree.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Raw start tag (name and attributes).
    pub start: BytesStart<'static>,
    /// Child nodes.
    pub children: Vec<XmlNode>,
    /// Written as `<name/>` when it has no children.
    pub self_closing: bool,
}

impl XmlDocument {
    /// The root element, if any.
    #[must_use]
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(XmlNode::as_element)
    }

    /// Mutable access to the root element, if any.
    pub fn root_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(XmlNode::as_element_mut)
    }
}

impl XmlNode {
    /// This node as an element.
    #[must_use]
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            Self::Element(el) => Some(el),
            Self::Event(_) => None,
        }
    }

    /// This node as a mutable element.
    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            Self::Element(el) => Some(el),
            Self::Event(_) => None,
        }
    }

    /// Check whether this node is an element with the given qualified name.
    #[must_use]
    pub fn is_element(&self, name: &str) -> bool {
        self.as_element().is_some_and(|el| el.is(name))
    }
}

impl XmlElement {
    /// Creates a new, empty element with the given qualified name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        XmlElement {
            start: BytesStart::new(name.to_string()),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Qualified name as raw bytes.
    #[must_use]
    pub fn name(&self) -> &[u8] {
        self.start.name().into_inner()
    }

    /// Check whether this element has the given qualified name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name() == name.as_bytes()
    }

    /// Get an attribute value (unescaped).
    ///
    /// # Errors
    /// Returns an error if the attributes are malformed.
    pub fn attribute(&self, key: &str) -> Result<Option<String>> {
        match self.start.try_get_attribute(key)? {
            Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
            None => Ok(None),
        }
    }

    /// Set an attribute, replacing an existing value in place.
    ///
    /// # Errors
    /// Returns an error if the existing attributes are malformed.
    pub fn set_attribute(&mut self, key: &str, value: &str) -> Result<()> {
        let mut attrs = self.raw_attributes()?;
        let escaped = quick_xml::escape::escape(value).into_owned().into_bytes();
        match attrs.iter_mut().find(|(k, _)| k.as_slice() == key.as_bytes()) {
            Some((_, v)) => *v = escaped,
            None => attrs.push((key.as_bytes().to_vec(), escaped)),
        }
        self.replace_attributes(&attrs);
        Ok(())
    }

    /// Remove an attribute if present.
    ///
    /// # Errors
    /// Returns an error if the existing attributes are malformed.
    pub fn remove_attribute(&mut self, key: &str) -> Result<()> {
        let mut attrs = self.raw_attributes()?;
        let before = attrs.len();
        attrs.retain(|(k, _)| k.as_slice() != key.as_bytes());
        if attrs.len() != before {
            self.replace_attributes(&attrs);
        }
        Ok(())
    }

    /// Child elements, skipping non-element nodes.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// First child element with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.is(name))
    }

    /// First child element with the given name (mutable).
    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children
            .iter_mut()
            .filter_map(XmlNode::as_element_mut)
            .find(|el| el.is(name))
    }

    /// Append a child node.
    pub fn push(&mut self, node: XmlNode) {
        self.children.push(node);
        self.self_closing = false;
    }

    fn raw_attributes(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.start
            .attributes()
            .map(|attr| {
                let attr = attr?;
                // Attributes are rewritten double-quoted
                let value = if attr.value.contains(&b'"') {
                    attr.value
                        .iter()
                        .flat_map(|&b| if b == b'"' { b"&quot;".to_vec() } else { vec![b] })
                        .collect()
                } else {
                    attr.value.into_owned()
                };
                Ok((attr.key.as_ref().to_vec(), value))
            })
            .collect()
    }

    fn replace_attributes(&mut self, attrs: &[(Vec<u8>, Vec<u8>)]) {
        self.start.clear_attributes();
        for (key, value) in attrs {
            self.start.push_attribute(Attribute {
                key: QName(key),
                value: Cow::Borrowed(value),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut el = XmlElement::new("table:table-cell");
        el.set_attribute("table:style-name", "ce1").unwrap();
        el.set_attribute("office:value-type", "string").unwrap();
        el.set_attribute("table:style-name", "a&b").unwrap();

        let keys: Vec<Vec<u8>> = el
            .start
            .attributes()
            .map(|a| a.unwrap().key.as_ref().to_vec())
            .collect();
        assert_eq!(keys, vec![b"table:style-name".to_vec(), b"office:value-type".to_vec()]);
        assert_eq!(el.attribute("table:style-name").unwrap().as_deref(), Some("a&b"));
    }

    #[test]
    fn test_remove_attribute() {
        let mut el = XmlElement::new("table:table-row");
        el.set_attribute("table:number-rows-repeated", "3").unwrap();
        el.remove_attribute("table:number-rows-repeated").unwrap();
        assert_eq!(el.attribute("table:number-rows-repeated").unwrap(), None);
    }
}
