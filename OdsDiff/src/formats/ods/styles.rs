//! Diff cell style registration

use super::names::{AUTOMATIC_STYLES, BODY, DOCUMENT_CONTENT};
use crate::config::{CellStyle, DiffStyles};
use crate::error::{Error, Result};
use crate::formats::xml::{XmlDocument, XmlElement, XmlNode};

const NAMESPACES: [(&str, &str); 2] = [
    ("xmlns:style", "urn:oasis:names:tc:opendocument:xmlns:style:1.0"),
    (
        "xmlns:fo",
        "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0",
    ),
];

pub(super) fn register(xml: &mut XmlDocument, styles: &DiffStyles) -> Result<()> {
    let root = xml
        .root_mut()
        .filter(|root| root.is(DOCUMENT_CONTENT))
        .ok_or_else(|| Error::Structure {
            path: DOCUMENT_CONTENT.to_string(),
        })?;

    for (key, uri) in NAMESPACES {
        if root.attribute(key)?.is_none() {
            root.set_attribute(key, uri)?;
        }
    }

    let index = match root.children.iter().position(|n| n.is_element(AUTOMATIC_STYLES)) {
        Some(index) => index,
        None => {
            let body = root
                .children
                .iter()
                .position(|n| n.is_element(BODY))
                .ok_or_else(|| Error::Structure {
                    path: format!("{DOCUMENT_CONTENT}/{BODY}"),
                })?;
            tracing::debug!("Creating {} before {}", AUTOMATIC_STYLES, BODY);
            root.children
                .insert(body, XmlNode::Element(XmlElement::new(AUTOMATIC_STYLES)));
            body
        }
    };

    let automatic = root.children[index]
        .as_element_mut()
        .ok_or_else(|| Error::Structure {
            path: format!("{DOCUMENT_CONTENT}/{AUTOMATIC_STYLES}"),
        })?;
    automatic.push(XmlNode::Element(cell_style(&styles.added)?));
    automatic.push(XmlNode::Element(cell_style(&styles.removed)?));
    Ok(())
}

fn cell_style(style: &CellStyle) -> Result<XmlElement> {
    let mut properties = XmlElement::new("style:table-cell-properties");
    properties.set_attribute("fo:background-color", &style.background_color)?;

    let mut element = XmlElement::new("style:style");
    element.set_attribute("style:name", &style.name)?;
    element.set_attribute("style:family", "table-cell")?;
    element.push(XmlNode::Element(properties));
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::xml::{parse_xml, serialize_xml};

    const ADDED: &str = concat!(
        r#"<style:style style:name="odsdiff_newline" style:family="table-cell">"#,
        r##"<style:table-cell-properties fo:background-color="#00ff66"/></style:style>"##
    );
    const REMOVED: &str = concat!(
        r#"<style:style style:name="odsdiff_removedline" style:family="table-cell">"#,
        r##"<style:table-cell-properties fo:background-color="#ff9999"/></style:style>"##
    );

    #[test]
    fn test_self_closing_styles_are_opened() {
        let mut xml = parse_xml(concat!(
            r#"<office:document-content xmlns:style="s" xmlns:fo="f">"#,
            "<office:automatic-styles/><office:body/></office:document-content>"
        ))
        .unwrap();
        register(&mut xml, &DiffStyles::default()).unwrap();
        assert_eq!(
            serialize_xml(&xml).unwrap(),
            format!(
                r#"<office:document-content xmlns:style="s" xmlns:fo="f"><office:automatic-styles>{ADDED}{REMOVED}</office:automatic-styles><office:body/></office:document-content>"#
            )
        );
    }

    #[test]
    fn test_styles_created_before_body_with_namespaces() {
        let mut xml = parse_xml("<office:document-content><office:body/></office:document-content>")
            .unwrap();
        register(&mut xml, &DiffStyles::default()).unwrap();

        let root = xml.root().unwrap();
        assert!(root.children[0].is_element(AUTOMATIC_STYLES));
        assert!(root.children[1].is_element(BODY));
        assert_eq!(
            root.attribute("xmlns:fo").unwrap().as_deref(),
            Some("urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0")
        );
        assert_eq!(root.child(AUTOMATIC_STYLES).unwrap().elements().count(), 2);
    }

    #[test]
    fn test_appends_after_existing_styles() {
        let mut xml = parse_xml(concat!(
            "<office:document-content><office:automatic-styles>",
            r#"<style:style style:name="ce1"/></office:automatic-styles><office:body/></office:document-content>"#
        ))
        .unwrap();
        register(&mut xml, &DiffStyles::default()).unwrap();
        let names: Vec<String> = xml
            .root()
            .unwrap()
            .child(AUTOMATIC_STYLES)
            .unwrap()
            .elements()
            .map(|el| el.attribute("style:name").unwrap().unwrap())
            .collect();
        assert_eq!(names, ["ce1", "odsdiff_newline", "odsdiff_removedline"]);
    }
}
