use std::fmt;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::data::{XmlDocument, XmlElement, XmlNode};
use crate::error::{FetchError, Result};

/// Parse an XML document into an owned element tree.
///
/// Whitespace-only text is dropped; other text keeps its surrounding
/// whitespace. Entities are unescaped and CDATA
/// sections become text nodes. Declarations, comments, processing
/// instructions and doctypes are skipped.
///
/// # Errors
///
/// [`FetchError::Parse`] for syntax errors, mismatched or unclosed tags,
/// text outside the root element, a missing root, or more than one root.
pub fn parse_xml(text: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(text);

    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => open.push(element(&start)?),
            Event::Empty(start) => {
                let element = element(&start)?;
                attach(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| xml_error("closing tag without an opening tag"))?;
                attach(&mut open, &mut root, element)?;
            }
            Event::Text(content) => {
                let content = content.unescape().map_err(xml_error)?;
                push_text(&mut open, &content)?;
            }
            Event::CData(content) => {
                let content = String::from_utf8_lossy(&content.into_inner()).into_owned();
                push_text(&mut open, &content)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(xml_error(format_args!("unclosed element <{}>", unclosed.name)));
    }
    root.map(|root| XmlDocument { root })
        .ok_or_else(|| xml_error("document has no root element"))
}

fn element(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(xml_error)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(open: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(xml_error("more than one root element"));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(open: &mut [XmlElement], content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Ok(());
    }
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(XmlNode::Text(content.to_string()));
            Ok(())
        }
        None => Err(xml_error("text outside the root element")),
    }
}

fn xml_error(message: impl fmt::Display) -> FetchError {
    FetchError::parse("XML", message)
}
