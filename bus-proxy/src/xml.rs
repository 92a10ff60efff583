//! Minimal XML element tree.
//!
//! Both the SOAP envelope and the dataset embedded in its result are small,
//! so they are read into an owned tree of elements keyed by local name
//! (namespace prefixes are dropped). Built on `quick-xml` events.

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};

/// Errors while reading a document into an [`Element`] tree.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("text outside the root element")]
    TextOutsideRoot,

    #[error("more than one root element")]
    MultipleRoots,

    #[error("unexpected end of input inside <{0}>")]
    UnexpectedEof(String),

    #[error("end tag without a matching start tag")]
    Unbalanced,

    #[error("document has no root element")]
    NoRoot,
}

/// An element with its attributes, child elements and concatenated text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name, without namespace prefix.
    pub name: String,
    /// Attributes by local name, namespace declarations excluded.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Unescaped text content, trimmed.
    pub text: String,
}

impl Element {
    /// Parse a whole document and return its root element.
    ///
    /// ```
    /// use bus_proxy::xml::Element;
    ///
    /// let root = Element::parse(r#"<s:Envelope xmlns:s="urn:x"><s:Body a="1">hi</s:Body></s:Envelope>"#).unwrap();
    /// assert_eq!(root.name, "Envelope");
    /// let body = root.child("Body").unwrap();
    /// assert_eq!(body.text, "hi");
    /// assert_eq!(body.attribute("a"), Some("1"));
    /// ```
    pub fn parse(input: &str) -> Result<Element, XmlError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Element::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or(XmlError::Unbalanced)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    push_text(&mut stack, &text)?;
                }
                Event::CData(data) => {
                    let data = data.into_inner();
                    push_text(&mut stack, &String::from_utf8_lossy(&data))?;
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctype.
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::UnexpectedEof(open.name));
        }
        root.ok_or(XmlError::NoRoot)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element, XmlError> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = attribute.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let name = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((name, value));
        }

        Ok(Element {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(XmlError::MultipleRoots),
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(open) => open.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => return Err(XmlError::TextOutsideRoot),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_elements_and_attributes() {
        let root = Element::parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <DS><D ln="10527" pt="1"><ebn>Bratislava</ebn></D><D/></DS>"#,
        )
        .unwrap();

        assert_eq!(root.name, "DS");
        let rows: Vec<_> = root.children_named("D").collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].attribute("ln"), Some("10527"));
        assert_eq!(rows[0].child("ebn").unwrap().text, "Bratislava");
        assert!(rows[1].children.is_empty());
    }

    #[test]
    fn prefixes_and_namespace_declarations_are_dropped() {
        let root = Element::parse(
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="urn:xsi"><soap:Body xsi:nil="false"/></soap:Envelope>"#,
        )
        .unwrap();

        assert_eq!(root.name, "Envelope");
        assert!(root.attributes.is_empty());
        assert_eq!(root.child("Body").unwrap().attribute("nil"), Some("false"));
    }

    #[test]
    fn entities_and_cdata_become_text() {
        let root = Element::parse("<r>&lt;DS&gt;<![CDATA[<x/>]]></r>").unwrap();
        assert_eq!(root.text, "<DS><x/>");
    }

    #[test]
    fn text_without_root_is_an_error() {
        let err = Element::parse("&lt;DS&gt;&lt;/DS&gt;").unwrap_err();
        assert!(matches!(err, XmlError::TextOutsideRoot));
    }

    #[test]
    fn structural_errors() {
        assert!(Element::parse("<a><b></b>").is_err());
        assert!(matches!(
            Element::parse("<a/><b/>").unwrap_err(),
            XmlError::MultipleRoots
        ));
        assert!(matches!(Element::parse("").unwrap_err(), XmlError::NoRoot));
        assert!(Element::parse("<a></b>").is_err());
    }
}
