//! In-memory XML tree and read-only traversal helpers.
//!
//! The extraction passes walk the same document several times, looking up
//! children by tag and discriminator, so the whole document is parsed once
//! into an [`XmlNode`] tree up front and every pass traverses that.
//!
//! All helpers are pure reads and signal absence with `None` or an empty
//! iterator, never an error. Whether a missing node or attribute is fatal
//! is the caller's decision.

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ExtractError;

/// Element type discriminator carried in the `xmi:type` attribute.
///
/// Only the kinds the extraction passes dispatch on are distinguished;
/// everything else collapses to [`XmiType::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XmiType {
    Package,
    Class,
    Property,
    Comment,
    Other,
}

impl XmiType {
    /// Parse from an `xmi:type` value, stripping a namespace prefix
    /// (`uml:Package` and `Package` both map to [`XmiType::Package`]).
    pub fn from_discriminator(value: &str) -> Self {
        let type_name = value.rsplit(':').next().unwrap_or(value);
        match type_name {
            "Package" => Self::Package,
            "Class" => Self::Class,
            "Property" => Self::Property,
            "Comment" => Self::Comment,
            _ => Self::Other,
        }
    }
}

/// A single element of the parsed document tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XmlNode {
    /// Tag name as written, prefix included (`packagedElement`, `xmi:Extension`).
    pub tag: String,
    attributes: IndexMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Attribute value by name, or `None` if absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The element's own text content, whitespace-trimmed during parsing.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The element's `xmi:id`.
    pub fn id(&self) -> Option<&str> {
        self.attr("xmi:id")
    }

    /// The element's `xmi:idref` back-reference.
    pub fn id_ref(&self) -> Option<&str> {
        self.attr("xmi:idref")
    }

    /// The element's `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// The element's type discriminator, [`XmiType::Other`] when absent.
    pub fn xmi_type(&self) -> XmiType {
        self.attr("xmi:type")
            .map(XmiType::from_discriminator)
            .unwrap_or(XmiType::Other)
    }

    /// Inline text body of the element: the `body` attribute when present
    /// (the layout EA exports for comments), else the element's own text.
    pub fn body(&self) -> Option<&str> {
        match self.attr("body") {
            Some(body) => Some(body),
            None if !self.text.is_empty() => Some(&self.text),
            None => None,
        }
    }

    /// Direct children with the given tag, in document order.
    pub fn children_with_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Direct children with the given tag and type discriminator.
    pub fn children_with_tag_and_type<'a>(
        &'a self,
        tag: &'a str,
        xmi_type: XmiType,
    ) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children_with_tag(tag)
            .filter(move |c| c.xmi_type() == xmi_type)
    }

    /// First direct child with the given tag.
    pub fn first_child_with_tag(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All descendants with the given tag, depth-first in document order.
    pub fn descendants_with_tag<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = &'a XmlNode> + 'a {
        let mut stack: Vec<&XmlNode> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                stack.extend(node.children.iter().rev());
                if node.tag == tag {
                    return Some(node);
                }
            }
            None
        })
    }
}

/// Parse a document into its root element.
pub fn parse(input: &[u8]) -> Result<XmlNode, ExtractError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    // Index 0 is a synthetic holder for the document root; it is never popped.
    let mut stack: Vec<XmlNode> = vec![XmlNode::with_tag("")];

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(node_from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let node = node_from_start(e)?;
                attach_child(&mut stack, node);
            }
            Ok(Event::End(_)) => match stack.pop() {
                Some(node) if !stack.is_empty() => attach_child(&mut stack, node),
                _ => return Err(ExtractError::xml("unexpected closing tag")),
            },
            Ok(Event::Text(ref t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::xml(format!("Text error: {e}")))?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(ref t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(t));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(ExtractError::xml("unclosed element at end of document"));
    }
    let mut holder = stack.swap_remove(0);
    match holder.children.len() {
        1 => Ok(holder.children.swap_remove(0)),
        0 => Err(ExtractError::xml("document has no root element")),
        _ => Err(ExtractError::xml("document has multiple root elements")),
    }
}

fn attach_child(stack: &mut [XmlNode], node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn node_from_start(e: &BytesStart<'_>) -> Result<XmlNode, ExtractError> {
    let tag = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| ExtractError::xml(format!("Invalid tag name: {e}")))?
        .to_string();
    let mut node = XmlNode::with_tag(tag);

    for attr_result in e.attributes() {
        let attr =
            attr_result.map_err(|e| ExtractError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ExtractError::xml(format!("Attribute key error: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| ExtractError::xml(format!("Attribute value error: {e}")))?;
        node.attributes.insert(key.to_string(), value.into_owned());
    }

    Ok(node)
}
