//! XML element tree
//!
//! An owned, ordered element representation shared by both construction
//! paths: components parsed from XML wrap the tree produced by
//! [`Element::parse`], and components built from raw data synthesize an
//! equivalent tree so the two paths converge on one representation.
//!
//! Attribute order is preserved because it is part of the canonical
//! serialization contract, and children keep document order.

use crate::error::{Error, Result};
use crate::names::require_valid_ncname;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::Writer;

/// A single XML attribute with its namespace binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace prefix, empty for unprefixed attributes
    pub prefix: String,
    /// Local name
    pub name: String,
    /// Namespace URI, empty for unprefixed attributes
    pub namespace: String,
    /// Attribute value
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(
        prefix: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
            namespace: namespace.into(),
            value: value.into(),
        }
    }

    /// The serialized name, `prefix:name` or bare `name`
    pub fn qualified_name(&self) -> String {
        if self.prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{}:{}", self.prefix, self.name)
        }
    }
}

/// An XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Namespace prefix, empty when none
    pub prefix: String,
    /// Local name
    pub name: String,
    /// Namespace URI
    pub namespace: String,
    /// Attributes, in document/insertion order
    pub attributes: Vec<Attribute>,
    /// Child elements, in document/insertion order
    pub children: Vec<Element>,
    /// Concatenated text content
    pub text: String,
}

impl Element {
    /// Create an empty element
    pub fn new(
        prefix: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
            namespace: namespace.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// Create an element with child text, skipping empty text
    pub fn with_text(
        prefix: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        text: &str,
    ) -> Self {
        let mut element = Element::new(prefix, name, namespace);
        if !text.trim().is_empty() {
            element.text = text.to_string();
        }
        element
    }

    /// Local name accessor
    pub fn local_name(&self) -> &str {
        &self.name
    }

    /// Namespace URI accessor
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Prefix accessor
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The qualified name, `prefix:name` or bare `name`
    pub fn qualified_name(&self) -> String {
        if self.prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{}:{}", self.prefix, self.name)
        }
    }

    /// Look up an attribute value by local name and namespace
    ///
    /// Returns an empty string when the attribute does not exist, matching
    /// how optional DDMS attributes are read everywhere in the crate.
    pub fn attribute_value(&self, name: &str, namespace: &str) -> &str {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.namespace == namespace)
            .map(|a| a.value.as_str())
            .unwrap_or("")
    }

    /// Add an attribute, silently skipping empty values
    pub fn set_attribute(
        &mut self,
        prefix: &str,
        name: &str,
        namespace: &str,
        value: &str,
    ) {
        if !value.trim().is_empty() {
            self.attributes
                .push(Attribute::new(prefix, name, namespace, value));
        }
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Add a text-only child element, silently skipping empty values
    pub fn add_text_child(&mut self, prefix: &str, name: &str, namespace: &str, text: &str) {
        if !text.trim().is_empty() {
            self.add_child(Element::with_text(prefix, name, namespace, text));
        }
    }

    /// First child element with the given local name and namespace
    pub fn first_child(&self, name: &str, namespace: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.name == name && c.namespace == namespace)
    }

    /// All child elements with the given local name and namespace
    pub fn children_named(&self, name: &str, namespace: &str) -> Vec<&Element> {
        self.children
            .iter()
            .filter(|c| c.name == name && c.namespace == namespace)
            .collect()
    }

    /// Number of children with the given local name and namespace
    pub fn child_count(&self, name: &str, namespace: &str) -> usize {
        self.children
            .iter()
            .filter(|c| c.name == name && c.namespace == namespace)
            .count()
    }

    /// Text of the first matching child element, empty when absent
    pub fn first_child_text(&self, name: &str, namespace: &str) -> &str {
        self.first_child(name, namespace)
            .map(|c| c.text.as_str())
            .unwrap_or("")
    }

    /// Parse a single XML document into an element tree
    ///
    /// This is the only place in the crate that touches raw XML bytes.
    /// Namespace prefixes are resolved against the declarations in scope.
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = NsReader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_resolved_event() {
                Ok((resolve, Event::Start(start))) => {
                    let namespace = resolved_namespace(resolve);
                    let element = read_element(&reader, namespace, &start)?;
                    stack.push(element);
                }
                Ok((_, Event::End(_))) => {
                    let finished = stack.pop().ok_or_else(|| {
                        Error::Xml("unbalanced element close".to_string())
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.add_child(finished),
                        None => root = Some(finished),
                    }
                }
                Ok((resolve, Event::Empty(start))) => {
                    let namespace = resolved_namespace(resolve);
                    let element = read_element(&reader, namespace, &start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.add_child(element),
                        None => root = Some(element),
                    }
                }
                Ok((_, Event::Text(text))) => {
                    if let Some(current) = stack.last_mut() {
                        let unescaped = text
                            .unescape()
                            .map_err(|e| Error::Xml(format!("bad text content: {}", e)))?;
                        current.text.push_str(&unescaped);
                    }
                }
                Ok((_, Event::Eof)) => break,
                Ok(_) => {} // comments, processing instructions, declarations
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        root.ok_or_else(|| Error::Xml("no root element found".to_string()))
    }

    /// Canonical XML serialization of this element tree
    ///
    /// Namespace declarations are emitted on the element that introduces
    /// them; attributes and children keep their stored order.
    pub fn to_xml(&self) -> String {
        let mut writer = Writer::new(Vec::new());
        let mut scope: Vec<(String, String)> = Vec::new();
        self.write(&mut writer, &mut scope)
            .expect("writing XML to an in-memory buffer cannot fail");
        String::from_utf8(writer.into_inner()).expect("serialized XML is valid UTF-8")
    }

    fn write(
        &self,
        writer: &mut Writer<Vec<u8>>,
        scope: &mut Vec<(String, String)>,
    ) -> quick_xml::Result<()> {
        let qualified = self.qualified_name();
        let mut start = BytesStart::new(qualified.as_str());

        let mut introduced = 0;
        declare_namespace(&self.prefix, &self.namespace, &mut start, scope, &mut introduced);
        for attribute in &self.attributes {
            declare_namespace(
                &attribute.prefix,
                &attribute.namespace,
                &mut start,
                scope,
                &mut introduced,
            );
        }
        for attribute in &self.attributes {
            start.push_attribute((
                attribute.qualified_name().as_str(),
                attribute.value.as_str(),
            ));
        }

        if self.children.is_empty() && self.text.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            if !self.text.is_empty() {
                writer.write_event(Event::Text(BytesText::new(&self.text)))?;
            }
            for child in &self.children {
                child.write(writer, scope)?;
            }
            writer.write_event(Event::End(BytesEnd::new(qualified.as_str())))?;
        }

        scope.truncate(scope.len() - introduced);
        Ok(())
    }
}

/// Emit an `xmlns` declaration on `start` if the binding is not yet in scope
fn declare_namespace(
    prefix: &str,
    namespace: &str,
    start: &mut BytesStart,
    scope: &mut Vec<(String, String)>,
    introduced: &mut usize,
) {
    if namespace.is_empty() {
        return;
    }
    let bound = scope
        .iter()
        .rev()
        .find(|(p, _)| p == prefix)
        .map(|(_, ns)| ns.as_str());
    if bound != Some(namespace) {
        let xmlns = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{}", prefix)
        };
        start.push_attribute((xmlns.as_str(), namespace));
        scope.push((prefix.to_string(), namespace.to_string()));
        *introduced += 1;
    }
}

/// Build an element (without children) from a start tag
///
/// The reader does not police name syntax, so element and attribute names
/// are checked against the NCName lexical rules here.
fn resolved_namespace(resolve: ResolveResult) -> String {
    match resolve {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).to_string(),
        _ => String::new(),
    }
}

fn read_element(
    reader: &NsReader<&[u8]>,
    namespace: String,
    start: &BytesStart,
) -> Result<Element> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).to_string();
    let prefix = start
        .name()
        .prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).to_string())
        .unwrap_or_default();
    require_valid_ncname(&name)?;
    if !prefix.is_empty() {
        require_valid_ncname(&prefix)?;
    }

    let mut element = Element::new(prefix, name, namespace);
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|e| Error::Xml(format!("bad attribute: {}", e)))?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolve, local) = reader.resolve_attribute(attribute.key);
        let attr_namespace = match resolve {
            ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).to_string(),
            _ => String::new(),
        };
        let attr_prefix = attribute
            .key
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).to_string())
            .unwrap_or_default();
        let value = attribute
            .unescape_value()
            .map_err(|e| Error::Xml(format!("bad attribute value: {}", e)))?
            .to_string();
        let attr_name = String::from_utf8_lossy(local.as_ref()).to_string();
        require_valid_ncname(&attr_name)?;
        if !attr_prefix.is_empty() {
            require_valid_ncname(&attr_prefix)?;
        }
        element.attributes.push(Attribute::new(
            attr_prefix,
            attr_name,
            attr_namespace,
            value,
        ));
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NS: &str = "http://metadata.dod.mil/mdr/ns/DDMS/3.1/";

    #[test]
    fn test_parse_resolves_namespaces() {
        let xml = format!(
            "<ddms:language xmlns:ddms=\"{}\" ddms:qualifier=\"q\" ddms:value=\"v\"/>",
            NS
        );
        let element = Element::parse(&xml).unwrap();
        assert_eq!(element.local_name(), "language");
        assert_eq!(element.namespace(), NS);
        assert_eq!(element.prefix(), "ddms");
        assert_eq!(element.attribute_value("qualifier", NS), "q");
        assert_eq!(element.attribute_value("value", NS), "v");
        assert_eq!(element.attribute_value("missing", NS), "");
    }

    #[test]
    fn test_parse_children_and_text() {
        let xml = format!(
            "<ddms:subjectCoverage xmlns:ddms=\"{0}\"><ddms:keyword/><ddms:title>A Title</ddms:title></ddms:subjectCoverage>",
            NS
        );
        let element = Element::parse(&xml).unwrap();
        assert_eq!(element.children.len(), 2);
        assert_eq!(element.child_count("keyword", NS), 1);
        assert_eq!(element.first_child_text("title", NS), "A Title");
        assert_eq!(element.first_child_text("missing", NS), "");
    }

    #[test]
    fn test_parse_rejects_bad_element_name() {
        let xml = format!("<ddms:1element xmlns:ddms=\"{}\"/>", NS);
        let err = Element::parse(&xml).unwrap_err();
        assert!(err.to_string().contains("\"1element\" is not a valid NCName."));
    }

    #[test]
    fn test_parse_rejects_bad_attribute_name() {
        let xml = format!(
            "<ddms:language xmlns:ddms=\"{}\" ddms:1qualifier=\"q\"/>",
            NS
        );
        let err = Element::parse(&xml).unwrap_err();
        assert!(err.to_string().contains("\"1qualifier\" is not a valid NCName."));
    }

    #[test]
    fn test_set_attribute_skips_empty() {
        let mut element = Element::new("ddms", "language", NS);
        element.set_attribute("ddms", "qualifier", NS, "");
        element.set_attribute("ddms", "value", NS, "en");
        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.attribute_value("value", NS), "en");
    }

    #[test]
    fn test_to_xml_round_trip() {
        let mut element = Element::new("ddms", "language", NS);
        element.set_attribute("ddms", "qualifier", NS, "http://example.com");
        element.set_attribute("ddms", "value", NS, "en");

        let xml = element.to_xml();
        assert_eq!(
            xml,
            format!(
                "<ddms:language xmlns:ddms=\"{}\" ddms:qualifier=\"http://example.com\" ddms:value=\"en\"/>",
                NS
            )
        );
        assert_eq!(Element::parse(&xml).unwrap(), element);
    }

    #[test]
    fn test_to_xml_declares_attribute_namespaces() {
        let mut element = Element::new("ddms", "security", NS);
        element.set_attribute("ism", "classification", "urn:us:gov:ic:ism", "U");
        let xml = element.to_xml();
        assert!(xml.contains("xmlns:ism=\"urn:us:gov:ic:ism\""));
        assert!(xml.contains("ism:classification=\"U\""));
    }

    #[test]
    fn test_to_xml_escapes_text() {
        let element = Element::with_text("ddms", "title", NS, "Fish & Chips");
        assert!(element.to_xml().contains("Fish &amp; Chips"));
        let parsed = Element::parse(&element.to_xml()).unwrap();
        assert_eq!(parsed.text, "Fish & Chips");
    }

    #[test]
    fn test_nested_namespace_not_redeclared() {
        let mut parent = Element::new("ddms", "resource", NS);
        parent.add_child(Element::with_text("ddms", "title", NS, "t"));
        let xml = parent.to_xml();
        assert_eq!(xml.matches("xmlns:ddms").count(), 1);
    }
}
