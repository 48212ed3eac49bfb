// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An owned XML element tree.
//!
//! The two-phase parse contract needs random access to a root element's
//! attributes before its children are visited, and some elements (calendar
//! links, for example) constrain attributes against each other. An owned
//! tree built in a single pass over the [quick_xml] event stream keeps the
//! hook API simple and keeps every extracted string an owned copy.

use crate::error::ParseError;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

/// A single XML element: qualified name, attributes in document order,
/// child elements, and concatenated text content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Parses a complete document into its root element.
    ///
    /// Comments, processing instructions, and the XML declaration are
    /// skipped. Text content is entity-unescaped and whitespace-trimmed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Element, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::with_capacity(1024);
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    stack.push(Element::from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let element = Element::from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = t
                            .unescape()
                            .map_err(|e| ParseError::InvalidXml(e.to_string()))?;
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&utf8(t.as_ref())?);
                    }
                }
                Ok(Event::End(_)) => {
                    let element = match stack.pop() {
                        Some(e) => e,
                        None => return Err(ParseError::InvalidXml("unmatched end tag".into())),
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(ParseError::InvalidXml(e.to_string())),
            }
            buf.clear();
        }

        Err(ParseError::EmptyDocument)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element, ParseError> {
        let name = utf8(start.name().as_ref())?;
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::InvalidXml(e.to_string()))?;
            let key = utf8(attr.key.as_ref())?;
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::InvalidXml(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// The qualified element name, e.g. `media:thumbnail` or `title`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The local part of the element name.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// The namespace prefix, if the name carries one.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// True when the qualified name equals `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name
    }

    /// Looks up an attribute by qualified name.
    ///
    /// Namespace declarations (`xmlns`, `xmlns:*`) are stored alongside
    /// ordinary attributes and can be looked up the same way.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Like [attr][Self::attr], but treats an empty value as absent.
    pub fn attr_non_empty(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.is_empty())
    }

    /// The concatenated, unescaped text content of this element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns the first child with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.matches(name))
    }
}

fn utf8(bytes: &[u8]) -> Result<String, ParseError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| ParseError::InvalidXml("invalid UTF-8 in document".to_string()))
}

/// Appends `value` to `xml` with the predefined entities escaped.
pub fn append_escaped(xml: &mut String, value: &str) {
    xml.push_str(&escape(value));
}

/// Appends an escaped attribute, `{prefix}{value}{suffix}`, to `xml`.
///
/// The prefix/suffix split mirrors how serializer hooks assemble attribute
/// lists: `append_escaped_with(xml, " rel='", rel, "'")`.
pub fn append_escaped_with(xml: &mut String, prefix: &str, value: &str, suffix: &str) {
    xml.push_str(prefix);
    append_escaped(xml, value);
    xml.push_str(suffix);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_tree() -> anyhow::Result<()> {
        let xml = br#"<feed><title type="text">Hello &amp; goodbye</title><entry id="1"/></feed>"#;
        let root = Element::from_bytes(xml)?;
        assert_eq!(root.name(), "feed");
        assert_eq!(root.children().len(), 2);
        let title = root.child("title").unwrap();
        assert_eq!(title.attr("type"), Some("text"));
        assert_eq!(title.text(), "Hello & goodbye");
        let entry = root.child("entry").unwrap();
        assert_eq!(entry.attr("id"), Some("1"));
        Ok(())
    }

    #[test]
    fn parse_prefixed_names() -> anyhow::Result<()> {
        let xml = br#"<media:group xmlns:media="http://search.yahoo.com/mrss/">
            <media:title>T</media:title>
        </media:group>"#;
        let root = Element::from_bytes(xml)?;
        assert_eq!(root.name(), "media:group");
        assert_eq!(root.local_name(), "group");
        assert_eq!(root.prefix(), Some("media"));
        assert!(root.child("media:title").is_some());
        Ok(())
    }

    #[test]
    fn attribute_values_are_unescaped() -> anyhow::Result<()> {
        let xml = br#"<link href="http://example.com/?a=1&amp;b=2"/>"#;
        let root = Element::from_bytes(xml)?;
        assert_eq!(root.attr("href"), Some("http://example.com/?a=1&b=2"));
        Ok(())
    }

    #[test]
    fn character_references_resolve() -> anyhow::Result<()> {
        let root = Element::from_bytes(b"<t>a&#65;&#x42;c</t>")?;
        assert_eq!(root.text(), "aABc");
        Ok(())
    }

    #[test]
    fn unknown_entities_are_an_error() {
        let err = Element::from_bytes(b"<t>&unknown;</t>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidXml(_)), "{err:?}");
    }

    #[test]
    fn empty_document_is_an_error() {
        let err = Element::from_bytes(b"   ").unwrap_err();
        assert!(matches!(err, ParseError::EmptyDocument), "{err:?}");
    }

    #[test]
    fn escape_round_trip() -> anyhow::Result<()> {
        let raw = r#"<a href="x">&'</a>"#;
        let mut xml = String::from("<t>");
        append_escaped(&mut xml, raw);
        xml.push_str("</t>");
        let root = Element::from_bytes(xml.as_bytes())?;
        assert_eq!(root.text(), raw);
        Ok(())
    }
}
