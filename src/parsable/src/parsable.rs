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

use crate::error::ParseError;
use crate::xml::Element;
use serde_json::Value;
use std::collections::BTreeMap;

/// The set of namespace bindings a serialized tree needs at its root.
///
/// Prefixes are kept in a sorted map so the emitted declaration list is
/// stable across runs.
#[derive(Debug, Clone, Default)]
pub struct Namespaces {
    default: Option<String>,
    prefixes: BTreeMap<String, String>,
}

impl Namespaces {
    /// Sets the default (unprefixed) namespace of the document.
    pub fn set_default(&mut self, uri: &str) {
        self.default = Some(uri.to_string());
    }

    /// Binds `prefix` to `uri`. Re-binding an existing prefix is a no-op;
    /// within one document family a prefix always maps to the same URI.
    pub fn insert(&mut self, prefix: &str, uri: &str) {
        self.prefixes
            .entry(prefix.to_string())
            .or_insert_with(|| uri.to_string());
    }

    /// Appends the `xmlns` declarations to an opening tag under construction.
    pub fn write_declarations(&self, xml: &mut String) {
        if let Some(uri) = &self.default {
            xml.push_str(" xmlns='");
            crate::xml::append_escaped(xml, uri);
            xml.push('\'');
        }
        for (prefix, uri) in &self.prefixes {
            xml.push_str(" xmlns:");
            xml.push_str(prefix);
            xml.push_str("='");
            crate::xml::append_escaped(xml, uri);
            xml.push('\'');
        }
    }

    /// True when no bindings have been collected.
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.prefixes.is_empty()
    }
}

/// A value with a wire representation in the GData protocol family.
///
/// The framework creates instances through [Default], drives the parse
/// through the hooks below, and serializes by asking the value to append its
/// attributes and content to a buffer. Implementations override only the
/// hooks they need; every hook has a no-op default.
///
/// # Chaining
///
/// A type that wraps another parsable (a service-specific entry wrapping the
/// core entry fields, say) implements `parse_xml_child` by
/// first trying its own elements and then delegating to the inner value's
/// hook. The parse driver logs a `tracing` diagnostic for any element the
/// whole chain declined.
///
/// # Dialects
///
/// The XML hooks serve the Atom dialect; `parse_json_pair`/`build_json`
/// serve the Discovery-style JSON dialect. A type implements whichever
/// dialects its services speak.
pub trait Parsable: Default {
    /// The local element name, e.g. `thumbnail`.
    fn element_name() -> &'static str;

    /// The canonical namespace prefix, e.g. `media`, or `None` for elements
    /// in the default (Atom) namespace.
    fn element_prefix() -> Option<&'static str> {
        None
    }

    /// The MIME type of this value's serialized form, used for upload
    /// metadata parts.
    fn content_type() -> &'static str {
        "application/atom+xml"
    }

    /// Reads the root element's attributes (and, for text-only elements, its
    /// content). Runs before any child is visited so that attribute-level
    /// constraints can be checked first.
    fn pre_parse_xml(&mut self, _root: &Element) -> Result<(), ParseError> {
        Ok(())
    }

    /// Consumes one child element. Returns `Ok(true)` when the child was
    /// recognized, `Ok(false)` to let the chain (and finally the driver's
    /// diagnostic) handle it.
    fn parse_xml_child(&mut self, _child: &Element) -> Result<bool, ParseError> {
        Ok(false)
    }

    /// Validates required substructure after all children were consumed.
    fn post_parse_xml(&mut self) -> Result<(), ParseError> {
        Ok(())
    }

    /// Appends this value's XML attributes, each with a leading space.
    fn build_xml_attributes(&self, _xml: &mut String) {}

    /// Appends this value's child elements and text content.
    fn build_xml_content(&self, _xml: &mut String) {}

    /// Contributes the namespace bindings this value's serialized form uses.
    fn add_namespaces(&self, _namespaces: &mut Namespaces) {}

    /// Consumes one top-level JSON member. Same contract as
    /// [parse_xml_child][Self::parse_xml_child].
    fn parse_json_pair(&mut self, _key: &str, _value: &Value) -> Result<bool, ParseError> {
        Ok(false)
    }

    /// Validates required substructure after all members were consumed.
    fn post_parse_json(&mut self) -> Result<(), ParseError> {
        Ok(())
    }

    /// Builds the JSON representation of this value.
    fn build_json(&self) -> Value {
        Value::Object(Default::default())
    }
}

fn qualified_name<T: Parsable>() -> String {
    match T::element_prefix() {
        Some(prefix) => format!("{prefix}:{}", T::element_name()),
        None => T::element_name().to_string(),
    }
}

/// Parses a complete XML document into a `T`.
///
/// The root element must match `T`'s element name; a mismatch fails with
/// [ParseError::UnexpectedRoot] before any hook runs.
pub fn parse_xml<T: Parsable>(bytes: &[u8]) -> Result<T, ParseError> {
    let root = Element::from_bytes(bytes)?;
    let expected = qualified_name::<T>();
    // Accept the local name alone too: documents frequently bind the
    // element's namespace as the default one.
    if !root.matches(&expected) && root.local_name() != T::element_name() {
        return Err(ParseError::UnexpectedRoot {
            expected,
            found: root.name().to_string(),
        });
    }
    parse_xml_element(&root)
}

/// Parses an already-extracted element into a `T`, running the two-phase
/// hook sequence: `pre_parse_xml`, `parse_xml_child` per child,
/// `post_parse_xml`.
pub fn parse_xml_element<T: Parsable>(element: &Element) -> Result<T, ParseError> {
    let mut value = T::default();
    value.pre_parse_xml(element)?;
    for child in element.children() {
        if !value.parse_xml_child(child)? {
            tracing::debug!(element = child.name(), "unhandled element");
        }
    }
    value.post_parse_xml()?;
    Ok(value)
}

/// Serializes `value` as a complete document, with the namespace
/// declarations collected from the tree emitted on the root element.
pub fn to_xml<T: Parsable>(value: &T) -> String {
    let mut namespaces = Namespaces::default();
    value.add_namespaces(&mut namespaces);

    let name = qualified_name::<T>();
    let mut xml = String::with_capacity(256);
    xml.push('<');
    xml.push_str(&name);
    namespaces.write_declarations(&mut xml);
    value.build_xml_attributes(&mut xml);

    let mut content = String::new();
    value.build_xml_content(&mut content);
    if content.is_empty() {
        xml.push_str("/>");
    } else {
        xml.push('>');
        xml.push_str(&content);
        xml.push_str("</");
        xml.push_str(&name);
        xml.push('>');
    }
    xml
}

/// Serializes `value` as a child element, without namespace declarations.
pub fn build_xml<T: Parsable>(value: &T, xml: &mut String) {
    let name = qualified_name::<T>();
    xml.push('<');
    xml.push_str(&name);
    value.build_xml_attributes(xml);

    let mut content = String::new();
    value.build_xml_content(&mut content);
    if content.is_empty() {
        xml.push_str("/>");
    } else {
        xml.push('>');
        xml.push_str(&content);
        xml.push_str("</");
        xml.push_str(&name);
        xml.push('>');
    }
}

/// Parses a JSON document into a `T`. The top level must be an object; each
/// member is offered to `parse_json_pair` in turn.
pub fn parse_json<T: Parsable>(bytes: &[u8]) -> Result<T, ParseError> {
    let value: Value = serde_json::from_slice(bytes)?;
    parse_json_value(&value)
}

/// Parses an already-deserialized JSON object into a `T`.
pub fn parse_json_value<T: Parsable>(value: &Value) -> Result<T, ParseError> {
    let object = value.as_object().ok_or(ParseError::InvalidJsonRoot)?;
    let mut parsed = T::default();
    for (key, member) in object {
        if !parsed.parse_json_pair(key, member)? {
            tracing::debug!(member = key.as_str(), "unhandled member");
        }
    }
    parsed.post_parse_json()?;
    Ok(parsed)
}

/// Serializes `value`'s JSON representation as a string.
pub fn to_json<T: Parsable>(value: &T) -> String {
    value.build_json().to_string()
}
