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

//! Contacts extension elements (`gContact:` namespace).

use gdata_parsable::parser::{BoolDefault, boolean_from_attribute};
use gdata_parsable::xml::{append_escaped, append_escaped_with};
use gdata_parsable::{Element, Namespaces, ParseError, Parsable};

/// The Contacts extension namespace.
pub const GCONTACT_NAMESPACE: &str = "http://schemas.google.com/contact/2008";

/// A `gContact:jot` element: a free-form note about a contact, tagged with
/// the sphere of life it belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Jot {
    content: Option<String>,
    relation_type: Option<String>,
}

impl Jot {
    pub fn new(content: &str, relation_type: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            relation_type: Some(relation_type.to_string()),
        }
    }

    /// The note's text.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// The sphere the note belongs to: `home`, `work`, `other`, `keywords`
    /// or `user`.
    pub fn relation_type(&self) -> &str {
        self.relation_type.as_deref().unwrap_or_default()
    }
}

impl Parsable for Jot {
    fn element_name() -> &'static str {
        "jot"
    }

    fn element_prefix() -> Option<&'static str> {
        Some("gContact")
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.relation_type = match root.attr_non_empty("rel") {
            Some(rel) => Some(rel.to_string()),
            None => return Err(ParseError::missing_attribute(root, "rel")),
        };
        let content = root.text();
        self.content = (!content.is_empty()).then(|| content.to_string());
        Ok(())
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        append_escaped_with(xml, " rel='", self.relation_type(), "'");
    }

    fn build_xml_content(&self, xml: &mut String) {
        append_escaped(xml, self.content());
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.insert("gContact", GCONTACT_NAMESPACE);
    }
}

/// A `gContact:calendarLink` element: a calendar associated with a contact.
///
/// The calendar's kind is carried either by `rel` (a well-known kind:
/// `home`, `work`, `free-busy`) or by `label` (a user-defined name), never
/// both and never neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarLink {
    uri: Option<String>,
    relation_type: Option<String>,
    label: Option<String>,
    primary: bool,
}

impl CalendarLink {
    /// Creates a link with a well-known relation type.
    pub fn for_relation(uri: &str, relation_type: &str) -> Self {
        Self {
            uri: Some(uri.to_string()),
            relation_type: Some(relation_type.to_string()),
            ..Self::default()
        }
    }

    /// Creates a link with a user-defined label.
    pub fn for_label(uri: &str, label: &str) -> Self {
        Self {
            uri: Some(uri.to_string()),
            label: Some(label.to_string()),
            ..Self::default()
        }
    }

    pub fn uri(&self) -> &str {
        self.uri.as_deref().unwrap_or_default()
    }

    pub fn relation_type(&self) -> Option<&str> {
        self.relation_type.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Whether this is the contact's principal calendar.
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn set_primary(&mut self, primary: bool) {
        self.primary = primary;
    }
}

impl Parsable for CalendarLink {
    fn element_name() -> &'static str {
        "calendarLink"
    }

    fn element_prefix() -> Option<&'static str> {
        Some("gContact")
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.relation_type = root.attr_non_empty("rel").map(str::to_string);
        self.label = root.attr_non_empty("label").map(str::to_string);
        if self.relation_type.is_some() && self.label.is_some() {
            return Err(ParseError::mutually_exclusive(root, "rel", "label"));
        }
        if self.relation_type.is_none() && self.label.is_none() {
            return Err(ParseError::missing_attribute(root, "rel"));
        }
        self.uri = match root.attr_non_empty("href") {
            Some(href) => Some(href.to_string()),
            None => return Err(ParseError::missing_attribute(root, "href")),
        };
        self.primary = boolean_from_attribute(root, "primary", BoolDefault::False)?;
        Ok(())
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        append_escaped_with(xml, " href='", self.uri(), "'");
        if let Some(rel) = &self.relation_type {
            append_escaped_with(xml, " rel='", rel, "'");
        }
        if let Some(label) = &self.label {
            append_escaped_with(xml, " label='", label, "'");
        }
        if self.primary {
            xml.push_str(" primary='true'");
        }
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.insert("gContact", GCONTACT_NAMESPACE);
    }
}

/// A `gContact:website` element: a web site associated with a contact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Website {
    uri: Option<String>,
    relation_type: Option<String>,
    label: Option<String>,
    primary: bool,
}

impl Website {
    pub fn new(uri: &str, relation_type: &str) -> Self {
        Self {
            uri: Some(uri.to_string()),
            relation_type: Some(relation_type.to_string()),
            ..Self::default()
        }
    }

    pub fn uri(&self) -> &str {
        self.uri.as_deref().unwrap_or_default()
    }

    /// The site's kind: `home-page`, `blog`, `profile`, `home`, `work`,
    /// `other` or `ftp`.
    pub fn relation_type(&self) -> &str {
        self.relation_type.as_deref().unwrap_or_default()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn set_label(&mut self, label: Option<&str>) {
        self.label = label.map(str::to_string);
    }

    pub fn set_primary(&mut self, primary: bool) {
        self.primary = primary;
    }
}

impl Parsable for Website {
    fn element_name() -> &'static str {
        "website"
    }

    fn element_prefix() -> Option<&'static str> {
        Some("gContact")
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.uri = match root.attr_non_empty("href") {
            Some(href) => Some(href.to_string()),
            None => return Err(ParseError::missing_attribute(root, "href")),
        };
        self.relation_type = match root.attr_non_empty("rel") {
            Some(rel) => Some(rel.to_string()),
            None => return Err(ParseError::missing_attribute(root, "rel")),
        };
        self.label = root.attr_non_empty("label").map(str::to_string);
        self.primary = boolean_from_attribute(root, "primary", BoolDefault::False)?;
        Ok(())
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        append_escaped_with(xml, " href='", self.uri(), "'");
        append_escaped_with(xml, " rel='", self.relation_type(), "'");
        if let Some(label) = &self.label {
            append_escaped_with(xml, " label='", label, "'");
        }
        if self.primary {
            xml.push_str(" primary='true'");
        }
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.insert("gContact", GCONTACT_NAMESPACE);
    }
}
