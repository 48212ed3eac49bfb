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

use crate::entry::{AsEntry, Entry};
use gdata_parsable::xml::append_escaped_with;
use gdata_parsable::{Element, Namespaces, ParseError, Parsable};
use serde_json::Value;

/// A comment left on another entry.
///
/// This is the canonical shape of an entry subtype: a wrapper owning an
/// [Entry] for the Atom core, delegating every parse and build hook to it
/// before handling its own extension elements. Service crates follow the
/// same pattern for their richer entry types.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comment {
    entry: Entry,
    in_reply_to: Option<String>,
}

impl Comment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The URI of the entry this comment replies to (`gd:in-reply-to`).
    pub fn in_reply_to(&self) -> Option<&str> {
        self.in_reply_to.as_deref()
    }

    pub fn set_in_reply_to(&mut self, uri: Option<&str>) {
        self.in_reply_to = uri.map(str::to_string);
        self.entry.clear_etag();
    }
}

impl AsEntry for Comment {
    fn entry(&self) -> &Entry {
        &self.entry
    }
    fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }
}

impl Parsable for Comment {
    fn element_name() -> &'static str {
        "entry"
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.entry.pre_parse_xml(root)
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        if self.entry.parse_xml_child(child)? {
            return Ok(true);
        }
        if child.matches("gd:in-reply-to") {
            self.in_reply_to = match child.attr_non_empty("href") {
                Some(href) => Some(href.to_string()),
                None => return Err(ParseError::missing_attribute(child, "href")),
            };
            return Ok(true);
        }
        Ok(false)
    }

    fn post_parse_xml(&mut self) -> Result<(), ParseError> {
        self.entry.post_parse_xml()
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        self.entry.build_xml_attributes(xml);
    }

    fn build_xml_content(&self, xml: &mut String) {
        self.entry.build_xml_content(xml);
        if let Some(uri) = &self.in_reply_to {
            append_escaped_with(xml, "<gd:in-reply-to href='", uri, "'/>");
        }
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        self.entry.add_namespaces(namespaces);
    }

    fn parse_json_pair(&mut self, key: &str, value: &Value) -> Result<bool, ParseError> {
        self.entry.parse_json_pair(key, value)
    }

    fn build_json(&self) -> Value {
        self.entry.build_json()
    }
}
