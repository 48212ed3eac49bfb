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

use crate::author::Author;
use crate::category::Category;
use crate::link::{Link, REL_EDIT, REL_SELF};
use chrono::{DateTime, Utc};
use gdata_parsable::parser::{ParseOptions, format_iso8601, parse_iso8601, string_from_element,
    time_from_element};
use gdata_parsable::xml::append_escaped_with;
use gdata_parsable::{
    APP_NAMESPACE, ATOM_NAMESPACE, Element, GD_NAMESPACE, Namespaces, ParseError, Parsable,
    build_xml,
};
use serde_json::Value;

/// A single addressable resource in a feed: one video, one photo, one
/// contact.
///
/// An entry fresh from a parse carries the server's ETag; any mutation
/// through the public setters clears it, so a stale conditional-fetch or
/// conditional-update token can never be replayed against modified state.
///
/// Service-specific entry types wrap an `Entry` and delegate the Atom core
/// elements to it through [AsEntry]; see [Comment][crate::Comment] for the
/// pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    rights: Option<String>,
    content: Option<String>,
    content_uri: Option<String>,
    etag: Option<String>,
    updated: Option<DateTime<Utc>>,
    published: Option<DateTime<Utc>>,
    edited: Option<DateTime<Utc>>,
    authors: Vec<Author>,
    categories: Vec<Category>,
    links: Vec<Link>,
}

impl Entry {
    /// Creates an empty local entry, ready for [insert].
    ///
    /// [insert]: https://developers.google.com/gdata/docs/2.0/basics
    pub fn new() -> Self {
        Self::default()
    }

    /// The server-assigned, opaque, stable identifier. `None` for entries
    /// created locally and not yet inserted.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn rights(&self) -> Option<&str> {
        self.rights.as_deref()
    }

    /// Inline content. Mutually exclusive with [content_uri][Self::content_uri].
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Out-of-line content location (the `content@src` attribute).
    pub fn content_uri(&self) -> Option<&str> {
        self.content_uri.as_deref()
    }

    /// The ETag identifying the server-observed state this entry was parsed
    /// from, or `None` after any local mutation.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// The server's last-modification time.
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published
    }

    /// The client-observable modification time (`app:edited`), distinct
    /// from [updated][Self::updated].
    pub fn edited(&self) -> Option<DateTime<Utc>> {
        self.edited
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Returns the first link with the given relation.
    pub fn lookup_link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.rel() == rel)
    }

    /// The entry's `rel=self` link, pointing back at the entry itself.
    pub fn self_link(&self) -> Option<&Link> {
        self.lookup_link(REL_SELF)
    }

    /// The entry's `rel=edit` link, the target of updates and deletes.
    pub fn edit_link(&self) -> Option<&Link> {
        self.lookup_link(REL_EDIT)
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
        self.etag = None;
    }

    pub fn set_summary(&mut self, summary: Option<&str>) {
        self.summary = summary.map(str::to_string);
        self.etag = None;
    }

    pub fn set_rights(&mut self, rights: Option<&str>) {
        self.rights = rights.map(str::to_string);
        self.etag = None;
    }

    /// Sets inline content, clearing any content URI.
    pub fn set_content(&mut self, content: Option<&str>) {
        self.content = content.map(str::to_string);
        self.content_uri = None;
        self.etag = None;
    }

    /// Sets the out-of-line content location, clearing any inline content.
    pub fn set_content_uri(&mut self, content_uri: Option<&str>) {
        self.content_uri = content_uri.map(str::to_string);
        self.content = None;
        self.etag = None;
    }

    pub fn add_author(&mut self, author: Author) {
        self.authors.push(author);
        self.etag = None;
    }

    pub fn add_category(&mut self, category: Category) {
        self.categories.push(category);
        self.etag = None;
    }

    /// Adds a link. At most one `rel=self` and one `rel=edit` link may be
    /// present; a second of either is rejected.
    pub fn add_link(&mut self, link: Link) -> Result<(), ParseError> {
        self.check_link_uniqueness(link.rel())?;
        self.links.push(link);
        self.etag = None;
        Ok(())
    }

    fn check_link_uniqueness(&self, rel: &str) -> Result<(), ParseError> {
        if (rel == REL_SELF || rel == REL_EDIT) && self.lookup_link(rel).is_some() {
            return Err(ParseError::DuplicateElement {
                element: format!("link[rel={rel}]"),
            });
        }
        Ok(())
    }

    /// Clears the stored ETag. Used by the service after a failed
    /// conditional operation.
    pub fn clear_etag(&mut self) {
        self.etag = None;
    }
}

/// Access to the Atom core of a service-specific entry type.
///
/// `Feed` and the service operations are generic over this trait, so any
/// wrapper that exposes its inner [Entry] participates in parsing, pagination
/// bookkeeping, and conditional updates without further ceremony.
pub trait AsEntry: Parsable {
    fn entry(&self) -> &Entry;
    fn entry_mut(&mut self) -> &mut Entry;
}

impl AsEntry for Entry {
    fn entry(&self) -> &Entry {
        self
    }
    fn entry_mut(&mut self) -> &mut Entry {
        self
    }
}

impl Parsable for Entry {
    fn element_name() -> &'static str {
        "entry"
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.etag = root.attr_non_empty("gd:etag").map(str::to_string);
        Ok(())
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        if string_from_element(child, "id", ParseOptions::NO_DUPES, &mut self.id)?
            || string_from_element(child, "title", ParseOptions::DEFAULT, &mut self.title)?
            || string_from_element(child, "summary", ParseOptions::NONE, &mut self.summary)?
            || string_from_element(child, "rights", ParseOptions::NONE, &mut self.rights)?
            || time_from_element(child, "updated", ParseOptions::NO_DUPES, &mut self.updated)?
            || time_from_element(child, "published", ParseOptions::NO_DUPES, &mut self.published)?
            || time_from_element(child, "app:edited", ParseOptions::NO_DUPES, &mut self.edited)?
        {
            return Ok(true);
        }
        if child.matches("content") {
            match child.attr_non_empty("src") {
                Some(src) => self.content_uri = Some(src.to_string()),
                None => self.content = Some(child.text().to_string()),
            }
            return Ok(true);
        }
        if child.matches("author") {
            self.authors
                .push(gdata_parsable::parse_xml_element::<Author>(child)?);
            return Ok(true);
        }
        if child.matches("category") {
            self.categories
                .push(gdata_parsable::parse_xml_element::<Category>(child)?);
            return Ok(true);
        }
        if child.matches("link") {
            let link = gdata_parsable::parse_xml_element::<Link>(child)?;
            self.check_link_uniqueness(link.rel())?;
            self.links.push(link);
            return Ok(true);
        }
        Ok(false)
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        if let Some(etag) = &self.etag {
            append_escaped_with(xml, " gd:etag='", etag, "'");
        }
    }

    fn build_xml_content(&self, xml: &mut String) {
        append_escaped_with(xml, "<title type='text'>", self.title(), "</title>");
        if let Some(id) = &self.id {
            append_escaped_with(xml, "<id>", id, "</id>");
        }
        if let Some(updated) = self.updated {
            xml.push_str("<updated>");
            xml.push_str(&format_iso8601(updated));
            xml.push_str("</updated>");
        }
        if let Some(published) = self.published {
            xml.push_str("<published>");
            xml.push_str(&format_iso8601(published));
            xml.push_str("</published>");
        }
        if let Some(edited) = self.edited {
            xml.push_str("<app:edited>");
            xml.push_str(&format_iso8601(edited));
            xml.push_str("</app:edited>");
        }
        if let Some(summary) = &self.summary {
            append_escaped_with(xml, "<summary type='text'>", summary, "</summary>");
        }
        if let Some(rights) = &self.rights {
            append_escaped_with(xml, "<rights>", rights, "</rights>");
        }
        if let Some(content) = &self.content {
            append_escaped_with(xml, "<content type='text'>", content, "</content>");
        } else if let Some(content_uri) = &self.content_uri {
            append_escaped_with(xml, "<content src='", content_uri, "'/>");
        }
        for category in &self.categories {
            build_xml(category, xml);
        }
        for link in &self.links {
            build_xml(link, xml);
        }
        for author in &self.authors {
            build_xml(author, xml);
        }
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.set_default(ATOM_NAMESPACE);
        namespaces.insert("gd", GD_NAMESPACE);
        if self.edited.is_some() {
            namespaces.insert("app", APP_NAMESPACE);
        }
    }

    fn parse_json_pair(&mut self, key: &str, value: &Value) -> Result<bool, ParseError> {
        match key {
            "kind" => Ok(true),
            "id" => {
                self.id = value.as_str().map(str::to_string);
                Ok(true)
            }
            "etag" => {
                self.etag = value.as_str().map(str::to_string);
                Ok(true)
            }
            "title" => {
                self.title = value.as_str().map(str::to_string);
                Ok(true)
            }
            "updated" => {
                self.updated = value.as_str().and_then(parse_iso8601);
                Ok(true)
            }
            "selfLink" => {
                if let Some(href) = value.as_str() {
                    self.check_link_uniqueness(REL_SELF)?;
                    self.links.push(Link::new(href, REL_SELF));
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn build_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        if let Some(id) = &self.id {
            object.insert("id".to_string(), Value::String(id.clone()));
        }
        if let Some(etag) = &self.etag {
            object.insert("etag".to_string(), Value::String(etag.clone()));
        }
        if let Some(title) = &self.title {
            object.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(updated) = self.updated {
            object.insert(
                "updated".to_string(),
                Value::String(format_iso8601(updated)),
            );
        }
        if let Some(link) = self.self_link() {
            object.insert(
                "selfLink".to_string(),
                Value::String(link.href().to_string()),
            );
        }
        Value::Object(object)
    }
}
