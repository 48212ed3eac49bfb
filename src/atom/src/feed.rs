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
use crate::entry::AsEntry;
use crate::generator::Generator;
use crate::link::{Link, REL_NEXT, REL_PREVIOUS};
use chrono::{DateTime, Utc};
use gdata_parsable::parser::{ParseOptions, parse_iso8601, string_from_element, time_from_element};
use gdata_parsable::{
    ATOM_NAMESPACE, Element, GD_NAMESPACE, Namespaces, OPENSEARCH_NAMESPACE, ParseError, Parsable,
    build_xml, parse_json_value, parse_xml_element,
};
use gdata_parsable::xml::append_escaped_with;
use serde_json::Value;

/// A page of entries plus feed-level metadata.
///
/// The type parameter is the concrete entry type the feed contains, so a
/// video feed yields video entries without downcasting. A feed is one page
/// of a result set, not the whole set: the OpenSearch counters and the
/// `next`/`previous` links describe where this page sits in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feed<E: AsEntry> {
    id: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    etag: Option<String>,
    updated: Option<DateTime<Utc>>,
    logo: Option<String>,
    icon: Option<String>,
    generator: Option<Generator>,
    authors: Vec<Author>,
    categories: Vec<Category>,
    links: Vec<Link>,
    entries: Vec<E>,
    total_results: Option<u32>,
    start_index: Option<u32>,
    items_per_page: Option<u32>,
    next_page_token: Option<String>,
}

impl<E: AsEntry> Feed<E> {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// The ETag identifying the feed state this page was parsed from.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn generator(&self) -> Option<&Generator> {
        self.generator.as_ref()
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

    /// The entries on this page, in document order.
    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<E> {
        self.entries
    }

    /// Returns the entry with the given identifier, if present on this page.
    pub fn lookup_entry(&self, id: &str) -> Option<&E> {
        self.entries
            .iter()
            .find(|entry| entry.entry().id() == Some(id))
    }

    /// Returns the first feed-level link with the given relation.
    pub fn lookup_link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.rel() == rel)
    }

    /// The URI of the next page of this result set, if the server offered
    /// one.
    pub fn next_page_uri(&self) -> Option<&str> {
        self.lookup_link(REL_NEXT).map(Link::href)
    }

    /// The URI of the previous page of this result set, if the server
    /// offered one.
    pub fn previous_page_uri(&self) -> Option<&str> {
        self.lookup_link(REL_PREVIOUS).map(Link::href)
    }

    /// The opaque continuation token of the next page, for token-paginated
    /// services.
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    /// The server's estimate of the total number of results across all
    /// pages. An estimate, not a promise.
    pub fn total_results(&self) -> Option<u32> {
        self.total_results
    }

    /// The one-based index of this page's first result.
    pub fn start_index(&self) -> Option<u32> {
        self.start_index
    }

    pub fn items_per_page(&self) -> Option<u32> {
        self.items_per_page
    }

    fn check_entry_uniqueness(&self, entry: &E) -> Result<(), ParseError> {
        if let Some(id) = entry.entry().id() {
            if self.lookup_entry(id).is_some() {
                return Err(ParseError::DuplicateElement {
                    element: format!("entry[id={id}]"),
                });
            }
        }
        Ok(())
    }

    fn parse_count(element: &Element, slot: &mut Option<u32>) -> Result<(), ParseError> {
        if slot.is_some() {
            return Err(ParseError::duplicate_element(element));
        }
        let text = element.text();
        *slot = Some(
            text.parse::<u32>()
                .map_err(|_| ParseError::unknown_value(element, "content", text))?,
        );
        Ok(())
    }
}

impl<E: AsEntry> Parsable for Feed<E> {
    fn element_name() -> &'static str {
        "feed"
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.etag = root.attr_non_empty("gd:etag").map(str::to_string);
        Ok(())
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        if string_from_element(child, "id", ParseOptions::NO_DUPES, &mut self.id)?
            || string_from_element(child, "title", ParseOptions::DEFAULT, &mut self.title)?
            || string_from_element(child, "subtitle", ParseOptions::NONE, &mut self.subtitle)?
            || string_from_element(child, "logo", ParseOptions::NO_DUPES, &mut self.logo)?
            || string_from_element(child, "icon", ParseOptions::NO_DUPES, &mut self.icon)?
            || time_from_element(child, "updated", ParseOptions::NO_DUPES, &mut self.updated)?
        {
            return Ok(true);
        }
        if child.matches("generator") {
            if self.generator.is_some() {
                return Err(ParseError::duplicate_element(child));
            }
            self.generator = Some(parse_xml_element::<Generator>(child)?);
            return Ok(true);
        }
        if child.matches("author") {
            self.authors.push(parse_xml_element::<Author>(child)?);
            return Ok(true);
        }
        if child.matches("category") {
            self.categories.push(parse_xml_element::<Category>(child)?);
            return Ok(true);
        }
        if child.matches("link") {
            self.links.push(parse_xml_element::<Link>(child)?);
            return Ok(true);
        }
        if child.matches("entry") {
            let entry = parse_xml_element::<E>(child)?;
            self.check_entry_uniqueness(&entry)?;
            self.entries.push(entry);
            return Ok(true);
        }
        if child.matches("openSearch:totalResults") {
            Self::parse_count(child, &mut self.total_results)?;
            return Ok(true);
        }
        if child.matches("openSearch:startIndex") {
            Self::parse_count(child, &mut self.start_index)?;
            return Ok(true);
        }
        if child.matches("openSearch:itemsPerPage") {
            Self::parse_count(child, &mut self.items_per_page)?;
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
        if let Some(subtitle) = &self.subtitle {
            append_escaped_with(xml, "<subtitle type='text'>", subtitle, "</subtitle>");
        }
        if let Some(updated) = self.updated {
            xml.push_str("<updated>");
            xml.push_str(&gdata_parsable::parser::format_iso8601(updated));
            xml.push_str("</updated>");
        }
        if let Some(logo) = &self.logo {
            append_escaped_with(xml, "<logo>", logo, "</logo>");
        }
        if let Some(icon) = &self.icon {
            append_escaped_with(xml, "<icon>", icon, "</icon>");
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
        if let Some(generator) = &self.generator {
            build_xml(generator, xml);
        }
        if let Some(total_results) = self.total_results {
            xml.push_str(&format!(
                "<openSearch:totalResults>{total_results}</openSearch:totalResults>"
            ));
        }
        if let Some(start_index) = self.start_index {
            xml.push_str(&format!(
                "<openSearch:startIndex>{start_index}</openSearch:startIndex>"
            ));
        }
        if let Some(items_per_page) = self.items_per_page {
            xml.push_str(&format!(
                "<openSearch:itemsPerPage>{items_per_page}</openSearch:itemsPerPage>"
            ));
        }
        for entry in &self.entries {
            build_xml(entry, xml);
        }
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.set_default(ATOM_NAMESPACE);
        namespaces.insert("gd", GD_NAMESPACE);
        namespaces.insert("openSearch", OPENSEARCH_NAMESPACE);
        for entry in &self.entries {
            entry.add_namespaces(namespaces);
        }
    }

    fn parse_json_pair(&mut self, key: &str, value: &Value) -> Result<bool, ParseError> {
        match key {
            "kind" => Ok(true),
            "etag" => {
                self.etag = value.as_str().map(str::to_string);
                Ok(true)
            }
            "updated" => {
                self.updated = value.as_str().and_then(parse_iso8601);
                Ok(true)
            }
            "nextPageToken" => {
                self.next_page_token = value.as_str().map(str::to_string);
                Ok(true)
            }
            "items" => {
                let items = value.as_array().ok_or(ParseError::InvalidJsonRoot)?;
                for item in items {
                    let entry = parse_json_value::<E>(item)?;
                    self.check_entry_uniqueness(&entry)?;
                    self.entries.push(entry);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn build_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        if let Some(etag) = &self.etag {
            object.insert("etag".to_string(), Value::String(etag.clone()));
        }
        object.insert(
            "items".to_string(),
            Value::Array(self.entries.iter().map(Parsable::build_json).collect()),
        );
        if let Some(token) = &self.next_page_token {
            object.insert("nextPageToken".to_string(), Value::String(token.clone()));
        }
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use gdata_parsable::{parse_json, parse_xml, to_xml};

    const FEED_XML: &[u8] = br#"<feed xmlns='http://www.w3.org/2005/Atom'
        xmlns:openSearch='http://a9.com/-/spec/opensearch/1.1/'
        xmlns:gd='http://schemas.google.com/g/2005'
        gd:etag='W/"feed-etag"'>
        <id>http://example.com/feeds</id>
        <title type='text'>Test feed</title>
        <subtitle type='text'>Some entries</subtitle>
        <updated>2009-04-01T12:00:00Z</updated>
        <logo>http://example.com/logo.png</logo>
        <generator uri='http://example.com/' version='1.0'>Example</generator>
        <author><name>Feed Owner</name></author>
        <openSearch:totalResults>25</openSearch:totalResults>
        <openSearch:startIndex>1</openSearch:startIndex>
        <openSearch:itemsPerPage>2</openSearch:itemsPerPage>
        <link rel='next' href='http://example.com/feeds?start-index=3'/>
        <entry>
            <id>http://example.com/feeds/entry/1</id>
            <title type='text'>First</title>
        </entry>
        <entry>
            <id>http://example.com/feeds/entry/2</id>
            <title type='text'>Second</title>
        </entry>
    </feed>"#;

    #[test]
    fn parse_full_feed() -> anyhow::Result<()> {
        let feed: Feed<Entry> = parse_xml(FEED_XML)?;
        assert_eq!(feed.title(), "Test feed");
        assert_eq!(feed.etag(), Some(r#"W/"feed-etag""#));
        assert_eq!(feed.total_results(), Some(25));
        assert_eq!(feed.start_index(), Some(1));
        assert_eq!(feed.items_per_page(), Some(2));
        assert_eq!(feed.entries().len(), 2);
        assert_eq!(feed.entries()[0].title(), "First");
        assert_eq!(
            feed.next_page_uri(),
            Some("http://example.com/feeds?start-index=3")
        );
        assert_eq!(feed.previous_page_uri(), None);
        assert_eq!(feed.generator().and_then(Generator::name), Some("Example"));
        Ok(())
    }

    #[test]
    fn lookup_entry_by_id() -> anyhow::Result<()> {
        let feed: Feed<Entry> = parse_xml(FEED_XML)?;
        let entry = feed.lookup_entry("http://example.com/feeds/entry/2");
        assert_eq!(entry.map(Entry::title), Some("Second"));
        assert!(feed.lookup_entry("http://example.com/feeds/entry/9").is_none());
        Ok(())
    }

    #[test]
    fn duplicate_entry_id_is_rejected() {
        let xml = br#"<feed xmlns='http://www.w3.org/2005/Atom'>
            <entry><id>dup</id><title>a</title></entry>
            <entry><id>dup</id><title>b</title></entry>
        </feed>"#;
        let err = parse_xml::<Feed<Entry>>(xml).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateElement { .. }), "{err:?}");
    }

    #[test]
    fn bad_opensearch_count_is_rejected() {
        let xml = br#"<feed xmlns='http://www.w3.org/2005/Atom'
            xmlns:openSearch='http://a9.com/-/spec/opensearch/1.1/'>
            <openSearch:totalResults>many</openSearch:totalResults>
        </feed>"#;
        assert!(parse_xml::<Feed<Entry>>(xml).is_err());
    }

    #[test]
    fn serialize_round_trip() -> anyhow::Result<()> {
        let feed: Feed<Entry> = parse_xml(FEED_XML)?;
        let xml = to_xml(&feed);
        assert!(xml.contains("xmlns:openSearch='http://a9.com/-/spec/opensearch/1.1/'"));
        let reparsed: Feed<Entry> = parse_xml(xml.as_bytes())?;
        assert_eq!(reparsed, feed);
        Ok(())
    }

    #[test]
    fn json_feed_with_token() -> anyhow::Result<()> {
        let feed: Feed<Entry> = parse_json(
            br#"{
                "kind": "tasks#tasks",
                "etag": "\"etag\"",
                "nextPageToken": "CgkI8anoxaL",
                "items": [
                    {"id": "a", "title": "First"},
                    {"id": "b", "title": "Second"}
                ]
            }"#,
        )?;
        assert_eq!(feed.entries().len(), 2);
        assert_eq!(feed.next_page_token(), Some("CgkI8anoxaL"));
        assert_eq!(feed.entries()[1].id(), Some("b"));
        Ok(())
    }
}
