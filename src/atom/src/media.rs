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

//! Media RSS extension elements (`media:` namespace), used by the video and
//! photo services to describe a piece of media attached to an entry.

use gdata_parsable::parser::{ParseOptions, string_from_element};
use gdata_parsable::xml::{append_escaped, append_escaped_with};
use gdata_parsable::{Element, Namespaces, ParseError, Parsable, build_xml, parse_xml_element};

/// The Media RSS namespace.
pub const MEDIA_NAMESPACE: &str = "http://search.yahoo.com/mrss/";

/// The scheme assumed for a `media:category` that does not declare one.
pub const DEFAULT_CATEGORY_SCHEME: &str = "http://video.search.yahoo.com/mrss/category_schema";

/// A `media:category` element. Unlike `atom:category`, the term is the
/// element's text content and the scheme has a well-known default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaCategory {
    category: Option<String>,
    scheme: Option<String>,
    label: Option<String>,
}

impl MediaCategory {
    pub fn new(category: &str) -> Self {
        Self {
            category: Some(category.to_string()),
            ..Self::default()
        }
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    pub fn scheme(&self) -> &str {
        self.scheme.as_deref().unwrap_or(DEFAULT_CATEGORY_SCHEME)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Parsable for MediaCategory {
    fn element_name() -> &'static str {
        "category"
    }

    fn element_prefix() -> Option<&'static str> {
        Some("media")
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        let category = root.text();
        if category.is_empty() {
            return Err(ParseError::missing_content(root));
        }
        self.category = Some(category.to_string());
        self.scheme = root.attr_non_empty("scheme").map(str::to_string);
        self.label = root.attr_non_empty("label").map(str::to_string);
        Ok(())
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        append_escaped_with(xml, " scheme='", self.scheme(), "'");
        if let Some(label) = &self.label {
            append_escaped_with(xml, " label='", label, "'");
        }
    }

    fn build_xml_content(&self, xml: &mut String) {
        append_escaped(xml, self.category());
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.insert("media", MEDIA_NAMESPACE);
    }
}

/// A `media:thumbnail` element: a preview image with optional dimensions and
/// an offset into the media stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thumbnail {
    uri: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    time: Option<i64>,
}

impl Thumbnail {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: Some(uri.to_string()),
            ..Self::default()
        }
    }

    /// The thumbnail image's location.
    pub fn uri(&self) -> &str {
        self.uri.as_deref().unwrap_or_default()
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Milliseconds into the media stream at which the thumbnail was taken.
    pub fn time(&self) -> Option<i64> {
        self.time
    }

    pub fn set_width(&mut self, width: Option<u32>) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: Option<u32>) {
        self.height = height;
    }

    pub fn set_time(&mut self, time: Option<i64>) {
        self.time = time;
    }
}

/// Parses an RFC 2326 normal-play-time string (`HH:MM:SS.s`) into
/// milliseconds. The hour and minute fields must be exactly two digits.
fn parse_ntp_time(value: &str) -> Option<i64> {
    let bytes = value.as_bytes();
    if bytes.len() < 7 || bytes[2] != b':' || bytes[5] != b':' {
        return None;
    }
    if !bytes[..2].iter().all(u8::is_ascii_digit)
        || !bytes[3..5].iter().all(u8::is_ascii_digit)
        || !bytes[6].is_ascii_digit()
    {
        return None;
    }
    let hours: i64 = value[..2].parse().ok()?;
    let minutes: i64 = value[3..5].parse().ok()?;
    let seconds: f64 = value[6..].parse().ok()?;
    Some(((seconds + (minutes * 60 + hours * 3600) as f64) * 1000.0) as i64)
}

/// Formats a millisecond offset as a normal-play-time string.
fn build_ntp_time(millis: i64) -> String {
    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let seconds = (millis % 60_000) as f64 / 1000.0;
    format!("{hours:02}:{minutes:02}:{seconds:06.3}")
}

impl Parsable for Thumbnail {
    fn element_name() -> &'static str {
        "thumbnail"
    }

    fn element_prefix() -> Option<&'static str> {
        Some("media")
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.uri = match root.attr_non_empty("url") {
            Some(url) => Some(url.to_string()),
            None => return Err(ParseError::missing_attribute(root, "url")),
        };
        if let Some(width) = root.attr_non_empty("width") {
            self.width = Some(
                width
                    .parse::<u32>()
                    .map_err(|_| ParseError::unknown_value(root, "width", width))?,
            );
        }
        if let Some(height) = root.attr_non_empty("height") {
            self.height = Some(
                height
                    .parse::<u32>()
                    .map_err(|_| ParseError::unknown_value(root, "height", height))?,
            );
        }
        if let Some(time) = root.attr_non_empty("time") {
            self.time = Some(
                parse_ntp_time(time).ok_or_else(|| ParseError::unknown_value(root, "time", time))?,
            );
        }
        Ok(())
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        if let Some(uri) = &self.uri {
            append_escaped_with(xml, " url='", uri, "'");
        }
        if let Some(width) = self.width {
            xml.push_str(&format!(" width='{width}'"));
        }
        if let Some(height) = self.height {
            xml.push_str(&format!(" height='{height}'"));
        }
        if let Some(time) = self.time {
            xml.push_str(&format!(" time='{}'", build_ntp_time(time)));
        }
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.insert("media", MEDIA_NAMESPACE);
    }
}

/// A `media:group` element: the description of an entry's attached media.
///
/// The group's title usually mirrors the entry's Atom title; it is exposed
/// here as its own field and services derive one from the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    title: Option<String>,
    description: Option<String>,
    keywords: Vec<String>,
    category: Option<MediaCategory>,
    thumbnails: Vec<Thumbnail>,
}

impl Group {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn category(&self) -> Option<&MediaCategory> {
        self.category.as_ref()
    }

    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }

    pub fn set_title(&mut self, title: Option<&str>) {
        self.title = title.map(str::to_string);
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        self.description = description.map(str::to_string);
    }

    pub fn set_keywords(&mut self, keywords: &[&str]) {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
    }

    pub fn set_category(&mut self, category: Option<MediaCategory>) {
        self.category = category;
    }

    pub fn add_thumbnail(&mut self, thumbnail: Thumbnail) {
        self.thumbnails.push(thumbnail);
    }
}

impl Parsable for Group {
    fn element_name() -> &'static str {
        "group"
    }

    fn element_prefix() -> Option<&'static str> {
        Some("media")
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        if string_from_element(child, "media:title", ParseOptions::NONE, &mut self.title)?
            || string_from_element(
                child,
                "media:description",
                ParseOptions::NONE,
                &mut self.description,
            )?
        {
            return Ok(true);
        }
        if child.matches("media:keywords") {
            self.keywords = child
                .text()
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
            return Ok(true);
        }
        if child.matches("media:category") {
            self.category = Some(parse_xml_element::<MediaCategory>(child)?);
            return Ok(true);
        }
        if child.matches("media:thumbnail") {
            self.thumbnails.push(parse_xml_element::<Thumbnail>(child)?);
            return Ok(true);
        }
        Ok(false)
    }

    fn build_xml_content(&self, xml: &mut String) {
        if let Some(category) = &self.category {
            build_xml(category, xml);
        }
        if let Some(title) = &self.title {
            append_escaped_with(xml, "<media:title type='plain'>", title, "</media:title>");
        }
        if let Some(description) = &self.description {
            append_escaped_with(
                xml,
                "<media:description type='plain'>",
                description,
                "</media:description>",
            );
        }
        if !self.keywords.is_empty() {
            xml.push_str("<media:keywords>");
            for (i, keyword) in self.keywords.iter().enumerate() {
                if i > 0 {
                    xml.push(',');
                }
                append_escaped(xml, keyword);
            }
            xml.push_str("</media:keywords>");
        }
        for thumbnail in &self.thumbnails {
            build_xml(thumbnail, xml);
        }
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.insert("media", MEDIA_NAMESPACE);
    }
}
