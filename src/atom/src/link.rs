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

use gdata_parsable::xml::append_escaped_with;
use gdata_parsable::{Element, ParseError, Parsable};

/// The relation of a link pointing back at the containing resource.
pub const REL_SELF: &str = "self";
/// The relation of the link used for updates and deletes.
pub const REL_EDIT: &str = "edit";
/// The default relation.
pub const REL_ALTERNATE: &str = "alternate";
/// The relation of a feed's next-page link.
pub const REL_NEXT: &str = "next";
/// The relation of a feed's previous-page link.
pub const REL_PREVIOUS: &str = "previous";

/// An `atom:link` element: a typed reference to a related resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Link {
    href: Option<String>,
    rel: Option<String>,
    content_type: Option<String>,
    language: Option<String>,
    title: Option<String>,
    length: Option<i64>,
}

impl Link {
    /// Creates a link with the given target and relation.
    pub fn new(href: &str, rel: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            rel: Some(rel.to_string()),
            ..Self::default()
        }
    }

    pub fn href(&self) -> &str {
        self.href.as_deref().unwrap_or_default()
    }

    /// The link relation; `alternate` when the document did not specify one.
    pub fn rel(&self) -> &str {
        self.rel.as_deref().unwrap_or(REL_ALTERNATE)
    }

    /// The advisory content type of the target.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The `hreflang` language tag of the target.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The advisory content length of the target, in bytes.
    pub fn length(&self) -> Option<i64> {
        self.length
    }

    pub fn set_content_type(&mut self, content_type: Option<&str>) {
        self.content_type = content_type.map(str::to_string);
    }

    pub fn set_language(&mut self, language: Option<&str>) {
        self.language = language.map(str::to_string);
    }

    pub fn set_title(&mut self, title: Option<&str>) {
        self.title = title.map(str::to_string);
    }
}

impl Parsable for Link {
    fn element_name() -> &'static str {
        "link"
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.href = match root.attr_non_empty("href") {
            Some(href) => Some(href.to_string()),
            None => return Err(ParseError::missing_attribute(root, "href")),
        };
        self.rel = root.attr_non_empty("rel").map(str::to_string);
        self.content_type = root.attr_non_empty("type").map(str::to_string);
        self.language = root.attr_non_empty("hreflang").map(str::to_string);
        self.title = root.attr_non_empty("title").map(str::to_string);
        self.length = match root.attr_non_empty("length") {
            Some(length) => Some(
                length
                    .parse::<i64>()
                    .map_err(|_| ParseError::unknown_value(root, "length", length))?,
            ),
            None => None,
        };
        Ok(())
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        if let Some(href) = &self.href {
            append_escaped_with(xml, " href='", href, "'");
        }
        append_escaped_with(xml, " rel='", self.rel(), "'");
        if let Some(content_type) = &self.content_type {
            append_escaped_with(xml, " type='", content_type, "'");
        }
        if let Some(language) = &self.language {
            append_escaped_with(xml, " hreflang='", language, "'");
        }
        if let Some(title) = &self.title {
            append_escaped_with(xml, " title='", title, "'");
        }
        if let Some(length) = self.length {
            xml.push_str(&format!(" length='{length}'"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdata_parsable::{build_xml, parse_xml};

    #[test]
    fn parse_full() -> anyhow::Result<()> {
        let link: Link = parse_xml(
            br#"<link href="http://example.com/" rel="self" type="application/atom+xml" hreflang="en" title="Example" length="1234"/>"#,
        )?;
        assert_eq!(link.href(), "http://example.com/");
        assert_eq!(link.rel(), "self");
        assert_eq!(link.content_type(), Some("application/atom+xml"));
        assert_eq!(link.language(), Some("en"));
        assert_eq!(link.title(), Some("Example"));
        assert_eq!(link.length(), Some(1234));
        Ok(())
    }

    #[test]
    fn rel_defaults_to_alternate() -> anyhow::Result<()> {
        let link: Link = parse_xml(br#"<link href="http://example.com/"/>"#)?;
        assert_eq!(link.rel(), REL_ALTERNATE);
        Ok(())
    }

    #[test]
    fn href_is_required() {
        let err = parse_xml::<Link>(br#"<link rel="self"/>"#).unwrap_err();
        assert!(
            matches!(&err, ParseError::MissingAttribute { attribute, .. } if attribute == "href"),
            "{err:?}"
        );
    }

    #[test]
    fn bad_length_is_rejected() {
        let err =
            parse_xml::<Link>(br#"<link href="http://example.com/" length="soon"/>"#).unwrap_err();
        assert!(matches!(err, ParseError::UnknownValue { .. }), "{err:?}");
    }

    #[test]
    fn serialize_round_trip() -> anyhow::Result<()> {
        let link = Link::new("http://example.com/?a=1&b=2", REL_EDIT);
        let mut xml = String::new();
        build_xml(&link, &mut xml);
        assert_eq!(
            xml,
            "<link href='http://example.com/?a=1&amp;b=2' rel='edit'/>"
        );
        let reparsed: Link = parse_xml(xml.as_bytes())?;
        assert_eq!(reparsed.href(), link.href());
        assert_eq!(reparsed.rel(), link.rel());
        Ok(())
    }
}
