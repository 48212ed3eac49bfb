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

use gdata_parsable::parser::{ParseOptions, string_from_element};
use gdata_parsable::xml::append_escaped_with;
use gdata_parsable::{Element, ParseError, Parsable};

/// An `atom:author` element: a person with a required name and optional URI
/// and email address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    name: Option<String>,
    uri: Option<String>,
    email: Option<String>,
}

impl Author {
    /// Creates an author with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// The author's human-readable name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// An IRI associated with the author.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// The author's email address.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_uri(&mut self, uri: Option<&str>) {
        self.uri = uri.map(str::to_string);
    }

    pub fn set_email(&mut self, email: Option<&str>) {
        self.email = email.map(str::to_string);
    }
}

impl Parsable for Author {
    fn element_name() -> &'static str {
        "author"
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        let handled = string_from_element(
            child,
            "name",
            ParseOptions::REQUIRED | ParseOptions::NO_DUPES,
            &mut self.name,
        )? || string_from_element(child, "uri", ParseOptions::NO_DUPES, &mut self.uri)?
            || string_from_element(child, "email", ParseOptions::NO_DUPES, &mut self.email)?;
        Ok(handled)
    }

    fn post_parse_xml(&mut self) -> Result<(), ParseError> {
        if self.name.is_none() {
            return Err(ParseError::MissingElement {
                parent: "author".to_string(),
                child: "name".to_string(),
            });
        }
        Ok(())
    }

    fn build_xml_content(&self, xml: &mut String) {
        if let Some(name) = &self.name {
            append_escaped_with(xml, "<name>", name, "</name>");
        }
        if let Some(uri) = &self.uri {
            append_escaped_with(xml, "<uri>", uri, "</uri>");
        }
        if let Some(email) = &self.email {
            append_escaped_with(xml, "<email>", email, "</email>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdata_parsable::{build_xml, parse_xml};

    #[test]
    fn parse_full() -> anyhow::Result<()> {
        let author: Author = parse_xml(
            b"<author><name>John Smith</name><uri>http://example.com/</uri><email>john@example.com</email></author>",
        )?;
        assert_eq!(author.name(), "John Smith");
        assert_eq!(author.uri(), Some("http://example.com/"));
        assert_eq!(author.email(), Some("john@example.com"));
        Ok(())
    }

    #[test]
    fn name_is_required() {
        let err = parse_xml::<Author>(b"<author><uri>http://example.com/</uri></author>")
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingElement { .. }), "{err:?}");
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let err = parse_xml::<Author>(b"<author><name>a</name><name>b</name></author>")
            .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateElement { .. }), "{err:?}");
    }

    #[test]
    fn serialize_round_trip() -> anyhow::Result<()> {
        let author = {
            let mut a = Author::new("J & K");
            a.set_email(Some("jk@example.com"));
            a
        };
        let mut xml = String::new();
        build_xml(&author, &mut xml);
        assert_eq!(
            xml,
            "<author><name>J &amp; K</name><email>jk@example.com</email></author>"
        );
        let reparsed: Author = parse_xml(xml.as_bytes())?;
        assert_eq!(reparsed, author);
        Ok(())
    }
}
