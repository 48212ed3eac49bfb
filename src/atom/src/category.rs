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

/// The scheme used by GData kind categories, which identify an entry's
/// service-specific type.
pub const KIND_SCHEME: &str = "http://schemas.google.com/g/2005#kind";

/// An `atom:category` element: a term within a categorization scheme, with
/// an optional human-readable label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    term: Option<String>,
    scheme: Option<String>,
    label: Option<String>,
}

impl Category {
    /// Creates a category with the given term.
    pub fn new(term: &str) -> Self {
        Self {
            term: Some(term.to_string()),
            ..Self::default()
        }
    }

    /// Creates a kind category identifying an entry type.
    pub fn kind(term: &str) -> Self {
        Self {
            term: Some(term.to_string()),
            scheme: Some(KIND_SCHEME.to_string()),
            label: None,
        }
    }

    pub fn term(&self) -> &str {
        self.term.as_deref().unwrap_or_default()
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_scheme(&mut self, scheme: Option<&str>) {
        self.scheme = scheme.map(str::to_string);
    }

    pub fn set_label(&mut self, label: Option<&str>) {
        self.label = label.map(str::to_string);
    }
}

impl Parsable for Category {
    fn element_name() -> &'static str {
        "category"
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.term = match root.attr_non_empty("term") {
            Some(term) => Some(term.to_string()),
            None => return Err(ParseError::missing_attribute(root, "term")),
        };
        self.scheme = root.attr_non_empty("scheme").map(str::to_string);
        self.label = root.attr_non_empty("label").map(str::to_string);
        Ok(())
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        if let Some(term) = &self.term {
            append_escaped_with(xml, " term='", term, "'");
        }
        if let Some(scheme) = &self.scheme {
            append_escaped_with(xml, " scheme='", scheme, "'");
        }
        if let Some(label) = &self.label {
            append_escaped_with(xml, " label='", label, "'");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdata_parsable::{build_xml, parse_xml};

    #[test]
    fn parse_and_serialize() -> anyhow::Result<()> {
        let category: Category =
            parse_xml(br#"<category term="jokes" scheme="http://example.com/categories" label="Jokes &amp; Trivia"/>"#)?;
        assert_eq!(category.term(), "jokes");
        assert_eq!(category.scheme(), Some("http://example.com/categories"));
        assert_eq!(category.label(), Some("Jokes & Trivia"));

        let mut xml = String::new();
        build_xml(&category, &mut xml);
        let reparsed: Category = parse_xml(xml.as_bytes())?;
        assert_eq!(reparsed, category);
        Ok(())
    }

    #[test]
    fn term_is_required() {
        let err = parse_xml::<Category>(br#"<category scheme="s"/>"#).unwrap_err();
        assert!(
            matches!(&err, ParseError::MissingAttribute { attribute, .. } if attribute == "term"),
            "{err:?}"
        );
    }

    #[test]
    fn kind_constructor() {
        let c = Category::kind("http://schemas.google.com/contact/2008#contact");
        assert_eq!(c.scheme(), Some(KIND_SCHEME));
    }
}
