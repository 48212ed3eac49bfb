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

use gdata_parsable::xml::{append_escaped, append_escaped_with};
use gdata_parsable::{Element, ParseError, Parsable};

/// An `atom:generator` element: the agent that produced a feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generator {
    name: Option<String>,
    uri: Option<String>,
    version: Option<String>,
}

impl Generator {
    /// The generator's human-readable name (the element's text content).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl Parsable for Generator {
    fn element_name() -> &'static str {
        "generator"
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        let text = root.text();
        self.name = (!text.is_empty()).then(|| text.to_string());
        self.uri = root.attr_non_empty("uri").map(str::to_string);
        self.version = root.attr_non_empty("version").map(str::to_string);
        Ok(())
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        if let Some(uri) = &self.uri {
            append_escaped_with(xml, " uri='", uri, "'");
        }
        if let Some(version) = &self.version {
            append_escaped_with(xml, " version='", version, "'");
        }
    }

    fn build_xml_content(&self, xml: &mut String) {
        if let Some(name) = &self.name {
            append_escaped(xml, name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdata_parsable::parse_xml;

    #[test]
    fn parse_full() -> anyhow::Result<()> {
        let generator: Generator =
            parse_xml(br#"<generator uri="http://example.com/" version="1.0">Example</generator>"#)?;
        assert_eq!(generator.name(), Some("Example"));
        assert_eq!(generator.uri(), Some("http://example.com/"));
        assert_eq!(generator.version(), Some("1.0"));
        Ok(())
    }

    #[test]
    fn all_parts_are_optional() -> anyhow::Result<()> {
        let generator: Generator = parse_xml(b"<generator/>")?;
        assert_eq!(generator.name(), None);
        assert_eq!(generator.uri(), None);
        Ok(())
    }
}
