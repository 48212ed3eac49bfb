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

use crate::xml::Element;

/// Errors raised while parsing or validating a wire representation.
///
/// Parse-layer errors surface directly to the caller; they are never wrapped
/// in a service error dialect. Each variant names the element (and attribute,
/// where relevant) that violated the contract, so the message alone is
/// usually enough to find the offending markup.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A required element was present but carried no usable content.
    #[error("element <{element}> is missing required content")]
    MissingContent { element: String },

    /// A required attribute was absent or empty.
    #[error("element <{element}> is missing the required attribute `{attribute}`")]
    MissingAttribute { element: String, attribute: String },

    /// A required child element was absent.
    #[error("element <{parent}> is missing the required child element <{child}>")]
    MissingElement { parent: String, child: String },

    /// An element that must appear at most once appeared again.
    #[error("duplicate element <{element}>")]
    DuplicateElement { element: String },

    /// An attribute or content value was outside the permitted set.
    #[error("unknown value `{value}` for `{name}` on element <{element}>")]
    UnknownValue {
        element: String,
        name: String,
        value: String,
    },

    /// A timestamp could not be parsed as ISO 8601.
    #[error("`{value}` on element <{element}> is not in ISO 8601 format")]
    NotIso8601 { element: String, value: String },

    /// Two attributes that may not be combined were both present.
    #[error("attributes `{first}` and `{second}` on element <{element}> are mutually exclusive")]
    MutuallyExclusiveAttributes {
        element: String,
        first: String,
        second: String,
    },

    /// The document's root element was not the expected one.
    #[error("expected root element <{expected}>, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    /// The document contained no root element at all.
    #[error("the document is empty or has no root element")]
    EmptyDocument,

    /// The XML reader reported a syntax error.
    #[error("invalid XML: {0}")]
    InvalidXml(String),

    /// The JSON document could not be deserialized.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON document's top level was not an object.
    #[error("expected a JSON object at the top level")]
    InvalidJsonRoot,
}

impl ParseError {
    /// The element's content was required but missing or empty.
    pub fn missing_content(element: &Element) -> Self {
        Self::MissingContent {
            element: element.name().to_string(),
        }
    }

    /// A required attribute of `element` was absent.
    pub fn missing_attribute(element: &Element, attribute: &str) -> Self {
        Self::MissingAttribute {
            element: element.name().to_string(),
            attribute: attribute.to_string(),
        }
    }

    /// A required child of `parent` was absent.
    pub fn missing_element(parent: &Element, child: &str) -> Self {
        Self::MissingElement {
            parent: parent.name().to_string(),
            child: child.to_string(),
        }
    }

    /// The element appeared more often than the schema allows.
    pub fn duplicate_element(element: &Element) -> Self {
        Self::DuplicateElement {
            element: element.name().to_string(),
        }
    }

    /// An attribute or content value was outside the permitted set.
    pub fn unknown_value(element: &Element, name: &str, value: &str) -> Self {
        Self::UnknownValue {
            element: element.name().to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// A timestamp on `element` failed ISO 8601 parsing.
    pub fn not_iso8601(element: &Element, value: &str) -> Self {
        Self::NotIso8601 {
            element: element.name().to_string(),
            value: value.to_string(),
        }
    }

    /// Two attributes on `element` may not be combined.
    pub fn mutually_exclusive(element: &Element, first: &str, second: &str) -> Self {
        Self::MutuallyExclusiveAttributes {
            element: element.name().to_string(),
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(value: quick_xml::Error) -> Self {
        Self::InvalidXml(value.to_string())
    }
}
