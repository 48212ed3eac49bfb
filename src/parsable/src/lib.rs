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

//! The parsable-entity framework for the GData client library.
//!
//! Everything that crosses the wire in a GData service — feed envelopes,
//! entries, and leaf extension elements such as `media:group` or
//! `gContact:jot` — implements the [Parsable] contract. The framework runs a
//! two-phase parse (root attributes first, then child elements), chains
//! unrecognized children outwards until a diagnostic is emitted, and
//! serializes the tree back with a minimal, stable namespace prefix set at
//! the root.
//!
//! Both the XML (Atom) and JSON (Discovery-style) dialects share the same
//! contract; a type opts into either or both by implementing the
//! corresponding hooks.

pub mod error;
pub mod parsable;
pub mod parser;
pub mod xml;

pub use error::ParseError;
pub use parsable::{
    Namespaces, Parsable, build_xml, parse_json, parse_json_value, parse_xml, parse_xml_element,
    to_json, to_xml,
};
pub use xml::Element;

/// An alias of [std::result::Result] where the error is always [ParseError].
pub type Result<T> = std::result::Result<T, ParseError>;

/// The Atom syndication namespace, the default namespace of every feed and
/// entry document.
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// The `gd:` common-elements namespace.
pub const GD_NAMESPACE: &str = "http://schemas.google.com/g/2005";

/// The `app:` Atom publishing protocol namespace.
pub const APP_NAMESPACE: &str = "http://www.w3.org/2007/app";

/// The `openSearch:` namespace used for feed paging hints.
pub const OPENSEARCH_NAMESPACE: &str = "http://a9.com/-/spec/opensearch/1.1/";
