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

//! Reusable parse routines shared by every [Parsable] implementation:
//! flagged child-element dispatchers, boolean attributes, and ISO 8601
//! timestamps.

use crate::error::ParseError;
use crate::parsable::{Parsable, parse_xml_element};
use crate::xml::Element;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::ops::BitOr;

/// Flags controlling how a child-element dispatcher treats the element's
/// content.
///
/// `DEFAULT` is mutually exclusive with `REQUIRED` and `NON_EMPTY`;
/// `IGNORE_ERROR` is mutually exclusive with `REQUIRED`. Violating either
/// rule is a programming error and panics in debug builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions(u8);

impl ParseOptions {
    /// No special handling.
    pub const NONE: ParseOptions = ParseOptions(0);
    /// The element must appear at most once.
    pub const NO_DUPES: ParseOptions = ParseOptions(1 << 0);
    /// The element's content must be present.
    pub const REQUIRED: ParseOptions = ParseOptions(1 << 1);
    /// The element's content must not be the empty string.
    pub const NON_EMPTY: ParseOptions = ParseOptions(1 << 2);
    /// Null or empty content produces an empty value instead of an error.
    pub const DEFAULT: ParseOptions = ParseOptions(1 << 3);
    /// Parse failures are swallowed and the element is skipped.
    pub const IGNORE_ERROR: ParseOptions = ParseOptions(1 << 4);

    /// True when all flags in `other` are set in `self`.
    pub fn contains(self, other: ParseOptions) -> bool {
        self.0 & other.0 == other.0
    }

    fn check(self) {
        debug_assert!(
            !(self.contains(Self::DEFAULT)
                && (self.contains(Self::REQUIRED) || self.contains(Self::NON_EMPTY))),
            "DEFAULT is mutually exclusive with REQUIRED and NON_EMPTY"
        );
        debug_assert!(
            !(self.contains(Self::IGNORE_ERROR) && self.contains(Self::REQUIRED)),
            "IGNORE_ERROR is mutually exclusive with REQUIRED"
        );
    }
}

impl BitOr for ParseOptions {
    type Output = ParseOptions;
    fn bitor(self, rhs: ParseOptions) -> ParseOptions {
        ParseOptions(self.0 | rhs.0)
    }
}

/// Extracts string content from `element` if its qualified name is `name`.
///
/// Returns `Ok(false)` without touching `output` when the name does not
/// match, so callers can chain dispatchers with `||`-style early returns.
pub fn string_from_element(
    element: &Element,
    name: &str,
    options: ParseOptions,
    output: &mut Option<String>,
) -> Result<bool, ParseError> {
    options.check();
    if !element.matches(name) {
        return Ok(false);
    }
    if options.contains(ParseOptions::NO_DUPES) && output.is_some() {
        return Err(ParseError::duplicate_element(element));
    }

    let text = element.text();
    if text.is_empty() {
        if options.contains(ParseOptions::DEFAULT) {
            *output = Some(String::new());
            return Ok(true);
        }
        if options.contains(ParseOptions::REQUIRED) || options.contains(ParseOptions::NON_EMPTY) {
            return Err(ParseError::missing_content(element));
        }
    }
    *output = Some(text.to_string());
    Ok(true)
}

/// Parses `element` into a fresh `T` if its qualified name is `name`,
/// storing it in `output`.
pub fn object_from_element<T: Parsable>(
    element: &Element,
    name: &str,
    options: ParseOptions,
    output: &mut Option<T>,
) -> Result<bool, ParseError> {
    options.check();
    if !element.matches(name) {
        return Ok(false);
    }
    if options.contains(ParseOptions::NO_DUPES) && output.is_some() {
        return Err(ParseError::duplicate_element(element));
    }
    match parse_xml_element::<T>(element) {
        Ok(value) => {
            *output = Some(value);
            Ok(true)
        }
        Err(_) if options.contains(ParseOptions::IGNORE_ERROR) => Ok(true),
        Err(e) => Err(e),
    }
}

/// Parses `element` into a fresh `T` if its qualified name is `name`,
/// delivering it through `setter`. Used for repeated elements collected into
/// vectors or routed through validating setters.
pub fn object_from_element_setter<T, F>(
    element: &Element,
    name: &str,
    options: ParseOptions,
    setter: F,
) -> Result<bool, ParseError>
where
    T: Parsable,
    F: FnOnce(T) -> Result<(), ParseError>,
{
    options.check();
    if !element.matches(name) {
        return Ok(false);
    }
    match parse_xml_element::<T>(element) {
        Ok(value) => {
            setter(value)?;
            Ok(true)
        }
        Err(_) if options.contains(ParseOptions::IGNORE_ERROR) => Ok(true),
        Err(e) => Err(e),
    }
}

/// Extracts an ISO 8601 timestamp from `element`'s content if its qualified
/// name is `name`.
pub fn time_from_element(
    element: &Element,
    name: &str,
    options: ParseOptions,
    output: &mut Option<DateTime<Utc>>,
) -> Result<bool, ParseError> {
    options.check();
    if !element.matches(name) {
        return Ok(false);
    }
    if options.contains(ParseOptions::NO_DUPES) && output.is_some() {
        return Err(ParseError::duplicate_element(element));
    }

    let text = element.text();
    if text.is_empty() {
        if options.contains(ParseOptions::DEFAULT) {
            return Ok(true);
        }
        return Err(ParseError::missing_content(element));
    }
    match parse_iso8601(text) {
        Some(time) => {
            *output = Some(time);
            Ok(true)
        }
        None if options.contains(ParseOptions::IGNORE_ERROR) => Ok(true),
        None => Err(ParseError::not_iso8601(element, text)),
    }
}

/// The behavior of [boolean_from_attribute] when the attribute is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolDefault {
    /// Absence means `false`.
    False,
    /// Absence means `true`.
    True,
    /// Absence is a [ParseError::MissingAttribute].
    Required,
}

/// Parses a boolean attribute of the form `name='true'` / `name='false'`.
///
/// Any other value fails with [ParseError::UnknownValue].
pub fn boolean_from_attribute(
    element: &Element,
    name: &str,
    default: BoolDefault,
) -> Result<bool, ParseError> {
    match element.attr(name) {
        None => match default {
            BoolDefault::False => Ok(false),
            BoolDefault::True => Ok(true),
            BoolDefault::Required => Err(ParseError::missing_attribute(element, name)),
        },
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(ParseError::unknown_value(element, name, other)),
    }
}

/// Parses an ISO 8601 timestamp: a full date-time with offset or `Z`, or a
/// bare date (midnight UTC).
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

/// Formats a timestamp as ISO 8601 in UTC with a `Z` suffix.
pub fn format_iso8601(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Formats a timestamp as a bare ISO 8601 date.
pub fn format_iso8601_date(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn element(xml: &str) -> Element {
        Element::from_bytes(xml.as_bytes()).unwrap()
    }

    #[test]
    fn string_dispatcher_matches_by_name() -> anyhow::Result<()> {
        let mut out = None;
        let handled =
            string_from_element(&element("<title>T</title>"), "title", ParseOptions::NONE, &mut out)?;
        assert!(handled);
        assert_eq!(out.as_deref(), Some("T"));

        let mut other = None;
        let handled = string_from_element(
            &element("<summary>S</summary>"),
            "title",
            ParseOptions::NONE,
            &mut other,
        )?;
        assert!(!handled);
        assert_eq!(other, None);
        Ok(())
    }

    #[test]
    fn string_dispatcher_detects_duplicates() {
        let mut out = Some("first".to_string());
        let err = string_from_element(
            &element("<title>second</title>"),
            "title",
            ParseOptions::NO_DUPES,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateElement { .. }), "{err:?}");
    }

    #[test]
    fn required_content_must_be_present() {
        let mut out = None;
        let err = string_from_element(
            &element("<title/>"),
            "title",
            ParseOptions::REQUIRED,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MissingContent { .. }), "{err:?}");
    }

    #[test]
    fn default_flag_yields_empty_string() -> anyhow::Result<()> {
        let mut out = None;
        let handled = string_from_element(
            &element("<title/>"),
            "title",
            ParseOptions::DEFAULT,
            &mut out,
        )?;
        assert!(handled);
        assert_eq!(out.as_deref(), Some(""));
        Ok(())
    }

    #[test_case("true", BoolDefault::False, Ok(true))]
    #[test_case("false", BoolDefault::True, Ok(false))]
    fn boolean_attribute_values(
        value: &str,
        default: BoolDefault,
        want: Result<bool, ()>,
    ) {
        let e = element(&format!("<x flag='{value}'/>"));
        let got = boolean_from_attribute(&e, "flag", default);
        assert_eq!(got.map_err(|_| ()), want);
    }

    #[test]
    fn boolean_attribute_defaults() -> anyhow::Result<()> {
        let e = element("<x/>");
        assert!(!boolean_from_attribute(&e, "flag", BoolDefault::False)?);
        assert!(boolean_from_attribute(&e, "flag", BoolDefault::True)?);
        let err = boolean_from_attribute(&e, "flag", BoolDefault::Required).unwrap_err();
        assert!(matches!(err, ParseError::MissingAttribute { .. }), "{err:?}");
        Ok(())
    }

    #[test]
    fn boolean_attribute_rejects_junk() {
        let e = element("<x flag='yes'/>");
        let err = boolean_from_attribute(&e, "flag", BoolDefault::False).unwrap_err();
        assert!(matches!(err, ParseError::UnknownValue { .. }), "{err:?}");
    }

    #[test_case("2009-04-01T12:30:45Z"; "UTC")]
    #[test_case("2009-04-01T14:30:45+02:00"; "with offset")]
    fn iso8601_datetime(value: &str) {
        let time = parse_iso8601(value).unwrap();
        assert_eq!(format_iso8601(time), "2009-04-01T12:30:45Z");
    }

    #[test]
    fn iso8601_bare_date() {
        let time = parse_iso8601("2009-04-01").unwrap();
        assert_eq!(format_iso8601(time), "2009-04-01T00:00:00Z");
        assert_eq!(format_iso8601_date(time), "2009-04-01");
    }

    #[test]
    fn iso8601_rejects_junk() {
        assert!(parse_iso8601("next tuesday").is_none());
        assert!(parse_iso8601("2009-13-99").is_none());
    }

    #[test]
    fn time_dispatcher() -> anyhow::Result<()> {
        let mut out = None;
        let handled = time_from_element(
            &element("<updated>2009-04-01T12:30:45Z</updated>"),
            "updated",
            ParseOptions::NO_DUPES,
            &mut out,
        )?;
        assert!(handled);
        assert!(out.is_some());

        let err = time_from_element(
            &element("<updated>not a date</updated>"),
            "updated",
            ParseOptions::NONE,
            &mut None,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::NotIso8601 { .. }), "{err:?}");
        Ok(())
    }
}
