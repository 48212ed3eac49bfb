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

//! Translation of error responses into typed errors.
//!
//! A failed request is first offered to the service's declared error
//! dialect. A structured envelope that the service's error table recognizes
//! produces a precise kind; anything else falls back to a mapping from the
//! HTTP status code.

use crate::descriptor::{ErrorDialect, ServiceDescriptor};
use crate::error::{Error, ErrorKind};
use gdata_parsable::parser::{ParseOptions, string_from_element};
use gdata_parsable::{Element, ParseError, Parsable};
use serde::Deserialize;

/// One `<error>` child of an XML error envelope.
#[derive(Debug, Default, PartialEq)]
struct ErrorItem {
    domain: Option<String>,
    code: Option<String>,
    location: Option<String>,
    internal_reason: Option<String>,
}

impl Parsable for ErrorItem {
    fn element_name() -> &'static str {
        "error"
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        let handled = string_from_element(child, "domain", ParseOptions::NONE, &mut self.domain)?
            || string_from_element(child, "code", ParseOptions::NONE, &mut self.code)?
            || string_from_element(child, "location", ParseOptions::NONE, &mut self.location)?
            || string_from_element(
                child,
                "internalReason",
                ParseOptions::NONE,
                &mut self.internal_reason,
            )?;
        Ok(handled)
    }
}

/// The `<errors>` root of an XML error envelope.
#[derive(Debug, Default)]
struct ErrorEnvelope {
    errors: Vec<ErrorItem>,
}

impl Parsable for ErrorEnvelope {
    fn element_name() -> &'static str {
        "errors"
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        if child.matches("error") {
            self.errors
                .push(gdata_parsable::parse_xml_element::<ErrorItem>(child)?);
            return Ok(true);
        }
        Ok(false)
    }
}

#[derive(Debug, Deserialize)]
struct JsonEnvelope {
    error: JsonError,
}

#[derive(Debug, Deserialize)]
struct JsonError {
    #[serde(default)]
    errors: Vec<JsonErrorItem>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonErrorItem {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

/// A dialect-independent view of one structured error.
struct StructuredError {
    domain: String,
    code: String,
    message: Option<String>,
}

fn parse_xml_envelope(body: &str) -> Option<Vec<StructuredError>> {
    let envelope = gdata_parsable::parse_xml::<ErrorEnvelope>(body.as_bytes()).ok()?;
    let errors = envelope
        .errors
        .into_iter()
        .map(|item| StructuredError {
            domain: item.domain.unwrap_or_default(),
            code: item.code.unwrap_or_default(),
            message: item.internal_reason,
        })
        .collect::<Vec<_>>();
    (!errors.is_empty()).then_some(errors)
}

fn parse_json_envelope(body: &str) -> Option<Vec<StructuredError>> {
    let envelope: JsonEnvelope = serde_json::from_str(body).ok()?;
    let fallback_message = envelope.error.message;
    let errors = envelope
        .error
        .errors
        .into_iter()
        .map(|item| StructuredError {
            domain: item.domain.unwrap_or_default(),
            code: item.reason.unwrap_or_default(),
            message: item.message.or_else(|| fallback_message.clone()),
        })
        .collect::<Vec<_>>();
    (!errors.is_empty()).then_some(errors)
}

/// The status-code fallback used when no structured envelope was recognized.
fn kind_from_status(status: u16) -> ErrorKind {
    match status {
        401 => ErrorKind::AuthenticationRequired,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::NotFound,
        409 | 412 => ErrorKind::ConcurrentModification,
        500 | 502 | 503 => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::Protocol,
    }
}

/// Translates a failed response into a typed [Error].
///
/// The first structured error determines the result; any further ones are
/// logged. A `(domain, code)` pair absent from the service's table falls
/// back to the status mapping, keeping the envelope's message.
pub(crate) fn parse_error_response(
    descriptor: &ServiceDescriptor,
    status: u16,
    body: &str,
) -> Error {
    let structured = match descriptor.error_dialect() {
        ErrorDialect::Xml => parse_xml_envelope(body),
        ErrorDialect::Json => parse_json_envelope(body),
    };

    let Some(errors) = structured else {
        return Error::kind_only(kind_from_status(status)).with_status_code(status);
    };

    for extra in &errors[1..] {
        tracing::warn!(
            service = descriptor.name(),
            domain = extra.domain.as_str(),
            code = extra.code.as_str(),
            "additional error in response"
        );
    }

    let first = &errors[0];
    let kind = descriptor
        .lookup_error(&first.domain, &first.code)
        .unwrap_or_else(|| kind_from_status(status));
    let message = first
        .message
        .clone()
        .unwrap_or_else(|| format!("{}: {}", first.domain, first.code));
    Error::new(kind, message).with_status_code(status)
}
