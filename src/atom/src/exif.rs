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

//! EXIF extension elements (`exif:` namespace), attached by the photo
//! service to describe how a photograph was taken.

use chrono::{DateTime, TimeZone, Utc};
use gdata_parsable::parser::{ParseOptions, string_from_element};
use gdata_parsable::xml::append_escaped_with;
use gdata_parsable::{Element, Namespaces, ParseError, Parsable};

/// The EXIF namespace.
pub const EXIF_NAMESPACE: &str = "http://schemas.google.com/photos/exif/2007";

/// An `exif:tags` element: camera metadata for a photograph. All fields are
/// optional; absent elements stay unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tags {
    make: Option<String>,
    model: Option<String>,
    image_unique_id: Option<String>,
    distance: Option<f64>,
    exposure: Option<f64>,
    fstop: Option<f64>,
    focal_length: Option<f64>,
    iso: Option<i64>,
    flash: Option<bool>,
    time: Option<DateTime<Utc>>,
}

impl Tags {
    /// The camera manufacturer.
    pub fn make(&self) -> Option<&str> {
        self.make.as_deref()
    }

    /// The camera model.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn image_unique_id(&self) -> Option<&str> {
        self.image_unique_id.as_deref()
    }

    /// The focus distance, in metres.
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// The exposure time, in seconds.
    pub fn exposure(&self) -> Option<f64> {
        self.exposure
    }

    pub fn fstop(&self) -> Option<f64> {
        self.fstop
    }

    /// The focal length, in millimetres.
    pub fn focal_length(&self) -> Option<f64> {
        self.focal_length
    }

    pub fn iso(&self) -> Option<i64> {
        self.iso
    }

    /// Whether the flash fired.
    pub fn flash(&self) -> Option<bool> {
        self.flash
    }

    /// When the photograph was taken. The wire value is milliseconds since
    /// the Unix epoch.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }
}

fn parse_float(element: &Element, slot: &mut Option<f64>) -> Result<(), ParseError> {
    let text = element.text();
    *slot = Some(
        text.parse::<f64>()
            .map_err(|_| ParseError::unknown_value(element, "content", text))?,
    );
    Ok(())
}

impl Parsable for Tags {
    fn element_name() -> &'static str {
        "tags"
    }

    fn element_prefix() -> Option<&'static str> {
        Some("exif")
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        if string_from_element(child, "exif:make", ParseOptions::NONE, &mut self.make)?
            || string_from_element(child, "exif:model", ParseOptions::NONE, &mut self.model)?
            || string_from_element(
                child,
                "exif:imageUniqueID",
                ParseOptions::NONE,
                &mut self.image_unique_id,
            )?
        {
            return Ok(true);
        }
        if child.matches("exif:distance") {
            parse_float(child, &mut self.distance)?;
            return Ok(true);
        }
        if child.matches("exif:exposure") {
            parse_float(child, &mut self.exposure)?;
            return Ok(true);
        }
        if child.matches("exif:fstop") {
            parse_float(child, &mut self.fstop)?;
            return Ok(true);
        }
        if child.matches("exif:focallength") {
            parse_float(child, &mut self.focal_length)?;
            return Ok(true);
        }
        if child.matches("exif:iso") {
            let text = child.text();
            self.iso = Some(
                text.parse::<i64>()
                    .map_err(|_| ParseError::unknown_value(child, "content", text))?,
            );
            return Ok(true);
        }
        if child.matches("exif:flash") {
            self.flash = Some(match child.text() {
                "true" => true,
                "false" => false,
                other => return Err(ParseError::unknown_value(child, "content", other)),
            });
            return Ok(true);
        }
        if child.matches("exif:time") {
            let text = child.text();
            let millis = text
                .parse::<i64>()
                .map_err(|_| ParseError::unknown_value(child, "content", text))?;
            self.time = Some(
                Utc.timestamp_millis_opt(millis)
                    .single()
                    .ok_or_else(|| ParseError::unknown_value(child, "content", text))?,
            );
            return Ok(true);
        }
        Ok(false)
    }

    fn build_xml_content(&self, xml: &mut String) {
        if let Some(fstop) = self.fstop {
            xml.push_str(&format!("<exif:fstop>{fstop}</exif:fstop>"));
        }
        if let Some(make) = &self.make {
            append_escaped_with(xml, "<exif:make>", make, "</exif:make>");
        }
        if let Some(model) = &self.model {
            append_escaped_with(xml, "<exif:model>", model, "</exif:model>");
        }
        if let Some(distance) = self.distance {
            xml.push_str(&format!("<exif:distance>{distance}</exif:distance>"));
        }
        if let Some(exposure) = self.exposure {
            xml.push_str(&format!("<exif:exposure>{exposure}</exif:exposure>"));
        }
        if let Some(flash) = self.flash {
            xml.push_str(&format!("<exif:flash>{flash}</exif:flash>"));
        }
        if let Some(focal_length) = self.focal_length {
            xml.push_str(&format!(
                "<exif:focallength>{focal_length}</exif:focallength>"
            ));
        }
        if let Some(iso) = self.iso {
            xml.push_str(&format!("<exif:iso>{iso}</exif:iso>"));
        }
        if let Some(time) = self.time {
            xml.push_str(&format!("<exif:time>{}</exif:time>", time.timestamp_millis()));
        }
        if let Some(id) = &self.image_unique_id {
            append_escaped_with(xml, "<exif:imageUniqueID>", id, "</exif:imageUniqueID>");
        }
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.insert("exif", EXIF_NAMESPACE);
    }
}
