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

//! GeoRSS extension elements, used to attach a geographic location to an
//! entry.

use gdata_parsable::{Element, Namespaces, ParseError, Parsable};

/// The GeoRSS namespace.
pub const GEORSS_NAMESPACE: &str = "http://www.georss.org/georss";
/// The GML namespace, used for the point encoding inside `georss:where`.
pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml";

/// A `georss:where` element holding a single GML point.
///
/// Coordinates are stored only when they are in range: latitudes beyond
/// ±90° and longitudes beyond ±180° are treated as unset, both when parsed
/// and when passed to a setter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latitude in degrees, in `[-90, 90]`.
    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    /// The longitude in degrees, in `[-180, 180]`.
    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    /// Sets the latitude. An out-of-range value unsets it instead.
    pub fn set_latitude(&mut self, latitude: f64) {
        self.latitude = (-90.0..=90.0).contains(&latitude).then_some(latitude);
    }

    /// Sets the longitude. An out-of-range value unsets it instead.
    pub fn set_longitude(&mut self, longitude: f64) {
        self.longitude = (-180.0..=180.0).contains(&longitude).then_some(longitude);
    }
}

impl Parsable for Where {
    fn element_name() -> &'static str {
        "where"
    }

    fn element_prefix() -> Option<&'static str> {
        Some("georss")
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        if !child.matches("gml:Point") {
            return Ok(false);
        }
        let pos = match child.child("gml:pos") {
            Some(pos) => pos,
            None => return Err(ParseError::missing_element(child, "gml:pos")),
        };
        let mut parts = pos.text().split_whitespace();
        let latitude = parts.next().and_then(|p| p.parse::<f64>().ok());
        let longitude = parts.next().and_then(|p| p.parse::<f64>().ok());
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => {
                self.set_latitude(latitude);
                self.set_longitude(longitude);
                Ok(true)
            }
            _ => Err(ParseError::missing_content(pos)),
        }
    }

    fn build_xml_content(&self, xml: &mut String) {
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            xml.push_str("<gml:Point><gml:pos>");
            xml.push_str(&format!("{latitude} {longitude}"));
            xml.push_str("</gml:pos></gml:Point>");
        }
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        namespaces.insert("georss", GEORSS_NAMESPACE);
        namespaces.insert("gml", GML_NAMESPACE);
    }
}
