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

//! The Google Calendar binding.
//!
//! Calendar moved to JSON endpoints with v3 of its API; the legacy Atom
//! scope string is still what the authorization server expects.

use gdata_service::{AuthorizationDomain, ErrorDialect, ServiceDescriptor};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The domain authorizing access to a user's calendars.
pub const AUTHORIZATION_DOMAIN: AuthorizationDomain =
    AuthorizationDomain::new("cl", "https://www.google.com/calendar/feeds/");

/// The Calendar service descriptor.
pub const DESCRIPTOR: ServiceDescriptor =
    ServiceDescriptor::new("calendar", AUTHORIZATION_DOMAIN, ErrorDialect::Json)
        .with_batch_support();

/// The list of calendars visible to the authenticated user.
pub fn calendar_list_uri() -> String {
    "https://www.googleapis.com/calendar/v3/users/me/calendarList".to_string()
}

/// The calendars the authenticated user owns.
pub fn owned_calendar_list_uri() -> String {
    "https://www.googleapis.com/calendar/v3/users/me/calendarList?minAccessRole=owner".to_string()
}

/// The event collection of one calendar.
pub fn events_uri(calendar_id: &str) -> String {
    format!(
        "https://www.googleapis.com/calendar/v3/calendars/{}/events",
        utf8_percent_encode(calendar_id, PATH_SEGMENT)
    )
}
