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

//! The Google Documents binding.
//!
//! Documents uploads go through a two-phase resumable protocol: an
//! initiating request against the `create-session` endpoint yields a
//! session URI, and the content bytes follow against that. Creating a
//! document from metadata alone is the degenerate case, an initiating
//! request with no content.

use gdata_service::{AuthorizationDomain, ErrorDialect, ServiceDescriptor};

/// The domain authorizing access to a user's documents.
pub const AUTHORIZATION_DOMAIN: AuthorizationDomain =
    AuthorizationDomain::new("writely", "https://www.googleapis.com/auth/drive");

/// The domain authorizing access to spreadsheet content, which lives on a
/// separate host.
pub const SPREADSHEETS_AUTHORIZATION_DOMAIN: AuthorizationDomain =
    AuthorizationDomain::new("wise", "https://spreadsheets.google.com/feeds/");

/// The Documents service descriptor.
pub const DESCRIPTOR: ServiceDescriptor =
    ServiceDescriptor::new("documents", AUTHORIZATION_DOMAIN, ErrorDialect::Xml)
        .with_version_header("GData-Version", "3")
        .with_resumable_upload_uri(
            "https://docs.google.com/feeds/upload/create-session/default/private/full",
        )
        .with_batch_support();

/// The feed of all documents the authenticated user can reach.
pub fn documents_feed_uri() -> String {
    "https://docs.google.com/feeds/default/private/full".to_string()
}
