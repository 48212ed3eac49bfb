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

//! The Google Contacts binding.

use gdata_service::{
    AuthorizationDomain, ErrorDialect, Query, QueryParams, ServiceDescriptor, UriBuilder,
};

/// The domain authorizing access to a user's contacts.
pub const AUTHORIZATION_DOMAIN: AuthorizationDomain =
    AuthorizationDomain::new("cp", "https://www.google.com/m8/feeds/");

/// The Contacts service descriptor.
pub const DESCRIPTOR: ServiceDescriptor =
    ServiceDescriptor::new("contacts", AUTHORIZATION_DOMAIN, ErrorDialect::Xml)
        .with_version_header("GData-Version", "3")
        .with_batch_support();

/// The full contacts feed of the authenticated user.
pub fn contacts_feed_uri() -> String {
    "https://www.google.com/m8/feeds/contacts/default/full".to_string()
}

/// The contact-groups feed of the authenticated user.
pub fn groups_feed_uri() -> String {
    "https://www.google.com/m8/feeds/groups/default/full".to_string()
}

/// A contacts query.
///
/// Adds the group filter and the deleted-contacts switch to the standard
/// parameters.
#[derive(Debug, Clone, Default)]
pub struct ContactsQuery {
    base: Query,
    group: Option<String>,
    show_deleted: bool,
}

impl ContactsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ID of a contact group to restrict results to.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn set_group(&mut self, group: Option<&str>) {
        self.group = group.map(str::to_string);
        self.base.clear_etag();
    }

    /// Whether deleted contacts appear in the results.
    pub fn show_deleted(&self) -> bool {
        self.show_deleted
    }

    pub fn set_show_deleted(&mut self, show_deleted: bool) {
        self.show_deleted = show_deleted;
        self.base.clear_etag();
    }
}

impl QueryParams for ContactsQuery {
    fn base(&self) -> &Query {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Query {
        &mut self.base
    }

    fn append_service_params(&self, uri: &mut UriBuilder) {
        if let Some(group) = &self.group {
            uri.append_param("group", group);
        }
        if self.show_deleted {
            uri.append_param("showdeleted", "true");
        }
    }
}
