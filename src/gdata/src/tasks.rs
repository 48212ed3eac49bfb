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

//! The Google Tasks binding.
//!
//! Tasks is pure JSON: entries and feeds parse through the JSON side of
//! the framework, pagination runs on opaque `pageToken` cursors, and
//! errors arrive in the JSON envelope.

use gdata_service::{AuthorizationDomain, ErrorDialect, Query, ServiceDescriptor};

/// The domain authorizing access to a user's task lists.
pub const AUTHORIZATION_DOMAIN: AuthorizationDomain =
    AuthorizationDomain::new("tasks", "https://www.googleapis.com/auth/tasks");

/// The Tasks service descriptor.
pub const DESCRIPTOR: ServiceDescriptor =
    ServiceDescriptor::new("tasks", AUTHORIZATION_DOMAIN, ErrorDialect::Json);

/// All task lists of the authenticated account.
pub fn all_tasklists_uri() -> String {
    "https://www.googleapis.com/tasks/v1/users/@me/lists".to_string()
}

/// The tasks of one task list.
pub fn tasks_uri(tasklist_id: &str) -> String {
    format!("https://www.googleapis.com/tasks/v1/lists/{tasklist_id}/tasks")
}

/// A query over tasks feeds. Tasks only paginates forward, by tokens.
pub fn query() -> Query {
    Query::with_tokens_pagination()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdata_service::QueryParams;

    #[test]
    fn descriptor_speaks_json_without_versioning() {
        assert_eq!(DESCRIPTOR.error_dialect(), ErrorDialect::Json);
        assert!(DESCRIPTOR.version_header().is_none());
        assert!(!DESCRIPTOR.supports_batch());
    }

    #[test]
    fn token_pagination_only_moves_forward() {
        let mut query = query();
        assert!(!query.is_finished());
        assert!(!query.previous_page());
        query.next_page();
        // Forward with no token stored means the feed is exhausted.
        assert!(query.is_finished());
        assert_eq!(
            query.build_uri(&tasks_uri("list1")),
            "https://www.googleapis.com/tasks/v1/lists/list1/tasks"
        );
    }
}
