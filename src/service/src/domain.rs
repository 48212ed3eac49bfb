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

/// One independently-authorizable scope of a GData service.
///
/// Most services have a single domain; a few (the documents service, for
/// example) split read and write access. Services declare their domains as
/// constants, and an [Authorizer][crate::Authorizer] grants or withholds
/// tokens per domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorizationDomain {
    service_name: &'static str,
    scope: &'static str,
}

impl AuthorizationDomain {
    /// Declares a domain. `service_name` is a stable identifier for the
    /// owning service; `scope` is the OAuth scope URI requested for it.
    pub const fn new(service_name: &'static str, scope: &'static str) -> Self {
        Self {
            service_name,
            scope,
        }
    }

    pub fn service_name(&self) -> &'static str {
        self.service_name
    }

    /// The OAuth scope URI to request for this domain.
    pub fn scope(&self) -> &'static str {
        self.scope
    }
}
