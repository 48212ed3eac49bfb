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

use crate::domain::AuthorizationDomain;
use crate::error::ErrorKind;

/// Which error-envelope dialect a service speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDialect {
    /// An `<errors>` document with `<error>` children.
    Xml,
    /// A `{"error": {"errors": [...]}}` document.
    Json,
}

/// An entry in a service's error table: a `(domain, code)` pair from the
/// error envelope, mapped to a typed error kind. `"*"` as the domain
/// matches any domain.
pub type ErrorMapping = ((&'static str, &'static str), ErrorKind);

/// The static description of one GData service.
///
/// Service facade crates declare one of these per service as a constant;
/// the request pipeline reads everything service-specific from it: where to
/// authenticate, which error dialect to parse, how to translate error codes,
/// and the odd URI quirk.
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    name: &'static str,
    authorization_domain: AuthorizationDomain,
    error_dialect: ErrorDialect,
    error_table: &'static [ErrorMapping],
    version_header: Option<(&'static str, &'static str)>,
    developer_key_param: Option<&'static str>,
    rewrite_entry_uri: Option<fn(&str) -> String>,
    resumable_upload_uri: Option<&'static str>,
    supports_batch: bool,
}

impl ServiceDescriptor {
    pub const fn new(
        name: &'static str,
        authorization_domain: AuthorizationDomain,
        error_dialect: ErrorDialect,
    ) -> Self {
        Self {
            name,
            authorization_domain,
            error_dialect,
            error_table: &[],
            version_header: None,
            developer_key_param: None,
            rewrite_entry_uri: None,
            resumable_upload_uri: None,
            supports_batch: false,
        }
    }

    /// Sets the `(domain, code)` → kind table consulted for structured
    /// error envelopes.
    pub const fn with_error_table(mut self, error_table: &'static [ErrorMapping]) -> Self {
        self.error_table = error_table;
        self
    }

    /// Sets a protocol-version header attached to every request, e.g.
    /// `("GData-Version", "2")`.
    pub const fn with_version_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.version_header = Some((name, value));
        self
    }

    /// Sets the query-parameter name carrying the developer key on
    /// unauthenticated calls.
    pub const fn with_developer_key_param(mut self, param: &'static str) -> Self {
        self.developer_key_param = Some(param);
        self
    }

    /// Sets a rewriter applied to entry `edit`/`self` URIs before use.
    pub const fn with_entry_uri_rewriter(mut self, rewriter: fn(&str) -> String) -> Self {
        self.rewrite_entry_uri = Some(rewriter);
        self
    }

    /// Sets the endpoint of the two-phase resumable upload protocol.
    pub const fn with_resumable_upload_uri(mut self, uri: &'static str) -> Self {
        self.resumable_upload_uri = Some(uri);
        self
    }

    /// Marks the service as accepting batch feeds.
    pub const fn with_batch_support(mut self) -> Self {
        self.supports_batch = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn authorization_domain(&self) -> &AuthorizationDomain {
        &self.authorization_domain
    }

    pub fn error_dialect(&self) -> ErrorDialect {
        self.error_dialect
    }

    pub fn version_header(&self) -> Option<(&'static str, &'static str)> {
        self.version_header
    }

    pub fn developer_key_param(&self) -> Option<&'static str> {
        self.developer_key_param
    }

    pub fn resumable_upload_uri(&self) -> Option<&'static str> {
        self.resumable_upload_uri
    }

    pub fn supports_batch(&self) -> bool {
        self.supports_batch
    }

    /// Applies the service's entry-URI rewriter, if it declares one.
    pub fn rewrite_entry_uri(&self, uri: &str) -> String {
        match self.rewrite_entry_uri {
            Some(rewrite) => rewrite(uri),
            None => uri.to_string(),
        }
    }

    /// Translates an error envelope's `(domain, code)` pair through the
    /// service's error table.
    pub fn lookup_error(&self, domain: &str, code: &str) -> Option<ErrorKind> {
        self.error_table
            .iter()
            .find(|((d, c), _)| (*d == "*" || *d == domain) && *c == code)
            .map(|(_, kind)| *kind)
    }
}
