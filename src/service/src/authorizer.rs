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

use crate::Result;
use crate::domain::AuthorizationDomain;
use async_trait::async_trait;

/// Supplies access tokens for the authorization domains a service uses.
///
/// The pipeline consults the authorizer before every request. When a request
/// comes back `401 Unauthorized`, the pipeline calls [refresh]
/// once and retries; a second `401` surfaces as
/// [AuthenticationRequired][crate::ErrorKind::AuthenticationRequired].
///
/// [refresh]: Authorizer::refresh
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Returns a bearer token for `domain`, or `None` when the domain is not
    /// authorized. Unauthorized requests proceed without credentials; public
    /// feeds accept them.
    async fn access_token(&self, domain: &AuthorizationDomain) -> Result<Option<String>>;

    /// True when [access_token][Self::access_token] would return a token for
    /// `domain` without further user interaction.
    fn is_authorized_for(&self, domain: &AuthorizationDomain) -> bool;

    /// Obtains fresh credentials after the current ones were rejected.
    async fn refresh(&self) -> Result<()>;
}

/// An authorizer with no credentials. Every request goes out unauthorized;
/// only public feeds will answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthorizer;

#[async_trait]
impl Authorizer for NoAuthorizer {
    async fn access_token(&self, _domain: &AuthorizationDomain) -> Result<Option<String>> {
        Ok(None)
    }

    fn is_authorized_for(&self, _domain: &AuthorizationDomain) -> bool {
        false
    }

    async fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

/// An authorizer holding a fixed, externally-obtained token.
///
/// Useful when token acquisition happens elsewhere (a desktop keyring, a
/// test fixture) and the pipeline only needs to attach the result. The token
/// is served for every domain and [refresh][Authorizer::refresh] is a no-op.
#[derive(Debug, Clone)]
pub struct StaticAuthorizer {
    token: String,
}

impl StaticAuthorizer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl Authorizer for StaticAuthorizer {
    async fn access_token(&self, _domain: &AuthorizationDomain) -> Result<Option<String>> {
        Ok(Some(self.token.clone()))
    }

    fn is_authorized_for(&self, _domain: &AuthorizationDomain) -> bool {
        true
    }

    async fn refresh(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: AuthorizationDomain = AuthorizationDomain::new("t", "https://example.com/auth");

    #[tokio::test]
    async fn static_authorizer_serves_every_domain() -> anyhow::Result<()> {
        let authorizer = StaticAuthorizer::new("ya29.token");
        assert!(authorizer.is_authorized_for(&DOMAIN));
        assert_eq!(
            authorizer.access_token(&DOMAIN).await?,
            Some("ya29.token".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn no_authorizer_serves_nothing() -> anyhow::Result<()> {
        let authorizer = NoAuthorizer;
        assert!(!authorizer.is_authorized_for(&DOMAIN));
        assert_eq!(authorizer.access_token(&DOMAIN).await?, None);
        Ok(())
    }
}
