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

//! The PicasaWeb Albums binding.
//!
//! PicasaWeb is a classic Atom service: XML error envelopes, a
//! `GData-Version` header, and one URI quirk. Entry IDs name entries as
//! `.../data/entry/user/...`, but the entry request URIs carry an extra
//! segment, `.../data/entry/api/user/...`, so the descriptor rewrites edit
//! and self URIs before use.

use gdata_service::{AuthorizationDomain, ErrorDialect, ServiceDescriptor};

/// The domain authorizing access to a user's albums and photos.
pub const AUTHORIZATION_DOMAIN: AuthorizationDomain =
    AuthorizationDomain::new("lh2", "http://picasaweb.google.com/data/");

fn rewrite_entry_uri(uri: &str) -> String {
    uri.replacen("/entry/user/", "/entry/api/user/", 1)
}

/// The PicasaWeb service descriptor.
pub const DESCRIPTOR: ServiceDescriptor =
    ServiceDescriptor::new("picasaweb", AUTHORIZATION_DOMAIN, ErrorDialect::Xml)
        .with_version_header("GData-Version", "2")
        .with_entry_uri_rewriter(rewrite_entry_uri);

/// The album feed of the given user; `"default"` names the authenticated
/// user.
pub fn user_feed_uri(username: &str) -> String {
    format!("https://picasaweb.google.com/data/feed/api/user/{username}")
}

/// The upload endpoint of one of the authenticated user's albums.
pub fn album_upload_uri(album_id: &str) -> String {
    format!("https://picasaweb.google.com/data/feed/api/user/default/albumid/{album_id}")
}

/// The drop-box album accepting uploads outside any real album.
pub fn dropbox_upload_uri() -> String {
    "https://picasaweb.google.com/data/feed/api/user/default/albumid/default".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_uri_gains_the_api_segment() {
        assert_eq!(
            DESCRIPTOR.rewrite_entry_uri(
                "https://picasaweb.google.com/data/entry/user/liz/albumid/5/photoid/9"
            ),
            "https://picasaweb.google.com/data/entry/api/user/liz/albumid/5/photoid/9"
        );
    }

    #[test]
    fn rewrite_does_not_double_up() {
        let already = "https://picasaweb.google.com/data/entry/api/user/liz/albumid/5";
        assert_eq!(DESCRIPTOR.rewrite_entry_uri(already), already);
    }

    #[test]
    fn descriptor_speaks_versioned_xml() {
        assert_eq!(DESCRIPTOR.error_dialect(), ErrorDialect::Xml);
        assert_eq!(DESCRIPTOR.version_header(), Some(("GData-Version", "2")));
    }

    #[test]
    fn feed_uris() {
        assert_eq!(
            user_feed_uri("liz"),
            "https://picasaweb.google.com/data/feed/api/user/liz"
        );
        assert!(album_upload_uri("42").ends_with("/albumid/42"));
    }
}
