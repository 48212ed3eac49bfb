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

//! The YouTube Data API binding.
//!
//! YouTube speaks the JSON error dialect and accepts a developer key as the
//! `key` query parameter on unauthenticated calls. Batch feeds were removed
//! with v3 of the API, so the descriptor does not advertise them.

use gdata_atom::media::{Group, Thumbnail};
use gdata_atom::{AsEntry, Entry};
use gdata_parsable::{Element, Namespaces, Parsable, ParseError, parse_xml_element};
use gdata_service::{
    AuthorizationDomain, ErrorDialect, ErrorKind, ErrorMapping, Query, QueryParams,
    ServiceDescriptor, UriBuilder,
};
use serde_json::Value;

/// The domain authorizing read access to YouTube accounts.
pub const AUTHORIZATION_DOMAIN: AuthorizationDomain =
    AuthorizationDomain::new("youtube", "https://www.googleapis.com/auth/youtube");

/// The domain authorizing full account access over SSL.
pub const FORCE_SSL_AUTHORIZATION_DOMAIN: AuthorizationDomain = AuthorizationDomain::new(
    "youtube-force-ssl",
    "https://www.googleapis.com/auth/youtube.force-ssl",
);

const ERROR_TABLE: &[ErrorMapping] = &[
    (
        ("usageLimits", "dailyLimitExceededUnreg"),
        ErrorKind::ApiQuotaExceeded,
    ),
    (("*", "rateLimitExceeded"), ErrorKind::EntryQuotaExceeded),
    (("global", "authError"), ErrorKind::AuthenticationRequired),
    (("global", "required"), ErrorKind::AuthenticationRequired),
    (("*", "youtubeSignupRequired"), ErrorKind::ChannelRequired),
];

/// The YouTube service descriptor.
pub const DESCRIPTOR: ServiceDescriptor =
    ServiceDescriptor::new("youtube", AUTHORIZATION_DOMAIN, ErrorDialect::Json)
        .with_error_table(ERROR_TABLE)
        .with_developer_key_param("key")
        .with_resumable_upload_uri(
            "https://www.googleapis.com/upload/youtube/v3/videos\
             ?uploadType=resumable&part=snippet,status,recordingDetails",
        );

/// The feed of the currently most popular videos. The other standard feeds
/// of the older API versions were retired; they all fall back to this one
/// on the server.
pub fn most_popular_feed_uri() -> String {
    "https://www.googleapis.com/youtube/v3/videos?part=snippet&chart=mostPopular".to_string()
}

/// The endpoint accepting direct (single-request) video uploads.
pub fn upload_uri() -> String {
    "https://www.googleapis.com/upload/youtube/v3/videos?part=snippet,status,recordingDetails"
        .to_string()
}

/// How a video search orders its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoOrder {
    Relevance,
    Date,
    ViewCount,
    Rating,
}

impl VideoOrder {
    fn as_param(self) -> &'static str {
        match self {
            VideoOrder::Relevance => "relevance",
            VideoOrder::Date => "date",
            VideoOrder::ViewCount => "viewCount",
            VideoOrder::Rating => "rating",
        }
    }
}

/// How strictly restricted content is filtered out of search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeSearch {
    None,
    Moderate,
    Strict,
}

impl SafeSearch {
    fn as_param(self) -> &'static str {
        match self {
            SafeSearch::None => "none",
            SafeSearch::Moderate => "moderate",
            SafeSearch::Strict => "strict",
        }
    }
}

/// A video search query.
///
/// Wraps the standard [Query] parameters and contributes the YouTube
/// search parameters on top of them.
#[derive(Debug, Clone, Default)]
pub struct VideoQuery {
    base: Query,
    order: Option<VideoOrder>,
    safe_search: Option<SafeSearch>,
    restriction: Option<String>,
}

impl VideoQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&self) -> Option<VideoOrder> {
        self.order
    }

    pub fn set_order(&mut self, order: Option<VideoOrder>) {
        self.order = order;
        self.base.clear_etag();
    }

    pub fn safe_search(&self) -> Option<SafeSearch> {
        self.safe_search
    }

    pub fn set_safe_search(&mut self, safe_search: Option<SafeSearch>) {
        self.safe_search = safe_search;
        self.base.clear_etag();
    }

    /// An ISO 3166 country code restricting results to videos playable
    /// there.
    pub fn restriction(&self) -> Option<&str> {
        self.restriction.as_deref()
    }

    pub fn set_restriction(&mut self, restriction: Option<&str>) {
        self.restriction = restriction.map(str::to_string);
        self.base.clear_etag();
    }
}

impl QueryParams for VideoQuery {
    fn base(&self) -> &Query {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Query {
        &mut self.base
    }

    fn append_service_params(&self, uri: &mut UriBuilder) {
        if let Some(order) = self.order {
            uri.append_param("order", order.as_param());
        }
        if let Some(safe_search) = self.safe_search {
            uri.append_param("safeSearch", safe_search.as_param());
        }
        if let Some(restriction) = &self.restriction {
            uri.append_param("regionCode", restriction);
        }
    }
}

/// A YouTube video.
///
/// The Atom core carries the usual identity and links; the video's visual
/// metadata lives in its `media:group` extension. When the group carries a
/// title it is authoritative, since the feed-level Atom title may be
/// truncated by the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoEntry {
    entry: Entry,
    media: Group,
}

impl VideoEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The video's media metadata.
    pub fn media(&self) -> &Group {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut Group {
        self.entry.clear_etag();
        &mut self.media
    }

    /// The video title, preferring the media group's over the Atom one.
    pub fn title(&self) -> &str {
        self.media.title().unwrap_or_else(|| self.entry.title())
    }

    /// The video description from the media group.
    pub fn description(&self) -> Option<&str> {
        self.media.description()
    }

    pub fn thumbnails(&self) -> &[gdata_atom::media::Thumbnail] {
        self.media.thumbnails()
    }
}

impl AsEntry for VideoEntry {
    fn entry(&self) -> &Entry {
        &self.entry
    }
    fn entry_mut(&mut self) -> &mut Entry {
        &mut self.entry
    }
}

impl Parsable for VideoEntry {
    fn element_name() -> &'static str {
        "entry"
    }

    fn pre_parse_xml(&mut self, root: &Element) -> Result<(), ParseError> {
        self.entry.pre_parse_xml(root)
    }

    fn parse_xml_child(&mut self, child: &Element) -> Result<bool, ParseError> {
        if self.entry.parse_xml_child(child)? {
            return Ok(true);
        }
        if child.matches("media:group") {
            self.media = parse_xml_element::<Group>(child)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn post_parse_xml(&mut self) -> Result<(), ParseError> {
        self.entry.post_parse_xml()
    }

    fn build_xml_attributes(&self, xml: &mut String) {
        self.entry.build_xml_attributes(xml);
    }

    fn build_xml_content(&self, xml: &mut String) {
        self.entry.build_xml_content(xml);
        gdata_parsable::build_xml(&self.media, xml);
    }

    fn add_namespaces(&self, namespaces: &mut Namespaces) {
        self.entry.add_namespaces(namespaces);
        self.media.add_namespaces(namespaces);
    }

    /// The JSON endpoints flatten the media group into the `snippet`
    /// member.
    fn parse_json_pair(&mut self, key: &str, value: &Value) -> Result<bool, ParseError> {
        if self.entry.parse_json_pair(key, value)? {
            return Ok(true);
        }
        if key == "snippet" {
            if let Some(snippet) = value.as_object() {
                if let Some(title) = snippet.get("title").and_then(Value::as_str) {
                    self.media.set_title(Some(title));
                }
                if let Some(description) = snippet.get("description").and_then(Value::as_str) {
                    self.media.set_description(Some(description));
                }
                if let Some(thumbnails) = snippet.get("thumbnails").and_then(Value::as_object) {
                    // Keyed by size name ("default", "medium", ...); the
                    // names carry no information beyond the dimensions.
                    for size in thumbnails.values() {
                        let Some(url) = size.get("url").and_then(Value::as_str) else {
                            continue;
                        };
                        let mut thumbnail = Thumbnail::new(url);
                        thumbnail
                            .set_width(size.get("width").and_then(Value::as_u64).map(|w| w as u32));
                        thumbnail.set_height(
                            size.get("height").and_then(Value::as_u64).map(|h| h as u32),
                        );
                        self.media.add_thumbnail(thumbnail);
                    }
                }
            }
            return Ok(true);
        }
        Ok(false)
    }

    fn build_json(&self) -> Value {
        let mut json = self.entry.build_json();
        let mut snippet = serde_json::Map::new();
        if let Some(title) = self.media.title() {
            snippet.insert("title".to_string(), Value::String(title.to_string()));
        }
        if let Some(description) = self.media.description() {
            snippet.insert(
                "description".to_string(),
                Value::String(description.to_string()),
            );
        }
        if !snippet.is_empty() {
            if let Value::Object(map) = &mut json {
                map.insert("snippet".to_string(), Value::Object(snippet));
            }
        }
        json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdata_parsable::{parse_xml, to_xml};

    #[test]
    fn error_table_covers_the_quota_reasons() {
        assert_eq!(
            DESCRIPTOR.lookup_error("usageLimits", "dailyLimitExceededUnreg"),
            Some(ErrorKind::ApiQuotaExceeded)
        );
        assert_eq!(
            DESCRIPTOR.lookup_error("youtube.quota", "rateLimitExceeded"),
            Some(ErrorKind::EntryQuotaExceeded)
        );
        assert_eq!(
            DESCRIPTOR.lookup_error("global", "authError"),
            Some(ErrorKind::AuthenticationRequired)
        );
        assert_eq!(
            DESCRIPTOR.lookup_error("global", "youtubeSignupRequired"),
            Some(ErrorKind::ChannelRequired)
        );
        assert_eq!(DESCRIPTOR.lookup_error("global", "backendError"), None);
    }

    #[test]
    fn descriptor_is_json_with_developer_key() {
        assert_eq!(DESCRIPTOR.error_dialect(), ErrorDialect::Json);
        assert_eq!(DESCRIPTOR.developer_key_param(), Some("key"));
        assert!(!DESCRIPTOR.supports_batch());
        assert!(DESCRIPTOR.resumable_upload_uri().is_some());
    }

    #[test]
    fn video_query_appends_search_params() {
        let mut query = VideoQuery::new();
        query.base_mut().set_q(Some("cats"));
        query.base_mut().set_max_results(5);
        query.set_order(Some(VideoOrder::ViewCount));
        query.set_safe_search(Some(SafeSearch::Moderate));
        assert_eq!(
            query.build_uri("https://www.googleapis.com/youtube/v3/search"),
            "https://www.googleapis.com/youtube/v3/search\
             ?q=cats&max-results=5&order=viewCount&safeSearch=moderate"
        );
    }

    #[test]
    fn video_entry_prefers_media_title() -> anyhow::Result<()> {
        let xml = br#"<entry xmlns='http://www.w3.org/2005/Atom'
            xmlns:media='http://search.yahoo.com/mrss/'>
            <id>yt:video:dQw4w9WgXcQ</id>
            <title type='text'>Truncated ti...</title>
            <media:group>
                <media:title type='plain'>The full video title</media:title>
                <media:description type='plain'>A description.</media:description>
                <media:thumbnail url='https://i.ytimg.com/vi/x/default.jpg'
                    width='120' height='90'/>
            </media:group>
        </entry>"#;
        let video: VideoEntry = parse_xml(xml)?;
        assert_eq!(video.title(), "The full video title");
        assert_eq!(video.description(), Some("A description."));
        assert_eq!(video.thumbnails().len(), 1);
        Ok(())
    }

    #[test]
    fn video_entry_reads_the_json_snippet() -> anyhow::Result<()> {
        let json = br#"{
            "kind": "youtube#video",
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "title": "A classic",
                "description": "You know the one.",
                "thumbnails": {
                    "default": {
                        "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg",
                        "width": 120,
                        "height": 90
                    },
                    "high": {
                        "url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg",
                        "width": 480,
                        "height": 360
                    }
                }
            }
        }"#;
        let video: VideoEntry = gdata_parsable::parse_json(json)?;
        assert_eq!(video.entry().id(), Some("dQw4w9WgXcQ"));
        assert_eq!(video.title(), "A classic");
        assert_eq!(video.description(), Some("You know the one."));
        assert_eq!(video.thumbnails().len(), 2);

        let json = gdata_parsable::to_json(&video);
        assert!(json.contains("\"snippet\""), "{json}");
        assert!(json.contains("A classic"), "{json}");
        Ok(())
    }

    #[test]
    fn video_entry_serializes_its_group() -> anyhow::Result<()> {
        let mut video = VideoEntry::new();
        video.entry_mut().set_title("A walkthrough");
        video.media_mut().set_description(Some("Start to finish."));
        let xml = to_xml(&video);
        assert!(xml.contains("xmlns:media='http://search.yahoo.com/mrss/'"), "{xml}");
        assert!(xml.contains("<media:description type='plain'>Start to finish.</media:description>"));
        let reparsed: VideoEntry = parse_xml(xml.as_bytes())?;
        assert_eq!(reparsed.description(), Some("Start to finish."));
        Ok(())
    }
}
