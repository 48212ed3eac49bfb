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

//! Walking the most-popular videos feed page by page.

use gdata::youtube::{self, VideoEntry, VideoQuery};
use gdata::{AsEntry, QueryParams, Service};
use httptest::{Expectation, Server, matchers::*, responders::*};
use std::collections::HashSet;

fn video_feed(ids: &[&str]) -> String {
    let items: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"kind": "youtube#video", "id": "{id}",
                    "snippet": {{"title": "Video {id}",
                    "thumbnails": {{"default": {{
                    "url": "https://i.ytimg.com/vi/{id}/default.jpg",
                    "width": 120, "height": 90}}}}}}}}"#
            )
        })
        .collect();
    format!(
        r#"{{"kind": "youtube#videoListResponse", "items": [{}]}}"#,
        items.join(",")
    )
}

#[tokio::test]
async fn most_popular_pages_do_not_overlap() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/videos"),
            request::query(url_decoded(contains(("chart", "mostPopular")))),
            request::query(url_decoded(contains(("max-results", "5")))),
            request::query(url_decoded(not(contains(key("start-index"))))),
        ])
        .respond_with(status_code(200).body(video_feed(&["a1", "a2", "a3", "a4", "a5"]))),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/videos"),
            request::query(url_decoded(contains(("start-index", "6")))),
        ])
        .respond_with(status_code(200).body(video_feed(&["b1", "b2", "b3", "b4", "b5"]))),
    );

    let feed_uri = format!("{}?part=snippet&chart=mostPopular", server.url_str("/videos"));
    let service = Service::builder(&youtube::DESCRIPTOR).build();
    let mut query = VideoQuery::new();
    query.base_mut().set_max_results(5);

    let first = service
        .query::<VideoEntry, _>(&feed_uri, &mut query)
        .await?
        .ok_or_else(|| anyhow::anyhow!("expected a first page"))?;
    assert_eq!(first.entries().len(), 5);

    query.base_mut().next_page();
    let second = service
        .query::<VideoEntry, _>(&feed_uri, &mut query)
        .await?
        .ok_or_else(|| anyhow::anyhow!("expected a second page"))?;
    assert_eq!(second.entries().len(), 5);

    let first_ids: HashSet<_> = first
        .entries()
        .iter()
        .filter_map(|v| v.entry().id())
        .collect();
    let second_ids: HashSet<_> = second
        .entries()
        .iter()
        .filter_map(|v| v.entry().id())
        .collect();
    assert!(first_ids.is_disjoint(&second_ids));

    for video in first.entries() {
        assert!(!video.title().is_empty());
        assert_eq!(video.thumbnails().len(), 1);
    }
    Ok(())
}

#[tokio::test]
async fn quota_errors_map_through_the_youtube_table() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/videos")).respond_with(
            status_code(403).body(
                r#"{"error": {"errors": [{"domain": "usageLimits",
                    "reason": "dailyLimitExceededUnreg",
                    "message": "Daily Limit for Unauthenticated Use Exceeded."}],
                    "message": "Daily Limit for Unauthenticated Use Exceeded."}}"#,
            ),
        ),
    );

    let service = Service::builder(&youtube::DESCRIPTOR).build();
    let mut query = VideoQuery::new();
    let err = service
        .query::<VideoEntry, _>(&server.url_str("/videos"), &mut query)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), gdata::ErrorKind::ApiQuotaExceeded);
    assert_eq!(
        err.message(),
        Some("Daily Limit for Unauthenticated Use Exceeded.")
    );
    Ok(())
}
