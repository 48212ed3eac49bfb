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

//! End-to-end tests of the request pipeline against a local HTTP server.

use async_trait::async_trait;
use gdata_atom::Entry;
use gdata_parsable::parse_xml;
use gdata_service::{
    AuthorizationDomain, Authorizer, Error, ErrorDialect, ErrorKind, ErrorMapping, Query,
    Service, ServiceDescriptor,
};
use httptest::{Expectation, Server, matchers::*, responders::*};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio_util::sync::CancellationToken;

const DOMAIN: AuthorizationDomain =
    AuthorizationDomain::new("test", "https://example.com/auth/test");

const ERROR_TABLE: &[ErrorMapping] = &[
    (("usageLimits", "dailyLimitExceeded"), ErrorKind::ApiQuotaExceeded),
];

static DESCRIPTOR: ServiceDescriptor =
    ServiceDescriptor::new("test", DOMAIN, ErrorDialect::Xml)
        .with_error_table(ERROR_TABLE)
        .with_version_header("GData-Version", "2");

static KEYED_DESCRIPTOR: ServiceDescriptor =
    ServiceDescriptor::new("keyed", DOMAIN, ErrorDialect::Xml).with_developer_key_param("key");

fn feed_body(etag: &str, ids: &[&str]) -> String {
    let mut body = format!(
        "<feed xmlns='http://www.w3.org/2005/Atom' \
         xmlns:gd='http://schemas.google.com/g/2005' \
         xmlns:openSearch='http://a9.com/-/spec/opensearch/1.1/' \
         gd:etag='{etag}'>\
         <title type='text'>Results</title>\
         <openSearch:totalResults>{}</openSearch:totalResults>",
        ids.len()
    );
    for id in ids {
        body.push_str(&format!(
            "<entry><id>{id}</id><title type='text'>Entry {id}</title></entry>"
        ));
    }
    body.push_str("</feed>");
    body
}

#[tokio::test]
async fn query_sends_parameters_and_stores_the_etag() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/feeds/videos"),
            request::query(url_decoded(contains(("q", "cats")))),
            request::query(url_decoded(contains(("max-results", "5")))),
            request::headers(contains(("gdata-version", "2"))),
        ])
        .respond_with(status_code(200).body(feed_body("W/\"C0QBRXcy\"", &["a", "b"]))),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let mut query = Query::new();
    query.set_q(Some("cats"));
    query.set_max_results(5);
    let feed = service
        .query::<Entry, _>(&server.url_str("/feeds/videos"), &mut query)
        .await?
        .ok_or_else(|| anyhow::anyhow!("expected a feed"))?;

    assert_eq!(feed.entries().len(), 2);
    assert!(feed.lookup_entry("a").is_some());
    assert_eq!(query.etag(), Some("W/\"C0QBRXcy\""));
    Ok(())
}

#[tokio::test]
async fn not_modified_yields_none_and_keeps_the_etag() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/feeds/videos"),
            request::headers(not(contains(key("if-none-match")))),
        ])
        .respond_with(status_code(200).body(feed_body("W/\"A\"", &["a"]))),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/feeds/videos"),
            request::headers(contains(("if-none-match", "W/\"A\""))),
        ])
        .respond_with(status_code(304)),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let mut query = Query::new();
    let first = service
        .query::<Entry, _>(&server.url_str("/feeds/videos"), &mut query)
        .await?;
    assert!(first.is_some());

    let second = service
        .query::<Entry, _>(&server.url_str("/feeds/videos"), &mut query)
        .await?;
    assert!(second.is_none());
    assert_eq!(query.etag(), Some("W/\"A\""));
    Ok(())
}

#[tokio::test]
async fn insert_round_trips_the_entry() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/feeds/albums"),
            request::headers(contains(("content-type", "application/atom+xml"))),
            request::body(matches("<title type='text'>Vacation</title>")),
        ])
        .respond_with(status_code(201).body(
            "<entry xmlns='http://www.w3.org/2005/Atom'>\
             <id>albums/1</id><title type='text'>Vacation</title></entry>",
        )),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let mut entry = Entry::new();
    entry.set_title("Vacation");
    let inserted = service
        .insert(&server.url_str("/feeds/albums"), &entry)
        .await?;
    assert_eq!(inserted.id(), Some("albums/1"));
    Ok(())
}

#[tokio::test]
async fn insert_rejects_an_entry_the_server_already_owns() -> anyhow::Result<()> {
    // No expectation: the request must never go out.
    let server = Server::run();
    let service = Service::builder(&DESCRIPTOR).build();
    let entry: Entry = parse_xml(
        b"<entry xmlns='http://www.w3.org/2005/Atom'><id>albums/1</id></entry>" as &[u8],
    )?;
    let err = service
        .insert(&server.url_str("/feeds/albums"), &entry)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EntryAlreadyInserted);
    Ok(())
}

fn editable_entry(server: &Server) -> anyhow::Result<Entry> {
    let xml = format!(
        "<entry xmlns='http://www.w3.org/2005/Atom' \
         xmlns:gd='http://schemas.google.com/g/2005' gd:etag='W/\"Q\"'>\
         <id>albums/1</id><title type='text'>Vacation</title>\
         <link rel='edit' href='{}'/></entry>",
        server.url_str("/feeds/albums/1")
    );
    Ok(parse_xml(xml.as_bytes())?)
}

#[tokio::test]
async fn update_is_conditional_on_the_etag() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("PUT", "/feeds/albums/1"),
            request::headers(contains(("if-match", "W/\"Q\""))),
        ])
        .respond_with(status_code(200).body(
            "<entry xmlns='http://www.w3.org/2005/Atom' \
             xmlns:gd='http://schemas.google.com/g/2005' gd:etag='W/\"R\"'>\
             <id>albums/1</id><title type='text'>Holiday</title></entry>",
        )),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let entry = editable_entry(&server)?;
    let updated = service.update(&entry).await?;
    assert_eq!(updated.title(), "Holiday");
    assert_eq!(updated.etag(), Some("W/\"R\""));
    Ok(())
}

#[tokio::test]
async fn a_lost_race_surfaces_as_a_conflict() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("PUT", "/feeds/albums/1"))
            .respond_with(status_code(412)),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let entry = editable_entry(&server)?;
    let err = service.update(&entry).await.unwrap_err();
    assert!(err.is_conflict(), "{err}");
    Ok(())
}

#[tokio::test]
async fn delete_follows_the_edit_link() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("DELETE", "/feeds/albums/1"),
            request::headers(contains(("if-match", "W/\"Q\""))),
        ])
        .respond_with(status_code(200)),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let entry = editable_entry(&server)?;
    service.delete(&entry).await?;
    Ok(())
}

#[tokio::test]
async fn delete_without_an_edit_link_is_a_protocol_error() {
    let service = Service::builder(&DESCRIPTOR).build();
    let mut entry = Entry::new();
    entry.set_title("Unlinked");
    let err = service.delete(&entry).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn structured_errors_go_through_the_error_table() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/feeds/videos")).respond_with(
            status_code(403).body(
                "<errors xmlns='http://schemas.google.com/g/2005'><error>\
                 <domain>usageLimits</domain><code>dailyLimitExceeded</code>\
                 <internalReason>Daily limit exceeded</internalReason>\
                 </error></errors>",
            ),
        ),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let mut query = Query::new();
    let err = service
        .query::<Entry, _>(&server.url_str("/feeds/videos"), &mut query)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiQuotaExceeded);
    assert_eq!(err.status_code(), Some(403));
    assert_eq!(err.message(), Some("Daily limit exceeded"));
    Ok(())
}

/// Serves a stale token until [refresh][Authorizer::refresh] replaces it.
struct RefreshingAuthorizer {
    refreshes: AtomicU32,
}

#[async_trait]
impl Authorizer for RefreshingAuthorizer {
    async fn access_token(
        &self,
        _domain: &AuthorizationDomain,
    ) -> gdata_service::Result<Option<String>> {
        let token = if self.refreshes.load(Ordering::SeqCst) == 0 {
            "stale"
        } else {
            "fresh"
        };
        Ok(Some(token.to_string()))
    }

    fn is_authorized_for(&self, _domain: &AuthorizationDomain) -> bool {
        true
    }

    async fn refresh(&self) -> gdata_service::Result<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn unauthorized_triggers_one_refresh_and_retry() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/feeds/videos"),
            request::headers(contains(("authorization", "Bearer stale"))),
        ])
        .respond_with(status_code(401)),
    );
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/feeds/videos"),
            request::headers(contains(("authorization", "Bearer fresh"))),
        ])
        .respond_with(status_code(200).body(feed_body("W/\"A\"", &["a"]))),
    );

    let authorizer = Arc::new(RefreshingAuthorizer {
        refreshes: AtomicU32::new(0),
    });
    let service = Service::builder(&DESCRIPTOR)
        .with_authorizer(authorizer.clone())
        .build();
    let mut query = Query::new();
    let feed = service
        .query::<Entry, _>(&server.url_str("/feeds/videos"), &mut query)
        .await?;
    assert!(feed.is_some());
    assert_eq!(authorizer.refreshes.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn developer_key_rides_along_as_a_parameter() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/feeds/videos"),
            request::query(url_decoded(contains(("key", "dev-key-1")))),
        ])
        .respond_with(status_code(200).body(feed_body("W/\"A\"", &[]))),
    );

    let service = Service::builder(&KEYED_DESCRIPTOR)
        .with_developer_key("dev-key-1")
        .build();
    let mut query = Query::new();
    let feed = service
        .query::<Entry, _>(&server.url_str("/feeds/videos"), &mut query)
        .await?;
    assert!(feed.is_some());
    Ok(())
}

#[tokio::test]
async fn upload_frames_metadata_and_content() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("POST", "/upload"),
            request::headers(contains(("slug", "cat.jpg"))),
            request::headers(contains(key("content-type"))),
            request::body(all_of![
                matches("Content-Type: application/atom\\+xml; charset=UTF-8"),
                matches("<title type='text'>Cat photo</title>"),
                matches("Content-Type: image/jpeg"),
                matches("raw jpeg bytes"),
            ]),
        ])
        .respond_with(status_code(201).body(
            "<entry xmlns='http://www.w3.org/2005/Atom'>\
             <id>photos/9</id><title type='text'>Cat photo</title></entry>",
        )),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let mut entry = Entry::new();
    entry.set_title("Cat photo");
    let mut stream = service
        .upload(
            &server.url_str("/upload"),
            &entry,
            "cat.jpg",
            "image/jpeg",
            CancellationToken::new(),
        )
        .await?;
    stream.write(b"raw jpeg bytes").await?;
    let created: Entry = service.finish_upload(stream).await?;
    assert_eq!(created.id(), Some("photos/9"));
    Ok(())
}

#[tokio::test]
async fn failed_upload_surfaces_a_typed_error() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/upload"))
            .respond_with(status_code(403).body(
                "<errors xmlns='http://schemas.google.com/g/2005'><error>\
                 <domain>usageLimits</domain><code>dailyLimitExceeded</code>\
                 </error></errors>",
            )),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let entry = Entry::new();
    let mut stream = service
        .upload(
            &server.url_str("/upload"),
            &entry,
            "cat.jpg",
            "image/jpeg",
            CancellationToken::new(),
        )
        .await?;
    stream.write(b"bytes").await?;
    let err: Error = service
        .finish_upload::<Entry>(stream)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiQuotaExceeded);
    Ok(())
}

#[tokio::test]
async fn download_range_resumes_from_an_offset() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/media/1"),
            request::headers(contains(("range", "bytes=4-"))),
        ])
        .respond_with(
            status_code(206)
                .insert_header("accept-ranges", "bytes")
                .body("-bytes"),
        ),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let stream = service
        .download_range(&server.url_str("/media/1"), 4, CancellationToken::new())
        .await?;
    assert!(stream.accepts_ranges());
    let mut sink = Vec::new();
    stream.write_to(&mut sink).await?;
    assert_eq!(sink, b"-bytes");
    Ok(())
}

#[tokio::test]
async fn download_streams_the_media_body() -> anyhow::Result<()> {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/media/1")).respond_with(
            status_code(200)
                .insert_header("content-type", "image/jpeg")
                .body("jpeg-bytes"),
        ),
    );

    let service = Service::builder(&DESCRIPTOR).build();
    let stream = service
        .download(&server.url_str("/media/1"), CancellationToken::new())
        .await?;
    assert_eq!(stream.content_type(), Some("image/jpeg"));
    let mut sink = Vec::new();
    let written = stream.write_to(&mut sink).await?;
    assert_eq!(written, 10);
    assert_eq!(sink, b"jpeg-bytes");
    Ok(())
}
