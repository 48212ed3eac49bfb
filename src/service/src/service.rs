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

use crate::authorizer::{Authorizer, NoAuthorizer};
use crate::descriptor::{ErrorDialect, ServiceDescriptor};
use crate::download::DownloadStream;
use crate::error::{Error, ErrorKind};
use crate::error_response::parse_error_response;
use crate::query::{QueryParams, encode_query_value};
use crate::upload::{UploadStream, multipart_content_type, multipart_prelude};
use bytes::Bytes;
use gdata_atom::{AsEntry, Feed};
use gdata_parsable::Parsable;
use http::header;
use reqwest::StatusCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Configures and builds a [Service].
pub struct ServiceBuilder {
    descriptor: &'static ServiceDescriptor,
    authorizer: Arc<dyn Authorizer>,
    developer_key: Option<String>,
    locale: Option<String>,
    client: Option<reqwest::Client>,
}

impl ServiceBuilder {
    pub fn new(descriptor: &'static ServiceDescriptor) -> Self {
        Self {
            descriptor,
            authorizer: Arc::new(NoAuthorizer),
            developer_key: None,
            locale: None,
            client: None,
        }
    }

    /// Sets the credential source. Defaults to no credentials.
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Sets the developer key sent on services that declare a key
    /// parameter.
    pub fn with_developer_key(mut self, key: impl Into<String>) -> Self {
        self.developer_key = Some(key.into());
        self
    }

    /// Sets the locale, sent as `Accept-Language`. Some endpoints use it to
    /// translate returned labels.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Supplies a pre-configured HTTP client, e.g. with a proxy or custom
    /// timeouts.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Service {
        Service {
            descriptor: self.descriptor,
            client: self.client.unwrap_or_default(),
            authorizer: self.authorizer,
            developer_key: self.developer_key,
            locale: self.locale,
        }
    }
}

/// A client for one GData service.
///
/// All operations are asynchronous; dropping a returned future aborts the
/// underlying request. Streaming transfers additionally take a
/// [CancellationToken] because they outlive the call that starts them.
///
/// # Example
///
/// ```no_run
/// # async fn example(descriptor: &'static gdata_service::ServiceDescriptor)
/// # -> gdata_service::Result<()> {
/// use gdata_atom::{Entry, Feed};
/// use gdata_service::{Query, Service};
///
/// let service = Service::builder(descriptor).build();
/// let mut query = Query::new();
/// query.set_max_results(5);
/// let feed: Option<Feed<Entry>> = service
///     .query("https://example.com/feeds/videos", &mut query)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Service {
    descriptor: &'static ServiceDescriptor,
    client: reqwest::Client,
    authorizer: Arc<dyn Authorizer>,
    developer_key: Option<String>,
    locale: Option<String>,
}

impl Service {
    pub fn builder(descriptor: &'static ServiceDescriptor) -> ServiceBuilder {
        ServiceBuilder::new(descriptor)
    }

    pub fn descriptor(&self) -> &'static ServiceDescriptor {
        self.descriptor
    }

    pub fn authorizer(&self) -> &Arc<dyn Authorizer> {
        &self.authorizer
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Appends the developer key when the service declares a key parameter.
    fn request_uri(&self, uri: &str) -> String {
        match (self.developer_key.as_deref(), self.descriptor.developer_key_param()) {
            (Some(key), Some(param)) => {
                let separator = if uri.contains('?') { '&' } else { '?' };
                format!("{uri}{separator}{param}={}", encode_query_value(key))
            }
            _ => uri.to_string(),
        }
    }

    /// Attaches the cross-cutting headers and the bearer token.
    async fn decorate(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> crate::Result<reqwest::RequestBuilder> {
        if let Some((name, value)) = self.descriptor.version_header() {
            request = request.header(name, value);
        }
        if let Some(locale) = &self.locale {
            request = request.header(header::ACCEPT_LANGUAGE, locale);
        }
        let token = self
            .authorizer
            .access_token(self.descriptor.authorization_domain())
            .await?;
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    /// Sends a request. A `401` triggers one transparent re-authorization
    /// through the authorizer; the retried response is returned as-is.
    async fn execute<F>(&self, build: F) -> crate::Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let request = self.decorate(build(&self.client)).await?;
        let response = request.send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        tracing::debug!(service = self.descriptor.name(), "retrying after refresh");
        self.authorizer.refresh().await?;
        let request = self.decorate(build(&self.client)).await?;
        Ok(request.send().await?)
    }

    /// Turns a non-success response into a typed error.
    async fn check(&self, response: reqwest::Response) -> crate::Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(parse_error_response(
            self.descriptor,
            status.as_u16(),
            &body,
        ))
    }

    fn parse_resource<T: Parsable>(&self, body: &[u8]) -> crate::Result<T> {
        let resource = match self.descriptor.error_dialect() {
            ErrorDialect::Xml => gdata_parsable::parse_xml::<T>(body)?,
            ErrorDialect::Json => gdata_parsable::parse_json::<T>(body)?,
        };
        Ok(resource)
    }

    fn serialize_resource<T: Parsable>(&self, resource: &T) -> (String, &'static str) {
        match self.descriptor.error_dialect() {
            ErrorDialect::Xml => (gdata_parsable::to_xml(resource), T::content_type()),
            ErrorDialect::Json => (gdata_parsable::to_json(resource), "application/json"),
        }
    }

    /// Fetches one page of a feed.
    ///
    /// Returns `Ok(None)` in two cases that both mean "nothing new": the
    /// query's cursor is already past the last page, or the server answered
    /// `304 Not Modified` to the query's stored ETag. Otherwise the parsed
    /// feed is returned and the query's ETag and pagination cursors are
    /// updated from it.
    pub async fn query<E, Q>(&self, feed_uri: &str, query: &mut Q) -> crate::Result<Option<Feed<E>>>
    where
        E: AsEntry,
        Q: QueryParams,
    {
        if query.base().is_finished() {
            return Ok(None);
        }
        let uri = self.request_uri(&query.build_uri(feed_uri));
        let etag = query.base().etag().map(str::to_string);
        let response = self
            .execute(|client| {
                let mut request = client.get(&uri);
                if let Some(etag) = &etag {
                    request = request.header(header::IF_NONE_MATCH, etag);
                }
                request
            })
            .await?;
        if response.status() == StatusCode::NOT_MODIFIED {
            return Ok(None);
        }
        let response = self.check(response).await?;
        let body = response.bytes().await?;
        let feed: Feed<E> = self.parse_resource(&body)?;

        let base = query.base_mut();
        base.store_etag(feed.etag());
        base.store_uris(feed.next_page_uri(), feed.previous_page_uri());
        base.store_next_page_token(feed.next_page_token());
        Ok(Some(feed))
    }

    /// Fetches a single resource by URI.
    pub async fn query_single<T: Parsable>(&self, uri: &str) -> crate::Result<T> {
        let uri = self.request_uri(uri);
        let response = self.execute(|client| client.get(&uri)).await?;
        let response = self.check(response).await?;
        let body = response.bytes().await?;
        self.parse_resource(&body)
    }

    /// Inserts a new entry into the collection at `uri` and returns the
    /// server's version of it.
    ///
    /// An entry that already has an identifier belongs to the server
    /// already; the insert is rejected before any request is issued.
    pub async fn insert<E: AsEntry>(&self, uri: &str, entry: &E) -> crate::Result<E> {
        if entry.entry().id().is_some() {
            return Err(Error::kind_only(ErrorKind::EntryAlreadyInserted));
        }
        let (body, content_type) = self.serialize_resource(entry);
        let uri = self.request_uri(uri);
        let response = self
            .execute(|client| {
                client
                    .post(&uri)
                    .header(header::CONTENT_TYPE, content_type)
                    .body(body.clone())
            })
            .await?;
        let response = self.check(response).await?;
        let body = response.bytes().await?;
        self.parse_resource(&body)
    }

    /// Updates an entry through its `edit` link, conditionally on its ETag,
    /// and returns the server's version.
    pub async fn update<E: AsEntry>(&self, entry: &E) -> crate::Result<E> {
        let uri = self.edit_uri(entry)?;
        let etag = entry.entry().etag().map(str::to_string);
        let (body, content_type) = self.serialize_resource(entry);
        let response = self
            .execute(|client| {
                let mut request = client
                    .put(&uri)
                    .header(header::CONTENT_TYPE, content_type)
                    .body(body.clone());
                if let Some(etag) = &etag {
                    request = request.header(header::IF_MATCH, etag);
                }
                request
            })
            .await?;
        let response = self.check(response).await?;
        let body = response.bytes().await?;
        self.parse_resource(&body)
    }

    /// Deletes an entry through its `edit` link, conditionally on its ETag.
    pub async fn delete<E: AsEntry>(&self, entry: &E) -> crate::Result<()> {
        let uri = self.edit_uri(entry)?;
        let etag = entry.entry().etag().map(str::to_string);
        let response = self
            .execute(|client| {
                let mut request = client.delete(&uri);
                if let Some(etag) = &etag {
                    request = request.header(header::IF_MATCH, etag);
                }
                request
            })
            .await?;
        self.check(response).await?;
        Ok(())
    }

    fn edit_uri<E: AsEntry>(&self, entry: &E) -> crate::Result<String> {
        let link = entry
            .entry()
            .edit_link()
            .ok_or_else(|| Error::new(ErrorKind::Protocol, "entry has no edit link"))?;
        Ok(self.request_uri(&self.descriptor.rewrite_entry_uri(link.href())))
    }

    /// Starts a streaming download of the media at `uri`.
    pub async fn download(
        &self,
        uri: &str,
        cancel: CancellationToken,
    ) -> crate::Result<DownloadStream> {
        let uri = self.request_uri(uri);
        let response = self.execute(|client| client.get(&uri)).await?;
        let response = self.check(response).await?;
        Ok(DownloadStream::new(response, cancel))
    }

    /// Resumes a download from a byte offset, for endpoints that advertise
    /// range support (see
    /// [DownloadStream::accepts_ranges][crate::DownloadStream::accepts_ranges]).
    pub async fn download_range(
        &self,
        uri: &str,
        offset: u64,
        cancel: CancellationToken,
    ) -> crate::Result<DownloadStream> {
        let uri = self.request_uri(uri);
        let response = self
            .execute(|client| {
                client
                    .get(&uri)
                    .header(header::RANGE, format!("bytes={offset}-"))
            })
            .await?;
        let response = self.check(response).await?;
        Ok(DownloadStream::new(response, cancel))
    }

    /// Starts a streaming multipart upload: `entry` is the metadata part,
    /// and the content part is written through the returned stream. The
    /// proposed filename travels in the `Slug` header.
    pub async fn upload<E: AsEntry>(
        &self,
        uri: &str,
        entry: &E,
        slug: &str,
        content_type: &str,
        cancel: CancellationToken,
    ) -> crate::Result<UploadStream> {
        let (entry_body, entry_content_type) = self.serialize_resource(entry);
        let prelude = multipart_prelude(entry_content_type, &entry_body, content_type);

        let (mut sender, receiver) =
            futures::channel::mpsc::channel::<Result<Bytes, std::io::Error>>(8);
        // A fresh channel always has room for the prelude.
        sender
            .try_send(Ok(prelude))
            .map_err(|_| Error::kind_only(ErrorKind::NetworkUnavailable))?;

        let uri = self.request_uri(uri);
        let request = self
            .decorate(
                self.client
                    .post(&uri)
                    .header(header::CONTENT_TYPE, multipart_content_type())
                    .header("Slug", slug)
                    .body(reqwest::Body::wrap_stream(receiver)),
            )
            .await?;

        let task_cancel = cancel.clone();
        let response = tokio::spawn(async move {
            let response = tokio::select! {
                _ = task_cancel.cancelled() => return Err(Error::cancelled()),
                sent = request.send() => sent.map_err(Error::network)?,
            };
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Ok(crate::upload::UploadResponse { status, body })
        });

        Ok(UploadStream::new(sender, response, cancel))
    }

    /// Commits an upload and parses the entry the server created.
    pub async fn finish_upload<E: AsEntry>(&self, stream: UploadStream) -> crate::Result<E> {
        let response = stream.close().await?;
        if !(200..300).contains(&response.status) {
            return Err(parse_error_response(
                self.descriptor,
                response.status,
                &response.body,
            ));
        }
        self.parse_resource(response.body.as_bytes())
    }

    /// Initiates a resumable upload session and returns the session URI to
    /// send content `PUT`s to.
    pub async fn initiate_resumable_upload<E: AsEntry>(
        &self,
        entry: &E,
        slug: &str,
        content_type: &str,
        content_length: u64,
    ) -> crate::Result<String> {
        let endpoint = self.descriptor.resumable_upload_uri().ok_or_else(|| {
            Error::new(ErrorKind::Protocol, "service has no resumable upload endpoint")
        })?;
        let (body, entry_content_type) = self.serialize_resource(entry);
        let uri = self.request_uri(endpoint);
        let response = self
            .execute(|client| {
                client
                    .post(&uri)
                    .header(header::CONTENT_TYPE, entry_content_type)
                    .header("Slug", slug)
                    .header("X-Upload-Content-Type", content_type)
                    .header("X-Upload-Content-Length", content_length.to_string())
                    .body(body.clone())
            })
            .await?;
        let response = self.check(response).await?;
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::new(ErrorKind::Protocol, "no upload session URI returned"))
    }
}
