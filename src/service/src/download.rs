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

//! Streaming download of media content.

use crate::error::Error;
use bytes::Bytes;
use futures::Stream;
use futures::stream::BoxStream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// A response body flowing in as a stream of byte chunks.
///
/// The stream yields [Bytes] chunks as the transport delivers them;
/// [write_to][DownloadStream::write_to] splices the whole body into an
/// asynchronous sink. Cancelling the token ends the stream with a
/// [Cancelled][crate::ErrorKind::Cancelled] error and drops the underlying
/// connection; polls after that error report end-of-stream.
#[pin_project]
pub struct DownloadStream {
    content_type: Option<String>,
    content_length: Option<u64>,
    accepts_ranges: bool,
    cancel: CancellationToken,
    cancelled: bool,
    #[pin]
    chunks: BoxStream<'static, reqwest::Result<Bytes>>,
}

impl DownloadStream {
    pub(crate) fn new(response: reqwest::Response, cancel: CancellationToken) -> Self {
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();
        let accepts_ranges = response
            .headers()
            .get(http::header::ACCEPT_RANGES)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case("bytes"));
        Self {
            content_type,
            content_length,
            accepts_ranges,
            cancel,
            cancelled: false,
            chunks: Box::pin(response.bytes_stream()),
        }
    }

    /// The `Content-Type` the server declared for the body.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The `Content-Length` the server declared, when it declared one.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Whether the endpoint advertised byte-range support, making
    /// [Service::download_range][crate::Service::download_range] viable for
    /// picking up an interrupted transfer.
    pub fn accepts_ranges(&self) -> bool {
        self.accepts_ranges
    }

    /// Splices the remaining body into `sink`, returning the number of
    /// bytes written.
    pub async fn write_to<W>(mut self, sink: &mut W) -> crate::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        use futures::StreamExt;
        let mut written = 0u64;
        while let Some(chunk) = self.next().await {
            let chunk = chunk?;
            sink.write_all(&chunk)
                .await
                .map_err(Error::network)?;
            written += chunk.len() as u64;
        }
        sink.flush().await.map_err(Error::network)?;
        Ok(written)
    }
}

impl Stream for DownloadStream {
    type Item = crate::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.cancelled {
            return Poll::Ready(None);
        }
        if this.cancel.is_cancelled() {
            // The error is reported once; afterwards the stream is over.
            *this.cancelled = true;
            return Poll::Ready(Some(Err(Error::cancelled())));
        }
        this.chunks
            .poll_next(cx)
            .map(|chunk| chunk.map(|result| result.map_err(Error::from)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use httptest::{Expectation, Server, matchers::*, responders::*};

    #[tokio::test]
    async fn streams_body_chunks() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/media")).respond_with(
                status_code(200)
                    .insert_header("content-type", "video/mp4")
                    .body("abcdef"),
            ),
        );

        let response = reqwest::get(server.url_str("/media")).await?;
        let mut stream = DownloadStream::new(response, CancellationToken::new());
        assert_eq!(stream.content_type(), Some("video/mp4"));

        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk?);
        }
        assert_eq!(collected, b"abcdef");
        Ok(())
    }

    #[tokio::test]
    async fn write_to_splices_everything() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/media"))
                .respond_with(status_code(200).body("0123456789")),
        );

        let response = reqwest::get(server.url_str("/media")).await?;
        let stream = DownloadStream::new(response, CancellationToken::new());
        let mut sink = Vec::new();
        let written = stream.write_to(&mut sink).await?;
        assert_eq!(written, 10);
        assert_eq!(sink, b"0123456789");
        Ok(())
    }

    #[tokio::test]
    async fn cancellation_ends_the_stream() -> anyhow::Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/media"))
                .respond_with(status_code(200).body("abcdef")),
        );

        let cancel = CancellationToken::new();
        let response = reqwest::get(server.url_str("/media")).await?;
        let mut stream = DownloadStream::new(response, cancel.clone());
        cancel.cancel();
        let chunk = stream.next().await;
        assert!(matches!(chunk, Some(Err(e)) if e.is_cancelled()));
        // The error is terminal; a caller looping past it sees the end.
        assert!(stream.next().await.is_none());
        Ok(())
    }
}
