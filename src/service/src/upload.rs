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

//! Streaming upload of media content.
//!
//! An upload is a single `POST` whose body is produced incrementally: a
//! `multipart/related` envelope pairing the serialized entry metadata with
//! the raw content the caller writes in. The request goes on the wire as
//! soon as the stream is created; writes are subject to the transport's
//! backpressure, and closing the stream commits the request and waits for
//! the server's verdict.

use crate::error::Error;
use bytes::Bytes;
use futures::SinkExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The fixed boundary of the multipart envelope. The server only sees it
/// quoted in the `Content-Type` header, so a constant is safe as long as it
/// cannot appear in serialized entry XML, which this one cannot.
pub(crate) const BOUNDARY: &str = "0003Z5W789deadbeefRTE456KlemsnoZV";

/// The `Content-Type` of the multipart envelope.
pub(crate) fn multipart_content_type() -> String {
    format!("multipart/related; boundary={BOUNDARY}")
}

/// The envelope prelude: the metadata part and the opening of the content
/// part. Caller-written bytes follow immediately after.
pub(crate) fn multipart_prelude(
    entry_content_type: &str,
    entry_body: &str,
    content_type: &str,
) -> Bytes {
    let prelude = format!(
        "--{BOUNDARY}\n\
         Content-Type: {entry_content_type}; charset=UTF-8\n\n\
         {entry_body}\n\
         --{BOUNDARY}\n\
         Content-Type: {content_type}\n\
         Content-Transfer-Encoding: binary\n\n"
    );
    Bytes::from(prelude)
}

/// The envelope footer, sent when the stream is closed.
pub(crate) fn multipart_footer() -> Bytes {
    Bytes::from(format!("\n--{BOUNDARY}--"))
}

/// The server's answer to a committed upload, before entry parsing.
#[derive(Debug)]
pub(crate) struct UploadResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

/// An in-progress streaming upload.
///
/// Created by [Service::upload][crate::Service::upload]. Write the content
/// bytes with [write][UploadStream::write], then pass the stream to
/// [Service::finish_upload][crate::Service::finish_upload] to commit it and
/// parse the resulting entry. Dropping the stream without finishing aborts
/// the request.
pub struct UploadStream {
    sender: futures::channel::mpsc::Sender<Result<Bytes, std::io::Error>>,
    response: JoinHandle<crate::Result<UploadResponse>>,
    cancel: CancellationToken,
}

impl UploadStream {
    pub(crate) fn new(
        sender: futures::channel::mpsc::Sender<Result<Bytes, std::io::Error>>,
        response: JoinHandle<crate::Result<UploadResponse>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sender,
            response,
            cancel,
        }
    }

    /// Appends a chunk of content to the upload body. Blocks when the
    /// transport applies backpressure.
    pub async fn write(&mut self, chunk: &[u8]) -> crate::Result<()> {
        let chunk = Bytes::copy_from_slice(chunk);
        tokio::select! {
            _ = self.cancel.cancelled() => Err(Error::cancelled()),
            sent = self.sender.send(Ok(chunk)) => {
                sent.map_err(|_| Error::kind_only(crate::ErrorKind::NetworkUnavailable))
            }
        }
    }

    /// Sends the envelope footer, commits the request, and waits for the
    /// response.
    pub(crate) async fn close(mut self) -> crate::Result<UploadResponse> {
        let footer = self.sender.send(Ok(multipart_footer()));
        tokio::select! {
            _ = self.cancel.cancelled() => return Err(Error::cancelled()),
            sent = footer => {
                sent.map_err(|_| Error::kind_only(crate::ErrorKind::NetworkUnavailable))?;
            }
        }
        self.sender.close_channel();
        match self.response.await {
            Ok(result) => result,
            Err(_) => Err(Error::kind_only(crate::ErrorKind::NetworkUnavailable)),
        }
    }

    /// Aborts the transfer. Bytes already accepted by the server may or may
    /// not be discarded.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
