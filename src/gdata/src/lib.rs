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

//! Client library for the GData family of Google services.
//!
//! GData services expose their resources as Atom feeds with namespaced
//! extension elements, or as JSON documents on the newer endpoints. This
//! crate ties the family together: the parsing framework from
//! [`gdata_parsable`], the Atom resource model from [`gdata_atom`], the
//! query and request pipeline from [`gdata_service`], and one module per
//! service holding its binding descriptor, feed URIs, and richer query and
//! entry types.
//!
//! A typical session builds a [`Service`] around a service descriptor and
//! an [`Authorizer`], then queries feeds and walks their pages:
//!
//! ```no_run
//! use gdata::youtube;
//! use gdata::{Entry, QueryParams, Service};
//!
//! # async fn sample() -> gdata::Result<()> {
//! let service = Service::builder(&youtube::DESCRIPTOR)
//!     .with_developer_key("a-developer-key")
//!     .build();
//!
//! let mut query = youtube::VideoQuery::new();
//! query.base_mut().set_max_results(5);
//! while let Some(feed) = service
//!     .query::<Entry, _>(&youtube::most_popular_feed_uri(), &mut query)
//!     .await?
//! {
//!     for video in feed.entries() {
//!         println!("{}", video.title());
//!     }
//!     if feed.next_page_token().is_none() {
//!         break;
//!     }
//!     query.base_mut().next_page();
//! }
//! # Ok(()) }
//! ```

pub mod calendar;
pub mod contacts;
pub mod documents;
pub mod picasaweb;
pub mod tasks;
pub mod youtube;

pub use gdata_atom::{
    Author, Category, Comment, Entry, Feed, Generator, Link, exif, gcontact, georss, media,
};
pub use gdata_atom::{AsEntry, KIND_SCHEME};
pub use gdata_parsable::{Element, Namespaces, Parsable, ParseError};
pub use gdata_service::{
    AuthorizationDomain, Authorizer, DownloadStream, Error, ErrorDialect, ErrorKind, NoAuthorizer,
    Pagination, Query, QueryParams, Result, Service, ServiceBuilder, ServiceDescriptor,
    StaticAuthorizer, UploadStream,
};
