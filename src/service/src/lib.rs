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

//! The GData request pipeline: queries, authorization, typed errors, and
//! streaming transfers.
//!
//! A [Service] issues authorized HTTP requests against one GData service,
//! described by a [ServiceDescriptor]. Feed reads go through a [Query],
//! which owns pagination state and ETag cache coherence; entry writes go
//! through the conditional-update operations on the service; bulk media
//! moves through the [download][crate::download] and
//! [upload][crate::upload] streams.

mod authorizer;
mod descriptor;
mod domain;
mod error;
mod error_response;
mod query;
mod service;

pub mod download;
pub mod upload;

pub use authorizer::{Authorizer, NoAuthorizer, StaticAuthorizer};
pub use descriptor::{ErrorDialect, ErrorMapping, ServiceDescriptor};
pub use domain::AuthorizationDomain;
pub use download::DownloadStream;
pub use error::{Error, ErrorKind};
pub use query::{Pagination, Query, QueryParams, UriBuilder};
pub use service::{Service, ServiceBuilder};
pub use upload::UploadStream;

/// The result type used throughout the request pipeline.
pub type Result<T> = std::result::Result<T, Error>;
