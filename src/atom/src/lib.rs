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

//! The GData resource model: entries, feeds, and the leaf elements of the
//! Atom syndication format plus the extension namespaces shared across the
//! service family (`media:`, `georss:`/`gml:`, `exif:`, `gContact:`).
//!
//! Per-service schemas (a YouTube video's statistics, a PicasaWeb photo's
//! full EXIF block) live with their services; this crate holds the common
//! substrate those schemas are built from.

mod author;
mod category;
mod comment;
mod entry;
mod feed;
mod generator;
mod link;

pub mod exif;
pub mod gcontact;
pub mod georss;
pub mod media;

pub use author::Author;
pub use category::{Category, KIND_SCHEME};
pub use comment::Comment;
pub use entry::{AsEntry, Entry};
pub use feed::Feed;
pub use generator::Generator;
pub use link::{Link, REL_ALTERNATE, REL_EDIT, REL_NEXT, REL_PREVIOUS, REL_SELF};
