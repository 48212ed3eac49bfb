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

use chrono::{DateTime, Utc};
use gdata_parsable::parser::format_iso8601;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

// RFC 3986 unreserved characters stay literal; everything else is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// Category expressions keep `/` so `A/-/B` composes as path segments.
const CATEGORY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Percent-encodes one query-parameter value.
pub(crate) fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// How a feed's result set is walked page by page.
///
/// The modes are mutually exclusive and behave differently: `Indexed` pages
/// by arithmetic on `start-index`, `Uris` follows the feed's `next`/
/// `previous` links verbatim, and `Tokens` appends an opaque continuation
/// token. A query is constructed in one mode and stays in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    /// Pages are addressed by `start-index`/`max-results` arithmetic.
    Indexed,
    /// Pages are addressed by whole URIs the server puts in feed links.
    Uris {
        next: Option<String>,
        previous: Option<String>,
        use_next: bool,
        use_previous: bool,
    },
    /// Pages are addressed by an opaque `pageToken`. There is no way back.
    Tokens { next: Option<String>, use_next: bool },
}

/// An in-progress query URI: the feed URI plus appended parameters.
///
/// Service-specific query types append their extra parameters through
/// [QueryParams::append_service_params]; the builder tracks whether the `?`
/// separator has been emitted yet, including when the feed URI already
/// carried one.
#[derive(Debug)]
pub struct UriBuilder {
    uri: String,
    params_started: bool,
}

impl UriBuilder {
    fn new(feed_uri: &str) -> Self {
        Self {
            uri: feed_uri.to_string(),
            params_started: feed_uri.contains('?'),
        }
    }

    /// Appends a raw path suffix. Only valid before any parameter.
    fn append_path(&mut self, path: &str) {
        debug_assert!(!self.params_started);
        self.uri.push_str(path);
    }

    /// Appends `name=value` with the value percent-encoded.
    pub fn append_param(&mut self, name: &str, value: &str) {
        self.uri.push(if self.params_started { '&' } else { '?' });
        self.params_started = true;
        self.uri.push_str(name);
        self.uri.push('=');
        self.uri
            .extend(utf8_percent_encode(value, QUERY_VALUE));
    }

    fn finish(self) -> String {
        self.uri
    }
}

/// The standard GData query parameters plus pagination and cache state.
///
/// A query is reused across successive pages: [next_page][Query::next_page]
/// advances the cursor, the service writes the cursors observed in each
/// response back, and the stored ETag makes repeat requests conditional.
/// Every parameter setter clears the ETag, since the cached result set no
/// longer corresponds to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    q: Option<String>,
    categories: Option<String>,
    author: Option<String>,
    updated_min: Option<DateTime<Utc>>,
    updated_max: Option<DateTime<Utc>>,
    published_min: Option<DateTime<Utc>>,
    published_max: Option<DateTime<Utc>>,
    start_index: u32,
    max_results: u32,
    strict: bool,
    etag: Option<String>,
    pagination: Pagination,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    /// Creates an empty query with indexed pagination.
    pub fn new() -> Self {
        Self::with_pagination(Pagination::Indexed)
    }

    /// Creates an empty query paginated by the feed's next/previous links.
    pub fn with_uris_pagination() -> Self {
        Self::with_pagination(Pagination::Uris {
            next: None,
            previous: None,
            use_next: false,
            use_previous: false,
        })
    }

    /// Creates an empty query paginated by opaque page tokens.
    pub fn with_tokens_pagination() -> Self {
        Self::with_pagination(Pagination::Tokens {
            next: None,
            use_next: false,
        })
    }

    fn with_pagination(pagination: Pagination) -> Self {
        Self {
            q: None,
            categories: None,
            author: None,
            updated_min: None,
            updated_max: None,
            published_min: None,
            published_max: None,
            start_index: 0,
            max_results: 0,
            strict: false,
            etag: None,
            pagination,
        }
    }

    /// The full-text search term.
    pub fn q(&self) -> Option<&str> {
        self.q.as_deref()
    }

    pub fn set_q(&mut self, q: Option<&str>) {
        self.q = q.map(str::to_string);
        self.etag = None;
    }

    /// The category filter expression, e.g. `fritz|laurie` or
    /// `{http://schemas.google.com/g/2005#kind}#event`.
    pub fn categories(&self) -> Option<&str> {
        self.categories.as_deref()
    }

    pub fn set_categories(&mut self, categories: Option<&str>) {
        self.categories = categories.map(str::to_string);
        self.etag = None;
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn set_author(&mut self, author: Option<&str>) {
        self.author = author.map(str::to_string);
        self.etag = None;
    }

    pub fn updated_min(&self) -> Option<DateTime<Utc>> {
        self.updated_min
    }

    pub fn set_updated_min(&mut self, updated_min: Option<DateTime<Utc>>) {
        self.updated_min = updated_min;
        self.etag = None;
    }

    pub fn updated_max(&self) -> Option<DateTime<Utc>> {
        self.updated_max
    }

    pub fn set_updated_max(&mut self, updated_max: Option<DateTime<Utc>>) {
        self.updated_max = updated_max;
        self.etag = None;
    }

    pub fn published_min(&self) -> Option<DateTime<Utc>> {
        self.published_min
    }

    pub fn set_published_min(&mut self, published_min: Option<DateTime<Utc>>) {
        self.published_min = published_min;
        self.etag = None;
    }

    pub fn published_max(&self) -> Option<DateTime<Utc>> {
        self.published_max
    }

    pub fn set_published_max(&mut self, published_max: Option<DateTime<Utc>>) {
        self.published_max = published_max;
        self.etag = None;
    }

    /// The one-based index of the first result. `0` leaves it unspecified.
    /// Prefer [next_page][Self::next_page] over setting this directly.
    pub fn start_index(&self) -> u32 {
        self.start_index
    }

    pub fn set_start_index(&mut self, start_index: u32) {
        self.start_index = start_index;
        self.etag = None;
    }

    /// The page size. `0` leaves it to the server's default.
    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn set_max_results(&mut self, max_results: u32) {
        self.max_results = max_results;
        self.etag = None;
    }

    /// Whether the server should reject parameters it does not recognize.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
        self.etag = None;
    }

    /// The ETag of the last result set this query produced.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Forgets the cached ETag, so the next request fetches a full result.
    ///
    /// Every standard setter does this on its own. Wrapper queries must
    /// call it when one of their service-specific parameters changes.
    pub fn clear_etag(&mut self) {
        self.etag = None;
    }

    pub(crate) fn store_etag(&mut self, etag: Option<&str>) {
        self.etag = etag.map(str::to_string);
    }

    pub(crate) fn store_uris(&mut self, next_uri: Option<&str>, previous_uri: Option<&str>) {
        if let Pagination::Uris { next, previous, .. } = &mut self.pagination {
            *next = next_uri.map(str::to_string);
            *previous = previous_uri.map(str::to_string);
        }
    }

    pub(crate) fn store_next_page_token(&mut self, token: Option<&str>) {
        if let Pagination::Tokens { next, .. } = &mut self.pagination {
            *next = token.map(str::to_string);
        }
    }

    /// Advances the cursor to the next page and clears the ETag.
    pub fn next_page(&mut self) {
        match &mut self.pagination {
            Pagination::Indexed => {
                if self.start_index == 0 {
                    self.start_index = 1;
                }
                self.start_index += self.max_results.max(1);
            }
            Pagination::Uris {
                use_next,
                use_previous,
                ..
            } => {
                *use_next = true;
                *use_previous = false;
            }
            Pagination::Tokens { use_next, .. } => {
                *use_next = true;
            }
        }
        self.etag = None;
    }

    /// Moves the cursor to the previous page, if the mode can represent one.
    /// Returns false, leaving the query untouched, when it cannot.
    pub fn previous_page(&mut self) -> bool {
        let moved = match &mut self.pagination {
            Pagination::Indexed => {
                if self.start_index <= self.max_results {
                    false
                } else {
                    self.start_index -= self.max_results.max(1);
                    if self.start_index == 1 {
                        self.start_index = 0;
                    }
                    true
                }
            }
            Pagination::Uris {
                previous,
                use_next,
                use_previous,
                ..
            } => {
                if previous.is_some() {
                    *use_next = false;
                    *use_previous = true;
                    true
                } else {
                    false
                }
            }
            Pagination::Tokens { .. } => false,
        };
        if moved {
            self.etag = None;
        }
        moved
    }

    /// True when the cursor points past the last page: the caller asked for
    /// the next page but the last response offered none. Indexed mode never
    /// finishes by itself; the server signals exhaustion with an empty feed.
    pub fn is_finished(&self) -> bool {
        match &self.pagination {
            Pagination::Indexed => false,
            Pagination::Uris { next, use_next, .. } => next.is_none() && *use_next,
            Pagination::Tokens { next, use_next } => next.is_none() && *use_next,
        }
    }
}

/// A set of query parameters for one service's feeds.
///
/// Service crates wrap [Query] to add their own parameters (a video search's
/// ordering, a contacts query's group filter) and contribute them through
/// [append_service_params][Self::append_service_params]. The plain [Query]
/// implements this trait with no extra parameters.
pub trait QueryParams {
    fn base(&self) -> &Query;
    fn base_mut(&mut self) -> &mut Query;

    /// Appends service-specific parameters. Runs after the standard set.
    fn append_service_params(&self, _uri: &mut UriBuilder) {}

    /// Composes the final request URI against `feed_uri`.
    ///
    /// In `uris` mode with a cursor flag set, the stored cursor URI is
    /// returned verbatim and no parameters are appended. Callers should
    /// check [Query::is_finished] first; a set flag without a stored cursor
    /// falls back to the base parameters.
    fn build_uri(&self, feed_uri: &str) -> String {
        let query = self.base();
        if let Pagination::Uris {
            next,
            previous,
            use_next,
            use_previous,
        } = &query.pagination
        {
            if *use_next {
                if let Some(next) = next {
                    return next.clone();
                }
            } else if *use_previous {
                if let Some(previous) = previous {
                    return previous.clone();
                }
            }
        }

        let mut uri = UriBuilder::new(feed_uri);
        if let Some(categories) = &query.categories {
            uri.append_path("/-/");
            uri.uri
                .extend(utf8_percent_encode(categories, CATEGORY_SEGMENT));
        }
        if let Some(q) = &query.q {
            uri.append_param("q", q);
        }
        if let Some(author) = &query.author {
            uri.append_param("author", author);
        }
        if let Some(updated_min) = query.updated_min {
            uri.append_param("updated-min", &format_iso8601(updated_min));
        }
        if let Some(updated_max) = query.updated_max {
            uri.append_param("updated-max", &format_iso8601(updated_max));
        }
        if let Some(published_min) = query.published_min {
            uri.append_param("published-min", &format_iso8601(published_min));
        }
        if let Some(published_max) = query.published_max {
            uri.append_param("published-max", &format_iso8601(published_max));
        }
        if query.start_index > 0 {
            uri.append_param("start-index", &query.start_index.to_string());
        }
        if query.strict {
            uri.append_param("strict", "true");
        }
        if query.max_results > 0 {
            uri.append_param("max-results", &query.max_results.to_string());
        }
        if let Pagination::Tokens {
            next: Some(token),
            use_next: true,
        } = &query.pagination
        {
            if !token.is_empty() {
                uri.append_param("pageToken", token);
            }
        }
        self.append_service_params(&mut uri);
        uri.finish()
    }
}

impl QueryParams for Query {
    fn base(&self) -> &Query {
        self
    }
    fn base_mut(&mut self) -> &mut Query {
        self
    }
}
