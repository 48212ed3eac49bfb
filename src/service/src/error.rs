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

use gdata_parsable::ParseError;
use std::error::Error as StdError;
use std::fmt;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The category of a request-pipeline error.
///
/// Service-specific error envelopes are folded into these categories by the
/// service's [error table][crate::ServiceDescriptor]; responses the table
/// does not recognize fall back to a mapping from the HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The request never produced an HTTP response.
    NetworkUnavailable,
    /// The credentials were missing, expired, or rejected.
    AuthenticationRequired,
    /// The credentials were accepted but do not grant this operation.
    Forbidden,
    /// The addressed resource does not exist.
    NotFound,
    /// A conditional operation lost a race with another writer.
    ConcurrentModification,
    /// An insert was attempted with an entry the server already owns.
    EntryAlreadyInserted,
    /// The server rejected the request as malformed.
    Protocol,
    /// The service is temporarily unable to respond.
    ServiceUnavailable,
    /// The per-application request quota was exhausted.
    ApiQuotaExceeded,
    /// The per-user or per-entry operation quota was exhausted.
    EntryQuotaExceeded,
    /// The account must be set up for this service before it can be used.
    ChannelRequired,
    /// A response body could not be parsed.
    Parse,
    /// The operation was cancelled by the caller.
    Cancelled,
}

/// The error returned by every request-pipeline operation.
///
/// Applications usually match on [kind][Error::kind]; the HTTP status and
/// the server's message are available for diagnostics, and the
/// [source][StdError::source] chain holds the transport or parse error that
/// produced this one.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    status_code: Option<u16>,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error of the given kind with a server-supplied message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            status_code: None,
            source: None,
        }
    }

    /// Creates an error of the given kind with no further detail.
    pub fn kind_only(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            status_code: None,
            source: None,
        }
    }

    /// Creates a [ErrorKind::NetworkUnavailable] error from a transport
    /// failure.
    pub fn network<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::NetworkUnavailable,
            message: None,
            status_code: None,
            source: Some(source.into()),
        }
    }

    /// Creates a [ErrorKind::Parse] error from a malformed response body.
    pub fn parse<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Parse,
            message: None,
            status_code: None,
            source: Some(source.into()),
        }
    }

    /// Creates a [ErrorKind::Cancelled] error.
    pub fn cancelled() -> Self {
        Self::kind_only(ErrorKind::Cancelled)
    }

    /// Attaches the HTTP status code of the response this error came from.
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// The error's category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The server-supplied message, if the error envelope carried one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The HTTP status code of the response, when the error came from one.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// The request never reached the service or the response never arrived.
    pub fn is_network(&self) -> bool {
        matches!(self.kind, ErrorKind::NetworkUnavailable)
    }

    /// The operation may succeed after the user re-authenticates.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::AuthenticationRequired)
    }

    /// The operation failed because another writer changed the resource.
    /// Fetch the entry again and re-apply the change.
    pub fn is_conflict(&self) -> bool {
        matches!(self.kind, ErrorKind::ConcurrentModification)
    }

    /// The caller cancelled the operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }

    /// The operation may succeed if retried later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NetworkUnavailable | ErrorKind::ServiceUnavailable
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::NetworkUnavailable => write!(f, "the service could not be reached")?,
            ErrorKind::AuthenticationRequired => write!(f, "authentication is required")?,
            ErrorKind::Forbidden => {
                write!(f, "the credentials do not permit this operation")?
            }
            ErrorKind::NotFound => write!(f, "the resource was not found")?,
            ErrorKind::ConcurrentModification => {
                write!(f, "the resource was modified concurrently")?
            }
            ErrorKind::EntryAlreadyInserted => {
                write!(f, "the entry has already been inserted")?
            }
            ErrorKind::Protocol => write!(f, "the service rejected the request")?,
            ErrorKind::ServiceUnavailable => {
                write!(f, "the service is temporarily unavailable")?
            }
            ErrorKind::ApiQuotaExceeded => write!(f, "the API request quota was exceeded")?,
            ErrorKind::EntryQuotaExceeded => write!(f, "the entry quota was exceeded")?,
            ErrorKind::ChannelRequired => {
                write!(f, "the account is not set up for this service")?
            }
            ErrorKind::Parse => write!(f, "the response could not be parsed")?,
            ErrorKind::Cancelled => write!(f, "the operation was cancelled")?,
        }
        if let Some(status_code) = self.status_code {
            write!(f, " (HTTP {status_code})")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ParseError> for Error {
    fn from(value: ParseError) -> Self {
        Self::parse(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::network(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_status_and_message() {
        let error = Error::new(ErrorKind::NotFound, "no such album").with_status_code(404);
        let text = error.to_string();
        assert!(text.contains("not found"), "{text}");
        assert!(text.contains("404"), "{text}");
        assert!(text.contains("no such album"), "{text}");
    }

    #[test]
    fn predicates() {
        assert!(Error::kind_only(ErrorKind::ServiceUnavailable).is_transient());
        assert!(Error::kind_only(ErrorKind::NetworkUnavailable).is_transient());
        assert!(!Error::kind_only(ErrorKind::NotFound).is_transient());
        assert!(Error::kind_only(ErrorKind::ConcurrentModification).is_conflict());
        assert!(Error::kind_only(ErrorKind::AuthenticationRequired).is_authentication());
    }

    #[test]
    fn source_chain_is_preserved() {
        let parse = ParseError::EmptyDocument;
        let error = Error::from(parse);
        assert_eq!(error.kind(), ErrorKind::Parse);
        assert!(error.source().is_some());
    }
}
