//! Error types for imdb-top-ratings
//!
//! Every stage of the pipeline reports failures through [`Error`]. Failures are
//! terminal for the current run: nothing in this crate retries.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for imdb-top-ratings operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for imdb-top-ratings
#[derive(Debug, Error)]
pub enum Error {
    /// The requested number of movies is outside the accepted range
    #[error("invalid parameter: {value} is not between {min} and {max}")]
    InvalidParameter {
        /// The rejected value
        value: i64,
        /// Smallest accepted value
        min: u32,
        /// Largest accepted value
        max: u32,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "scrape.base_url")
        key: Option<String>,
    },

    /// A page did not have the expected structure
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Fetching or reading a detail page failed; aborts the whole enrichment batch
    #[error("enrichment failed for \"{title}\" ({url}): {source}")]
    Enrichment {
        /// Title of the movie whose detail page failed
        title: String,
        /// The detail page URL
        url: String,
        /// What went wrong
        #[source]
        source: Box<Error>,
    },

    /// Transport-level failure reported by a page fetcher
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A stage needed a field that an earlier stage has not populated yet
    #[error("record {rank} has no {field}")]
    MissingField {
        /// Rank of the offending record
        rank: u32,
        /// Name of the missing field
        field: &'static str,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Page-structure mismatches (site redesign, error page, geo-variant content)
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// An element the extractor relies on is absent
    #[error("{page} page: missing {what}")]
    MissingElement {
        /// Which page was being read
        page: PageKind,
        /// Description of the missing element
        what: String,
    },

    /// An element was found but its text could not be interpreted
    #[error("{page} page: cannot parse {field} from {value:?}")]
    MalformedValue {
        /// Which page was being read
        page: PageKind,
        /// The field being parsed
        field: &'static str,
        /// The raw text that failed to parse
        value: String,
    },

    /// The ranked table exists but has no rows
    #[error("listing page: ranked table has no rows")]
    EmptyListing,

    /// A CSS selector failed to compile
    #[error("invalid selector {selector:?}: {reason}")]
    Selector {
        /// The selector source
        selector: String,
        /// Parser message
        reason: String,
    },

    /// A link in the page could not be resolved to an absolute URL
    #[error("{page} page: invalid link {href:?}: {reason}")]
    InvalidLink {
        /// Which page was being read
        page: PageKind,
        /// The raw href
        href: String,
        /// Why it could not be resolved
        reason: String,
    },
}

/// Failures of the HTTP transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read
    #[error("request to {url} failed: {source}")]
    Request {
        /// Requested URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The request did not complete within the configured timeout
    #[error("request to {url} timed out after {}s", .after.as_secs())]
    Timeout {
        /// Requested URL
        url: String,
        /// The timeout that elapsed
        after: Duration,
    },

    /// The HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// The two kinds of pages this crate reads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    /// The ranked chart page
    Listing,
    /// A per-movie page
    Detail,
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageKind::Listing => f.write_str("listing"),
            PageKind::Detail => f.write_str("detail"),
        }
    }
}

impl Error {
    /// Title of the movie this error is attributed to, if any
    pub fn title(&self) -> Option<&str> {
        match self {
            Error::Enrichment { title, .. } => Some(title),
            _ => None,
        }
    }
}
