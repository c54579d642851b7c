//! Error types for the vedur client.

/// Errors that can occur while building, sending or normalizing a request.
#[derive(Debug, thiserror::Error)]
pub enum VedurError {
    /// No station ids / text types were supplied.
    #[error("No {what} supplied")]
    MissingIdentifiers { what: &'static str },

    /// Language other than `is` or `en`.
    #[error("Incorrect language '{0}' -- only 'is' or 'en' allowed")]
    InvalidLanguage(String),

    /// The upstream did not respond (connect, timeout, body read).
    #[error("{url} did not respond: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status.
    #[error("{url} responded with status {status}: {body}")]
    UpstreamStatus { url: String, status: u16, body: String },

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("XML parse error: {message}")]
    XmlParse { message: String },

    #[error("Error loading DOM: {message}")]
    DomLoad { message: String },

    /// A station link did not match the expected markup; the source page changed.
    #[error("Parsing error -- source is changed: {message}")]
    ScrapePatternMismatch { message: String },

    /// The XML document did not have the expected wrapper structure.
    #[error("Unexpected response structure: {message}")]
    SchemaMismatch { message: String },
}

impl VedurError {
    pub(crate) fn xml<S: Into<String>>(message: S) -> Self {
        Self::XmlParse { message: message.into() }
    }

    pub(crate) fn schema<S: Into<String>>(message: S) -> Self {
        Self::SchemaMismatch { message: message.into() }
    }

    pub(crate) fn scrape<S: Into<String>>(message: S) -> Self {
        Self::ScrapePatternMismatch { message: message.into() }
    }

    /// True for errors raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingIdentifiers { .. } | Self::InvalidLanguage(_))
    }
}

pub type Result<T, E = VedurError> = std::result::Result<T, E>;
