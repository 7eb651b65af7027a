use thiserror::Error;

/// A single page fetch failed. Terminal for that task only.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

/// Page body is not usable markup.
#[derive(Debug, Error)]
#[error("malformed document: {reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Numeric text that could not be converted.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot convert {text:?}: {reason}")]
pub struct ConversionError {
    pub text: String,
    pub reason: String,
}

impl ConversionError {
    pub fn new(text: &str, reason: impl ToString) -> Self {
        Self {
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// One extractor could not build its records from a parsed page.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid selector `{selector}`: {error}")]
    InvalidSelector {
        selector: &'static str,
        error: String,
    },

    #[error("required element `{selector}` not found")]
    MissingElement { selector: &'static str },

    #[error("attribute `{attr}` missing on `{selector}`")]
    MissingAttribute {
        selector: &'static str,
        attr: &'static str,
    },

    #[error("title {0:?} does not name two teams")]
    TitleMismatch(String),

    #[error("title names {0:?} on both sides")]
    SameTeam(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Whole-page failure: nothing from this page reaches the tables.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Conditions that stop a run before any request goes out.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("identity pool is empty; no User-Agent to send")]
    EmptyIdentityPool,

    #[error("invalid base url {url:?}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
