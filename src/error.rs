use thiserror::Error;

/// Failures that abort a search request. Enrichment-field failures never
/// show up here: the enrichment engine logs and swallows them per product.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid filter value(s): {0}")]
    Validation(String),

    #[error("the language model refused to answer: {0}")]
    InterpretationRefused(String),

    #[error("upstream request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed upstream record: {0}")]
    Normalization(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
