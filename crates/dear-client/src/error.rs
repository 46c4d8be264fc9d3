use thiserror::Error;

#[derive(Debug, Error)]
pub enum DearError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DEAR API returned {status} for {context}: {body}")]
    Status {
        context: String,
        status: u16,
        body: String,
    },

    #[error("failed to parse {context} response: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid credential header: {0}")]
    InvalidHeader(String),
}
