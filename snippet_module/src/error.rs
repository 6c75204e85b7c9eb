use reqwest::StatusCode;

/// Failure while resolving one snippet reference.
///
/// The aggregator downgrades every variant to "no contribution" for the
/// offending match; none of them reach the user.
#[derive(Debug, thiserror::Error)]
pub enum SnippetError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Status { status: StatusCode, url: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("failed to decode forge response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SnippetError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnippetError::NotFound(_))
    }
}
