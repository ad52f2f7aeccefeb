//! Error types for Confluence integration.

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// The requested page does not exist (remote 404).
    ///
    /// A locator miss is an expected condition, kept separate from
    /// transport and server failures so callers can branch on it.
    #[error("page not found: {0}")]
    NotFound(String),

    /// A page's declared parent does not exist.
    #[error("parent page {0} does not exist")]
    ParentMissing(String),

    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
