use thiserror::Error;

/// Errors that can come out of an authenticated query or mutation.
///
/// Clonable so a single outcome can live in the cache, be handed to every
/// waiter of an in-flight request, and be broadcast to subscribers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The session is no longer accepted by the server. Recovered by cookie
    /// cleanup and a redirect to login, never rendered as an error.
    #[error("session is no longer authorized (status {status})")]
    Unauthorized { status: u16 },

    /// Any other non-success response, carrying the server-provided title
    /// so the consuming page can render it.
    #[error("server returned {status}: {title}")]
    Server { status: u16, title: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body could not be parsed.
    #[error("invalid response body: {0}")]
    Body(String),
}

impl QueryError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
