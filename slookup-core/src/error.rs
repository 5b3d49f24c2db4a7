//! Error type shared by the lookup pipeline.

/// Errors that can occur while fetching or reporting nearby stations.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The request never got a response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body is not a well-formed XML document.
    #[error("XML syntax error: {message}")]
    Parse { message: String },

    /// Writing the report failed. Never fatal to a run.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LookupError {
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse { message: message.into() }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
