use thiserror::Error;

pub const GENERIC_FAILURE_MESSAGE: &str = "The analysis failed.";
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "Could not analyze the email. Please try again.";
pub const VALIDATION_MESSAGE: &str = "Please enter some text or select a file.";

/// Everything that can end a submission in the FAILED state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("no input provided")]
    Validation,

    #[error("server responded with status {status}")]
    Server { status: u16, detail: Option<String> },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response body: {0}")]
    MalformedResponse(String),

    #[error("request dropped before a response arrived")]
    Cancelled,
}

impl AnalyzeError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AnalyzeError::Validation => VALIDATION_MESSAGE.to_string(),
            AnalyzeError::Server {
                detail: Some(detail),
                ..
            } => detail.clone(),
            AnalyzeError::Server { detail: None, .. } | AnalyzeError::MalformedResponse(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            AnalyzeError::Cancelled => TRANSPORT_FALLBACK_MESSAGE.to_string(),
            AnalyzeError::Transport(msg) if msg.trim().is_empty() => {
                TRANSPORT_FALLBACK_MESSAGE.to_string()
            }
            AnalyzeError::Transport(msg) => msg.clone(),
        }
    }
}

impl From<reqwest::Error> for AnalyzeError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzeError::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("session state lock poisoned")]
    StatePoisoned,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("submission rejected: {0}")]
    Rejected(#[from] crate::controller::SubmitRejected),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_detail_is_shown_verbatim() {
        let err = AnalyzeError::Server {
            status: 400,
            detail: Some("invalid file".into()),
        };
        assert_eq!(err.user_message(), "invalid file");
    }

    #[test]
    fn missing_detail_falls_back_to_generic() {
        let err = AnalyzeError::Server {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        let err = AnalyzeError::MalformedResponse("eof".into());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn messages_are_english() {
        assert_eq!(GENERIC_FAILURE_MESSAGE, "The analysis failed.");
        assert_eq!(
            AnalyzeError::Validation.user_message(),
            "Please enter some text or select a file."
        );
        assert_eq!(
            AnalyzeError::Cancelled.user_message(),
            TRANSPORT_FALLBACK_MESSAGE
        );
    }

    #[test]
    fn blank_transport_message_uses_fallback() {
        assert_eq!(
            AnalyzeError::Transport("  ".into()).user_message(),
            TRANSPORT_FALLBACK_MESSAGE
        );
        assert_eq!(
            AnalyzeError::Transport("connection refused".into()).user_message(),
            "connection refused"
        );
    }
}
