use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error: {reason}")]
    Http {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Invalid response: {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0} does not exist")]
    MissingIdentifier(&'static str),

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let reason = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Status {}", status.as_u16()));
        ApiError::Http {
            status: status.as_u16(),
            reason,
            body: Self::truncate_body(body),
        }
    }

    pub fn parse(context: &str, err: serde_json::Error) -> Self {
        ApiError::Parse(format!("{}: {}", context, err))
    }

    /// True when the request never reached a server that answered.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
