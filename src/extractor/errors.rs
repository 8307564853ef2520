use thiserror::Error;

use crate::fetcher::FetchError;

#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The URL is malformed or not on the supported platform. Raised before
    /// any network access.
    #[error("invalid source: {0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(#[source] FetchError),

    /// The page was retrieved but nothing usable came out of it.
    #[error("insufficient content: {0}")]
    InsufficientContent(InsufficientReason),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsufficientReason {
    #[error("no title or body found")]
    NothingFound,

    #[error("title has {title_chars} chars and body has {body_chars} chars")]
    TooShort {
        title_chars: usize,
        body_chars: usize,
    },

    #[error("unusable response: {0}")]
    UnusableResponse(String),
}

impl ExtractionError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Network(_) => "network",
            Self::InsufficientContent(_) => "insufficient_content",
        }
    }

    /// Message safe to show an end user; transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(reason) => format!("Not a supported article link: {}", reason),
            Self::Network(FetchError::ConnectTimeout | FetchError::RequestTimeout) => {
                "The article page took too long to respond".to_string()
            }
            Self::Network(FetchError::Http { status }) => {
                format!("The article page returned HTTP {}", status.as_u16())
            }
            Self::Network(_) => "The article page could not be reached".to_string(),
            Self::InsufficientContent(InsufficientReason::TooShort { .. }) => {
                "Too little content was found; the link may have expired or require login"
                    .to_string()
            }
            Self::InsufficientContent(_) => {
                "No usable content could be extracted from this link".to_string()
            }
        }
    }
}

impl From<FetchError> for ExtractionError {
    fn from(err: FetchError) -> Self {
        if let FetchError::InvalidUrl(e) = &err {
            return Self::Validation(e.to_string());
        }

        if err.is_network() || matches!(err, FetchError::Client(_)) {
            Self::Network(err)
        } else {
            Self::InsufficientContent(InsufficientReason::UnusableResponse(err.to_string()))
        }
    }
}
