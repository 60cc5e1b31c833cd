use shared::error::{ApiException, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("server returned {status}: {source}")]
    Api {
        status: u16,
        #[source]
        source: ApiException,
    },
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl FetchError {
    /// Whether a retry of the same request has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Api { status, source } => {
                is_transient_status(*status) || matches!(source.code, ErrorCode::Internal)
            }
            FetchError::Status { status, .. } => is_transient_status(*status),
            FetchError::InvalidUrl(_) | FetchError::Decode(_) => false,
        }
    }
}

fn is_transient_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..600).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_throttling_are_transient() {
        for status in [408, 429, 500, 503] {
            let err = FetchError::Status {
                status,
                body: String::new(),
            };
            assert!(err.is_transient(), "{status}");
        }
    }

    #[test]
    fn client_errors_are_terminal() {
        let not_found = FetchError::Api {
            status: 404,
            source: ApiException::new(ErrorCode::NotFound, "Company not found"),
        };
        assert!(!not_found.is_transient());
        assert!(not_found.to_string().contains("Company not found"));

        let bad_url = FetchError::from(url::Url::parse("not a url").expect_err("invalid"));
        assert!(!bad_url.is_transient());
    }
}
