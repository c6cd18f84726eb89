use reqwest::StatusCode;
use thiserror::Error;

/// How much of a response body is quoted in an error message
const BODY_EXCERPT_BYTES: usize = 500;

/// Failures talking to the GoBarber backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401: the backend did not accept the e-mail/password pair or the token
    #[error("Incorrect e-mail/password combination")]
    Unauthorized,

    /// 4xx other than 401 and 429, e.g. an e-mail already in use at sign-up
    #[error("GoBarber rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Too many requests to GoBarber, try again shortly")]
    TooManyRequests,

    #[error("GoBarber is unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("Could not reach GoBarber: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from GoBarber: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// First `BODY_EXCERPT_BYTES` of `body`, cut on a character boundary
    fn excerpt(body: &str) -> String {
        let body = body.trim();
        if body.len() <= BODY_EXCERPT_BYTES {
            return body.to_string();
        }
        let mut end = BODY_EXCERPT_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... ({} bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let code = status.as_u16();
        match code {
            401 => ApiError::Unauthorized,
            429 => ApiError::TooManyRequests,
            500..=599 => ApiError::Unavailable {
                status: code,
                message: Self::excerpt(body),
            },
            _ => ApiError::Rejected {
                status: code,
                message: Self::excerpt(body),
            },
        }
    }
}
