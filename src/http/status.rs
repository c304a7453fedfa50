//! Classification of HTTP status failures into readable errors.

use reqwest::StatusCode;

/// An HTTP request that completed with an unsuccessful status.
#[derive(Debug, PartialEq, Eq)]
pub enum RequestError {
    /// Rate limit exceeded (HTTP 429)
    RateLimited(String),
    /// Authentication failed (HTTP 401)
    Unauthorized(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Forbidden access (HTTP 403)
    Forbidden(String),
    /// Any other 4xx response
    Client(u16, String),
    /// Any 5xx response
    Server(u16, String),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::RateLimited(url) => {
                write!(f, "Rate limit exceeded for {}. Try again later.", url)
            }
            RequestError::Unauthorized(url) => {
                write!(
                    f,
                    "Authentication failed for {}. Check your MODRINTH_TOKEN.",
                    url
                )
            }
            RequestError::NotFound(url) => write!(f, "Not found: {}", url),
            RequestError::Forbidden(url) => write!(f, "Access forbidden: {}", url),
            RequestError::Client(status, url) => {
                write!(f, "Request error: HTTP {} from {}", status, url)
            }
            RequestError::Server(status, url) => {
                write!(f, "Server error: HTTP {} from {}", status, url)
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// Maps an unsuccessful status to a [`RequestError`].
/// Returns `None` for statuses that are not failures.
pub fn classify_status(status: StatusCode, url: &str) -> Option<RequestError> {
    let url = url.to_string();
    match status {
        StatusCode::UNAUTHORIZED => Some(RequestError::Unauthorized(url)),
        StatusCode::FORBIDDEN => Some(RequestError::Forbidden(url)),
        StatusCode::NOT_FOUND => Some(RequestError::NotFound(url)),
        StatusCode::TOO_MANY_REQUESTS => Some(RequestError::RateLimited(url)),
        s if s.is_client_error() => Some(RequestError::Client(s.as_u16(), url)),
        s if s.is_server_error() => Some(RequestError::Server(s.as_u16(), url)),
        _ => None,
    }
}

/// Turns a response with a failing status into an error, passing successful
/// responses through.
pub fn check_status(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
    match classify_status(response.status(), response.url().as_str()) {
        Some(err) => Err(anyhow::Error::from(err)),
        None => Ok(response),
    }
}
