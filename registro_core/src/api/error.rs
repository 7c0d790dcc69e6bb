use reqwest::StatusCode;
use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can happen while talking to the server
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the base URL was invalid.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The request never made it to the server (DNS failure, connection
    /// refused, etc.)
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body. The message is meant to be
    /// surfaced verbatim to whoever is looking at the form.
    #[error("{0}")]
    Api(String),

    /// The server returned something that is neither success nor error (it
    /// is not supposed to issue redirects or informational responses.)
    #[error("respuesta inesperada del servidor: {0}")]
    Unexpected(StatusCode),
}
