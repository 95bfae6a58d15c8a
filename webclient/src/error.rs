use std::time::Duration;

use reqwest::StatusCode;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to parse as URL '{url}'")]
    InvalidSyntaxUrl {
        url: String,

        #[source]
        source: url::ParseError,
    },

    #[error("Invalid URL glob '{0}'")]
    InvalidUrlGlob(String, #[source] glob::PatternError),

    #[error("Piston API error: {got} - {body} (while requesting to {requested_url})")]
    UnexpectedResponseCode {
        got: StatusCode,
        body: String,
        requested_url: String,
    },

    #[error("Request to {requested_url} aborted after {}ms", elapsed.as_millis())]
    Aborted {
        requested_url: String,
        elapsed: Duration,
    },

    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
