use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Everything that can go wrong between sending a request and holding a parsed payload.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} responded with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint answered 200 but sent an error object instead of data.
    #[error("{url} returned an error: {message}")]
    Api { url: String, message: String },
}
