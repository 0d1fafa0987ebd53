use reqwest::StatusCode;

/// Failures that abandon a single poll cycle. None of them stop the loop.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("homework API returned {status}: {body}")]
    Transport { status: StatusCode, body: String },

    #[error("homework API request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("homework API response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("homework list is empty")]
    Empty,

    #[error("homework record has no usable `{0}`")]
    Field(&'static str),

    #[error("undocumented homework status: {0:?}")]
    UnknownStatus(String),
}

/// A notification that could not be delivered.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("messenger request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("messenger rejected the message: {0}")]
    Rejected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
