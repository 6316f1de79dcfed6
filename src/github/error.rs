use thiserror::Error;

/// Failures talking to the GitHub GraphQL and REST APIs
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("GraphQL errors: {}", .0.join(", "))]
    GraphQl(Vec<String>),
    #[error("No data in GraphQL response")]
    MissingData,
    #[error("{url} was still processing after {attempts} attempts")]
    PollTimeout { url: String, attempts: u32 },
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
