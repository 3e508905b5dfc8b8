use thiserror::Error;

/// Errors returned by the Dropbox client.
#[derive(Debug, Error)]
pub enum DropboxError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The refresh-token exchange was rejected.
    #[error("Dropbox authentication failed with status {status}: {body}")]
    Auth { status: u16, body: String },

    /// A Dropbox API endpoint returned a non-2xx status.
    #[error("Dropbox API error from {endpoint} (status {status}): {summary}")]
    Api {
        endpoint: String,
        status: u16,
        summary: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request argument: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to read image {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dropbox returned no shared link for {path}")]
    MissingLink { path: String },
}
