use thiserror::Error;

#[derive(Debug, Error)]
pub enum ODataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("OData credentials rejected by {url}")]
    Unauthorized { url: String },

    #[error("entity set not found: {entity_set}")]
    NotFound { entity_set: String },

    #[error("rate limited by OData server (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached for {entity_set}: exceeded {max_pages} pages")]
    PaginationLimit {
        entity_set: String,
        max_pages: usize,
    },

    #[error("invalid OData base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
