//! Request and response bodies for the Dropbox HTTP API v2.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// `Dropbox-API-Arg` header payload for `files/upload`.
#[derive(Debug, Serialize)]
pub struct UploadArg<'a> {
    pub path: &'a str,
    pub mode: &'a str,
    pub mute: bool,
}

#[derive(Debug, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub path_display: Option<String>,
    #[serde(default)]
    pub path_lower: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSharedLinkArg<'a> {
    pub path: &'a str,
    pub settings: SharedLinkSettings<'a>,
}

#[derive(Debug, Serialize)]
pub struct SharedLinkSettings<'a> {
    pub requested_visibility: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ListSharedLinksArg<'a> {
    pub path: &'a str,
    pub direct_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct SharedLink {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ListSharedLinksResponse {
    #[serde(default)]
    pub links: Vec<SharedLink>,
}

/// Error envelope Dropbox returns alongside 4xx/409 statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_summary: String,
}
