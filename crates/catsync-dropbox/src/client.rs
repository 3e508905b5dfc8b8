//! HTTP client for the Dropbox API v2.
//!
//! Authenticates once with a long-lived refresh token, then uploads files in
//! overwrite mode and hands back direct-download shared links.

use std::path::Path;
use std::time::Duration;

use catsync_core::DropboxCredentials;
use reqwest::{Client, Response};

use crate::error::DropboxError;
use crate::header::header_safe_json;
use crate::types::{
    ApiErrorBody, CreateSharedLinkArg, FileMetadata, ListSharedLinksArg, ListSharedLinksResponse,
    SharedLink, SharedLinkSettings, TokenResponse, UploadArg,
};

const ALREADY_EXISTS: &str = "shared_link_already_exists";

/// Base URLs of the three Dropbox hosts the client talks to.
#[derive(Debug, Clone)]
pub struct DropboxEndpoints {
    /// RPC endpoints (`/2/sharing/...`).
    pub api: String,
    /// Content upload endpoints (`/2/files/upload`).
    pub content: String,
    /// OAuth token endpoint host.
    pub oauth: String,
}

impl Default for DropboxEndpoints {
    fn default() -> Self {
        Self {
            api: "https://api.dropboxapi.com".to_owned(),
            content: "https://content.dropboxapi.com".to_owned(),
            oauth: "https://api.dropbox.com".to_owned(),
        }
    }
}

impl DropboxEndpoints {
    /// Points all three hosts at one server (for testing with wiremock).
    #[must_use]
    pub fn single(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_owned();
        Self {
            api: base.clone(),
            content: base.clone(),
            oauth: base,
        }
    }
}

/// Authenticated Dropbox client scoped to one remote folder.
///
/// Use [`DropboxClient::connect`] for production or
/// [`DropboxClient::connect_with_endpoints`] to point at a mock server.
pub struct DropboxClient {
    client: Client,
    access_token: String,
    folder: String,
    endpoints: DropboxEndpoints,
}

impl DropboxClient {
    /// Exchanges the refresh token for an access token against the
    /// production Dropbox hosts.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::Auth`] if the token exchange is rejected, or
    /// [`DropboxError::Http`] on network failure.
    pub async fn connect(
        credentials: &DropboxCredentials,
        folder: &str,
        timeout_secs: u64,
    ) -> Result<Self, DropboxError> {
        Self::connect_with_endpoints(credentials, folder, timeout_secs, DropboxEndpoints::default())
            .await
    }

    /// Like [`Self::connect`] but with custom endpoints.
    ///
    /// # Errors
    ///
    /// See [`Self::connect`].
    pub async fn connect_with_endpoints(
        credentials: &DropboxCredentials,
        folder: &str,
        timeout_secs: u64,
        endpoints: DropboxEndpoints,
    ) -> Result<Self, DropboxError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("catsync/0.1 (catalog-sync)")
            .build()?;

        let response = client
            .post(format!("{}/oauth2/token", endpoints.oauth))
            .basic_auth(&credentials.app_key, Some(&credentials.app_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DropboxError::Auth {
                status: status.as_u16(),
                body,
            });
        }
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| DropboxError::Deserialize {
                context: "oauth2/token".to_owned(),
                source: e,
            })?;
        tracing::debug!(expires_in = ?token.expires_in, "obtained Dropbox access token");

        Ok(Self {
            client,
            access_token: token.access_token,
            folder: normalise_folder(folder),
            endpoints,
        })
    }

    /// Remote path for a file name inside the configured folder.
    #[must_use]
    pub fn remote_path(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.folder)
    }

    /// Uploads `local_path` into the folder, overwriting any file of the same
    /// name, and returns a direct-download URL for it.
    ///
    /// # Errors
    ///
    /// - [`DropboxError::Io`] if the local file cannot be read.
    /// - [`DropboxError::Api`] if Dropbox rejects the upload or link request.
    /// - [`DropboxError::Http`] on network failure.
    pub async fn upload_and_get_url(&self, local_path: &Path) -> Result<String, DropboxError> {
        let remote = self.upload(local_path).await?;
        let link = self.shared_link(&remote).await?;
        Ok(raw_url(&link))
    }

    /// Uploads one file and returns its remote path.
    ///
    /// # Errors
    ///
    /// See [`Self::upload_and_get_url`].
    pub async fn upload(&self, local_path: &Path) -> Result<String, DropboxError> {
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let remote = self.remote_path(&file_name);

        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| DropboxError::Io {
                path: local_path.display().to_string(),
                source: e,
            })?;

        let arg = header_safe_json(&UploadArg {
            path: &remote,
            mode: "overwrite",
            mute: true,
        })
        .map_err(DropboxError::Encode)?;

        let response = self
            .client
            .post(format!("{}/2/files/upload", self.endpoints.content))
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", arg)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        let metadata: FileMetadata = parse_response("files/upload", response).await?;
        let stored = metadata
            .path_display
            .or(metadata.path_lower)
            .unwrap_or(remote);
        tracing::debug!(local = %local_path.display(), remote = %stored, "uploaded image");
        Ok(stored)
    }

    /// Returns a public shared link for `remote_path`, creating one if none
    /// exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`DropboxError::Api`] for any rejection other than an
    /// already-existing link, and [`DropboxError::MissingLink`] if Dropbox
    /// reports an existing link but lists none.
    pub async fn shared_link(&self, remote_path: &str) -> Result<String, DropboxError> {
        let create = CreateSharedLinkArg {
            path: remote_path,
            settings: SharedLinkSettings {
                requested_visibility: "public",
            },
        };
        let response = self
            .client
            .post(format!(
                "{}/2/sharing/create_shared_link_with_settings",
                self.endpoints.api
            ))
            .bearer_auth(&self.access_token)
            .json(&create)
            .send()
            .await?;

        match parse_response::<SharedLink>("sharing/create_shared_link_with_settings", response)
            .await
        {
            Ok(link) => Ok(link.url),
            Err(DropboxError::Api { ref summary, .. }) if summary.starts_with(ALREADY_EXISTS) => {
                self.existing_link(remote_path).await
            }
            Err(e) => Err(e),
        }
    }

    async fn existing_link(&self, remote_path: &str) -> Result<String, DropboxError> {
        let response = self
            .client
            .post(format!("{}/2/sharing/list_shared_links", self.endpoints.api))
            .bearer_auth(&self.access_token)
            .json(&ListSharedLinksArg {
                path: remote_path,
                direct_only: true,
            })
            .send()
            .await?;

        let listed: ListSharedLinksResponse =
            parse_response("sharing/list_shared_links", response).await?;
        listed
            .links
            .into_iter()
            .next()
            .map(|l| l.url)
            .ok_or_else(|| DropboxError::MissingLink {
                path: remote_path.to_owned(),
            })
    }
}

/// Checks the status and deserializes a successful body, or turns a
/// non-2xx response into [`DropboxError::Api`] carrying Dropbox's
/// `error_summary`.
async fn parse_response<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    response: Response,
) -> Result<T, DropboxError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let summary = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .map(|b| b.error_summary)
            .filter(|s| !s.is_empty())
            .unwrap_or(body);
        return Err(DropboxError::Api {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            summary,
        });
    }

    serde_json::from_str(&body).map_err(|e| DropboxError::Deserialize {
        context: endpoint.to_owned(),
        source: e,
    })
}

fn normalise_folder(folder: &str) -> String {
    let trimmed = folder.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Rewrites a shared link so it serves the file itself instead of the
/// Dropbox preview page.
#[must_use]
pub fn raw_url(link: &str) -> String {
    if link.contains("dl=0") {
        return link.replace("dl=0", "raw=1");
    }
    if link.contains("dl=1") {
        return link.replace("dl=1", "raw=1");
    }
    if link.contains("raw=1") {
        return link.to_owned();
    }
    let sep = if link.contains('?') { '&' } else { '?' };
    format!("{link}{sep}raw=1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_url_rewrites_preview_flag() {
        assert_eq!(
            raw_url("https://www.dropbox.com/scl/fi/abc/a.jpg?rlkey=x&dl=0"),
            "https://www.dropbox.com/scl/fi/abc/a.jpg?rlkey=x&raw=1"
        );
    }

    #[test]
    fn raw_url_appends_flag_when_missing() {
        assert_eq!(
            raw_url("https://www.dropbox.com/s/abc/a.jpg"),
            "https://www.dropbox.com/s/abc/a.jpg?raw=1"
        );
        assert_eq!(
            raw_url("https://www.dropbox.com/s/abc/a.jpg?rlkey=x"),
            "https://www.dropbox.com/s/abc/a.jpg?rlkey=x&raw=1"
        );
    }

    #[test]
    fn raw_url_keeps_existing_raw_flag() {
        let link = "https://www.dropbox.com/s/abc/a.jpg?raw=1";
        assert_eq!(raw_url(link), link);
    }

    #[test]
    fn folder_is_normalised_to_single_leading_slash() {
        assert_eq!(normalise_folder("/Запчасти/"), "/Запчасти");
        assert_eq!(normalise_folder("images"), "/images");
        assert_eq!(normalise_folder("/"), "");
    }
}
