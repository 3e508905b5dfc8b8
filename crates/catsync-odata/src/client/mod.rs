//! HTTP client for the 1C OData interface.

mod fetch_all;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ODataError;
use crate::retry::retry_with_backoff;
use crate::types::ODataPage;

/// Maximum number of pages fetched per entity set before giving up.
/// Guards against servers that ignore `$skip` and return the same page
/// forever.
pub(super) const MAX_PAGES: usize = 1000;

/// Connection and paging settings for [`ODataClient`].
#[derive(Debug, Clone)]
pub struct ODataSettings {
    pub timeout_secs: u64,
    /// Records requested per page (`$top`).
    pub page_size: u32,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

impl Default for ODataSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            page_size: 1000,
            max_retries: 3,
            backoff_base_secs: 5,
        }
    }
}

/// Client for a 1C `standard.odata` endpoint using HTTP basic auth.
///
/// Status codes map to typed errors: 401/403 to
/// [`ODataError::Unauthorized`], 404 to [`ODataError::NotFound`], 429 to
/// [`ODataError::RateLimited`]. Transient failures are retried with
/// exponential back-off.
pub struct ODataClient {
    pub(super) client: Client,
    pub(super) base_url: Url,
    username: String,
    password: String,
    pub(super) settings: ODataSettings,
}

impl ODataClient {
    /// Creates a client for the OData root at `base_url`, e.g.
    /// `https://erp.example.com/base/odata/standard.odata`.
    ///
    /// # Errors
    ///
    /// Returns [`ODataError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`ODataError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        username: &str,
        password: &str,
        settings: ODataSettings,
    ) -> Result<Self, ODataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("catsync/0.1 (catalog-sync)")
            .build()?;

        // A trailing slash makes `Url::join` append entity sets instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ODataError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            username: username.to_owned(),
            password: password.to_owned(),
            settings,
        })
    }

    /// Fetches one page of `entity_set`, with automatic retry on transient
    /// errors.
    ///
    /// # Errors
    ///
    /// - [`ODataError::Unauthorized`]: credentials rejected (not retried).
    /// - [`ODataError::NotFound`]: unknown entity set (not retried).
    /// - [`ODataError::RateLimited`] / [`ODataError::UnexpectedStatus`]: after retries.
    /// - [`ODataError::Http`]: network failure after retries.
    /// - [`ODataError::Deserialize`]: body is not an OData JSON page.
    pub async fn fetch_page(
        &self,
        entity_set: &str,
        select: &[&str],
        skip: usize,
    ) -> Result<ODataPage, ODataError> {
        let url = self.page_url(entity_set, select, skip)?;

        retry_with_backoff(self.settings.max_retries, self.settings.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .basic_auth(&self.username, Some(&self.password))
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    return Err(ODataError::Unauthorized {
                        url: url.to_string(),
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ODataError::NotFound {
                        entity_set: entity_set.to_owned(),
                    });
                }

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ODataError::RateLimited { retry_after_secs });
                }

                if !status.is_success() {
                    return Err(ODataError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<ODataPage>(&body).map_err(|e| ODataError::Deserialize {
                    context: format!("{entity_set} page at $skip={skip}"),
                    source: e,
                })
            }
        })
        .await
    }

    /// Builds the page URL:
    /// `{base}/{entity_set}?$format=json&$select=a,b&$top=N&$skip=M`.
    ///
    /// `$select` is omitted when `select` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ODataError::InvalidBaseUrl`] if `entity_set` cannot be
    /// joined onto the base URL.
    fn page_url(&self, entity_set: &str, select: &[&str], skip: usize) -> Result<Url, ODataError> {
        let mut url = self
            .base_url
            .join(entity_set)
            .map_err(|e| ODataError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot append entity set \"{entity_set}\": {e}"),
            })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("$format", "json");
            if !select.is_empty() {
                query.append_pair("$select", &select.join(","));
            }
            query.append_pair("$top", &self.settings.page_size.to_string());
            query.append_pair("$skip", &skip.to_string());
        }

        Ok(url)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
