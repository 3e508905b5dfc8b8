use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Dropbox app credentials; only needed when images are uploaded.
#[derive(Clone)]
pub struct DropboxCredentials {
    pub refresh_token: String,
    pub app_key: String,
    pub app_secret: String,
}

impl std::fmt::Debug for DropboxCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropboxCredentials")
            .field("refresh_token", &"[redacted]")
            .field("app_key", &self.app_key)
            .field("app_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub odata_url: String,
    pub odata_username: String,
    pub odata_password: String,
    pub odata_page_size: u32,
    pub odata_timeout_secs: u64,
    pub odata_max_retries: u32,
    pub odata_retry_backoff_base_secs: u64,
    pub dropbox: Option<DropboxCredentials>,
    pub dropbox_folder: String,
    pub dropbox_timeout_secs: u64,
    pub upload_concurrency: usize,
    pub images_dir: PathBuf,
    pub default_image: String,
    pub csv_dir: PathBuf,
    pub state_file: PathBuf,
    pub rules_path: PathBuf,
    pub max_products: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("odata_url", &self.odata_url)
            .field("odata_username", &self.odata_username)
            .field("odata_password", &"[redacted]")
            .field("odata_page_size", &self.odata_page_size)
            .field("odata_timeout_secs", &self.odata_timeout_secs)
            .field("odata_max_retries", &self.odata_max_retries)
            .field(
                "odata_retry_backoff_base_secs",
                &self.odata_retry_backoff_base_secs,
            )
            .field("dropbox", &self.dropbox)
            .field("dropbox_folder", &self.dropbox_folder)
            .field("dropbox_timeout_secs", &self.dropbox_timeout_secs)
            .field("upload_concurrency", &self.upload_concurrency)
            .field("images_dir", &self.images_dir)
            .field("default_image", &self.default_image)
            .field("csv_dir", &self.csv_dir)
            .field("state_file", &self.state_file)
            .field("rules_path", &self.rules_path)
            .field("max_products", &self.max_products)
            .finish()
    }
}
