use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, DropboxCredentials, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let odata_url = require("CATSYNC_ODATA_URL")?;
    let odata_username = require("CATSYNC_ODATA_USERNAME")?;
    let odata_password = require("CATSYNC_ODATA_PASSWORD")?;

    let env = parse_environment(&or_default("CATSYNC_ENV", "development"));
    let log_level = or_default("CATSYNC_LOG_LEVEL", "info");
    let log_dir = lookup("CATSYNC_LOG_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    let odata_page_size: u32 = parse_var(&or_default, "CATSYNC_ODATA_PAGE_SIZE", "1000")?;
    if odata_page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CATSYNC_ODATA_PAGE_SIZE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let odata_timeout_secs = parse_var(&or_default, "CATSYNC_ODATA_TIMEOUT_SECS", "60")?;
    let odata_max_retries = parse_var(&or_default, "CATSYNC_ODATA_MAX_RETRIES", "3")?;
    let odata_retry_backoff_base_secs =
        parse_var(&or_default, "CATSYNC_ODATA_RETRY_BACKOFF_BASE_SECS", "5")?;

    let dropbox = match (
        lookup("DROPBOX_REFRESH_TOKEN").ok(),
        lookup("DROPBOX_APP_KEY").ok(),
        lookup("DROPBOX_APP_SECRET").ok(),
    ) {
        (Some(refresh_token), Some(app_key), Some(app_secret)) => Some(DropboxCredentials {
            refresh_token,
            app_key,
            app_secret,
        }),
        (None, None, None) => None,
        _ => {
            return Err(ConfigError::InvalidEnvVar {
                var: "DROPBOX_REFRESH_TOKEN".to_string(),
                reason: "DROPBOX_REFRESH_TOKEN, DROPBOX_APP_KEY and DROPBOX_APP_SECRET must be set together"
                    .to_string(),
            })
        }
    };
    let dropbox_folder = or_default("CATSYNC_DROPBOX_FOLDER", "/Запчасти");
    let dropbox_timeout_secs = parse_var(&or_default, "CATSYNC_DROPBOX_TIMEOUT_SECS", "120")?;
    let upload_concurrency = parse_var(&or_default, "CATSYNC_UPLOAD_CONCURRENCY", "4")?;

    let images_dir = PathBuf::from(or_default("CATSYNC_IMAGES_DIR", "./images"));
    let default_image = or_default("CATSYNC_DEFAULT_IMAGE", "default.jpg");
    let csv_dir = PathBuf::from(or_default("CATSYNC_CSV_DIR", "./csv"));
    let state_file = PathBuf::from(or_default("CATSYNC_STATE_FILE", "./state.json"));
    let rules_path = PathBuf::from(or_default("CATSYNC_RULES_PATH", "./config/rules.yaml"));
    let max_products = parse_var(&or_default, "CATSYNC_MAX_PRODUCTS", "5000")?;

    Ok(AppConfig {
        env,
        log_level,
        log_dir,
        odata_url,
        odata_username,
        odata_password,
        odata_page_size,
        odata_timeout_secs,
        odata_max_retries,
        odata_retry_backoff_base_secs,
        dropbox,
        dropbox_folder,
        dropbox_timeout_secs,
        upload_concurrency,
        images_dir,
        default_image,
        csv_dir,
        state_file,
        rules_path,
        max_products,
    })
}

fn parse_var<T, D>(or_default: &D, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    D: Fn(&str, &str) -> String,
{
    or_default(var, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
