//! The `sync` command: ERP catalog to CSV import file.
//!
//! Steps run strictly in order and any failure aborts before the state
//! snapshot is written, so a failed run is retried in full next time.

mod export;
mod image_dir;
pub(crate) mod state_file;
mod upload;

use std::collections::BTreeSet;

use anyhow::Context;
use catsync_core::{
    map_catalog, match_images, stem_matches_sku, AppConfig, MappingRules, ProductWithImage,
    RawCatalog, StateSnapshot, SyncPlan,
};
use catsync_dropbox::DropboxClient;
use catsync_odata::{ODataClient, ODataSettings};

use self::upload::UploadOutcome;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SyncOptions {
    pub dry_run: bool,
    pub strict: bool,
}

/// Limits applied between mapping and diffing.
#[derive(Debug, Clone)]
pub(crate) struct PlanSettings<'a> {
    pub max_products: usize,
    pub default_image: &'a str,
    pub strict: bool,
}

/// Runs one full synchronization.
///
/// # Errors
///
/// Returns an error if the ERP fetch, image listing, state I/O, Dropbox
/// upload or CSV write fails, or if `strict` is set and the category tree
/// has integrity failures.
pub(crate) async fn run_sync(
    config: &AppConfig,
    rules: &MappingRules,
    options: SyncOptions,
) -> anyhow::Result<()> {
    let odata = ODataClient::new(
        &config.odata_url,
        &config.odata_username,
        &config.odata_password,
        ODataSettings {
            timeout_secs: config.odata_timeout_secs,
            page_size: config.odata_page_size,
            max_retries: config.odata_max_retries,
            backoff_base_secs: config.odata_retry_backoff_base_secs,
        },
    )
    .context("failed to build OData client")?;

    let raw = odata
        .fetch_catalog()
        .await
        .context("failed to fetch catalog from OData")?;
    tracing::info!(records = raw.products.len(), "received catalog items from ERP");

    let images = image_dir::list_images(&config.images_dir)?;
    let previous = state_file::load_state(&config.state_file)?;
    let plan = plan_run(
        &raw,
        rules,
        &images,
        &previous,
        &PlanSettings {
            max_products: config.max_products,
            default_image: &config.default_image,
            strict: options.strict,
        },
    )?;

    if options.dry_run {
        println!(
            "dry-run: {} products need processing, {} already done; nothing uploaded or written",
            plan.needs_processing.len(),
            plan.already_done.len()
        );
        return Ok(());
    }

    let outcome = if plan.needs_processing.is_empty() {
        tracing::info!("no new products; image upload and CSV export skipped");
        UploadOutcome::default()
    } else {
        let credentials = config.dropbox.as_ref().context(
            "DROPBOX_REFRESH_TOKEN, DROPBOX_APP_KEY and DROPBOX_APP_SECRET must be set to upload images",
        )?;
        let dropbox = DropboxClient::connect(
            credentials,
            &config.dropbox_folder,
            config.dropbox_timeout_secs,
        )
        .await
        .context("failed to authenticate with Dropbox")?;
        let dropbox = &dropbox;

        upload::upload_images(
            plan.needs_processing,
            &config.images_dir,
            config.upload_concurrency,
            |path| async move { dropbox.upload_and_get_url(&path).await },
        )
        .await?
    };

    let csv_path = export::write_csv(&config.csv_dir, &outcome.products, chrono::Local::now())?;
    state_file::save_state(&config.state_file, &plan.next_snapshot)?;

    let default_path = config.images_dir.join(&config.default_image);
    let deleted = image_dir::delete_local(&outcome.uploaded_files, &default_path).await;

    tracing::info!(
        exported = outcome.products.len(),
        uploaded = outcome.uploaded_files.len(),
        deleted,
        "sync complete"
    );
    match csv_path {
        Some(path) => println!("CSV ready for import: {}", path.display()),
        None => println!("nothing new to import"),
    }
    Ok(())
}

/// Maps the raw catalog, applies the product cap, attaches images and diffs
/// the result against `previous`.
pub(crate) fn plan_run(
    raw: &RawCatalog,
    rules: &MappingRules,
    images: &BTreeSet<String>,
    previous: &StateSnapshot,
    settings: &PlanSettings<'_>,
) -> anyhow::Result<SyncPlan<ProductWithImage>> {
    let mut mapping = map_catalog(raw, rules);

    for err in &mapping.integrity_errors {
        tracing::warn!(error = %err, "category integrity failure; affected items skipped");
    }
    if settings.strict && !mapping.integrity_errors.is_empty() {
        anyhow::bail!(
            "{} category integrity failure(s) in strict mode",
            mapping.integrity_errors.len()
        );
    }
    tracing::info!(
        products = mapping.products.len(),
        rejected = mapping.rejected,
        "mapped catalog items"
    );

    let dropped = mapping.truncate(settings.max_products);
    if dropped > 0 {
        tracing::warn!(
            max_products = settings.max_products,
            dropped,
            "product limit exceeded; list truncated"
        );
    }

    let matched = match_images(
        mapping.products,
        images,
        settings.default_image,
        stem_matches_sku,
    );
    let plan = SyncPlan::build(matched, previous);
    tracing::info!(
        needs_processing = plan.needs_processing.len(),
        already_done = plan.already_done.len(),
        "planned sync run"
    );
    Ok(plan)
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
