//! CSV import file for the website CMS.

use std::path::{Path, PathBuf};

use anyhow::Context;
use catsync_core::ProductWithImageUrl;
use chrono::{DateTime, Local};

const HEADER: [&str; 8] = [
    "SKU",
    "Brand",
    "Category",
    "Title",
    "Description",
    "Photo",
    "Price",
    "External ID",
];

/// `import_{YYYY-MM-DD_HH-MM-SS}.csv`
pub(crate) fn csv_file_name(at: DateTime<Local>) -> String {
    format!("import_{}.csv", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Writes one row per product into a new timestamped file inside `dir`.
///
/// Returns `None` without creating anything when `products` is empty.
pub(crate) fn write_csv(
    dir: &Path,
    products: &[ProductWithImageUrl],
    at: DateTime<Local>,
) -> anyhow::Result<Option<PathBuf>> {
    if products.is_empty() {
        tracing::info!("CSV export skipped: no products to upload");
        return Ok(None);
    }

    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(csv_file_name(at));

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(HEADER)?;
    for item in products {
        let p = &item.product;
        let categories = p.categories.join(";");
        let price = p.price.map(|d| d.normalize().to_string()).unwrap_or_default();
        writer.write_record([
            p.sku.as_str(),
            p.brand.as_str(),
            categories.as_str(),
            p.title.as_str(),
            p.description.as_str(),
            item.image_url.as_str(),
            price.as_str(),
            p.external_id.as_str(),
        ])?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = products.len(), "CSV export written");
    Ok(Some(path))
}
