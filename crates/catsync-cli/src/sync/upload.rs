//! Bounded-concurrency image upload with per-run de-duplication.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context;
use catsync_core::{ProductWithImage, ProductWithImageUrl};
use futures::stream::{self, StreamExt};

#[derive(Default)]
pub(crate) struct UploadOutcome {
    pub products: Vec<ProductWithImageUrl>,
    /// Local files that were uploaded, sorted.
    pub uploaded_files: Vec<PathBuf>,
}

/// Uploads every distinct image referenced by `items` once and attaches the
/// resulting URL to each product.
///
/// Any failed upload fails the whole batch so no product reaches the CSV
/// without a working image link.
pub(crate) async fn upload_images<F, Fut, E>(
    items: Vec<ProductWithImage>,
    images_dir: &Path,
    concurrency: usize,
    upload: F,
) -> anyhow::Result<UploadOutcome>
where
    F: Fn(PathBuf) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let unique: BTreeSet<String> = items.iter().map(|i| i.image.clone()).collect();
    tracing::info!(
        products = items.len(),
        images = unique.len(),
        "uploading images"
    );

    let results: Vec<(String, PathBuf, Result<String, E>)> = stream::iter(unique)
        .map(|name| {
            let path = images_dir.join(&name);
            let fut = upload(path.clone());
            async move { (name, path, fut.await) }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut urls = HashMap::with_capacity(results.len());
    let mut uploaded_files = Vec::with_capacity(results.len());
    for (name, path, result) in results {
        let url = result.with_context(|| format!("failed to upload {}", path.display()))?;
        urls.insert(name, url);
        uploaded_files.push(path);
    }
    uploaded_files.sort();

    let mut products = Vec::with_capacity(items.len());
    for item in items {
        let url = urls
            .get(&item.image)
            .cloned()
            .with_context(|| format!("no URL recorded for image {}", item.image))?;
        products.push(item.with_url(url));
    }

    Ok(UploadOutcome {
        products,
        uploaded_files,
    })
}
