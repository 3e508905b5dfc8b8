//! Local image directory listing.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// File names of the regular files directly inside `dir`.
pub(crate) fn list_images(dir: &Path) -> anyhow::Result<BTreeSet<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read image directory {}", dir.display()))?;

    let mut names = BTreeSet::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => {
                names.insert(name);
            }
            Err(raw) => tracing::warn!(file = ?raw, "skipping image with non UTF-8 name"),
        }
    }

    tracing::debug!(dir = %dir.display(), images = names.len(), "listed image directory");
    Ok(names)
}

/// Deletes uploaded local images, never touching `default_image`.
///
/// Failures are logged and skipped; returns how many files were removed.
pub(crate) async fn delete_local(files: &[PathBuf], default_image: &Path) -> usize {
    let mut deleted = 0;
    for file in files.iter().filter(|f| f.as_path() != default_image) {
        match tokio::fs::remove_file(file).await {
            Ok(()) => deleted += 1,
            Err(e) => tracing::warn!(file = %file.display(), error = %e, "failed to delete uploaded image"),
        }
    }
    deleted
}
