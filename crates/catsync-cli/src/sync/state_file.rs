//! JSON persistence for the processed-products snapshot.
//!
//! File format: `{"version": 1, "keys": ["<Ref_Key>", ...]}`. A missing file
//! is an empty snapshot (first run). Saves go through a temp file and a
//! rename so a crash mid-write never leaves a truncated snapshot behind.

use std::path::{Path, PathBuf};

use anyhow::Context;
use catsync_core::StateSnapshot;
use serde::{Deserialize, Serialize};

const STATE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    keys: StateSnapshot,
}

pub(crate) fn load_state(path: &Path) -> anyhow::Result<StateSnapshot> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no state file, starting from an empty snapshot");
            return Ok(StateSnapshot::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read state file {}", path.display()))
        }
    };

    let file: StateFile = serde_json::from_str(&raw)
        .with_context(|| format!("state file {} is not valid JSON", path.display()))?;
    if file.version != STATE_VERSION {
        anyhow::bail!(
            "state file {} has unsupported version {} (expected {STATE_VERSION})",
            path.display(),
            file.version
        );
    }
    Ok(file.keys)
}

pub(crate) fn save_state(path: &Path, snapshot: &StateSnapshot) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let body = serde_json::to_string_pretty(&StateFile {
        version: STATE_VERSION,
        keys: snapshot.clone(),
    })?;

    let tmp = tmp_path(path);
    std::fs::write(&tmp, body).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to move {} into place", tmp.display()))?;

    tracing::info!(path = %path.display(), keys = snapshot.len(), "state snapshot saved");
    Ok(())
}

/// Removes the snapshot file. Returns `false` when there was none.
pub(crate) fn reset_state(path: &Path) -> std::io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
