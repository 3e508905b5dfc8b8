//! `state` command handlers.

use anyhow::Context;

use crate::sync::state_file;

pub(crate) fn show(config: &catsync_core::AppConfig) -> anyhow::Result<()> {
    let snapshot = state_file::load_state(&config.state_file)?;
    println!(
        "{} processed products recorded in {}",
        snapshot.len(),
        config.state_file.display()
    );
    Ok(())
}

pub(crate) fn reset(config: &catsync_core::AppConfig) -> anyhow::Result<()> {
    let removed = state_file::reset_state(&config.state_file)
        .with_context(|| format!("failed to reset {}", config.state_file.display()))?;
    if removed {
        tracing::info!(path = %config.state_file.display(), "state snapshot removed");
        println!("state reset: next sync will process every product");
    } else {
        println!("no state file at {}; nothing to reset", config.state_file.display());
    }
    Ok(())
}
