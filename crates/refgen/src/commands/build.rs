//! Static page build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use refgen_site::StaticBuilder;

use crate::config::load_config;

/// Run the build command.
pub fn run(config_path: &Path, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building API reference pages...");

    let config = load_config(config_path)?.build_config(config_path, input, output);
    tracing::debug!("Reading from {}", config.input_dir.display());

    let result = StaticBuilder::new(config).build()?;

    if result.total() == 0 {
        return Ok(());
    }

    tracing::info!(
        "Generated {} of {} pages in {}ms",
        result.pages,
        result.total(),
        result.duration_ms
    );

    for failure in &result.failures {
        tracing::warn!("Skipped {}: {}", failure.source_path.display(), failure.error);
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
