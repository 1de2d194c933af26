//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Create the directory holding `data_file`; warn if `public_dir` is missing.
pub async fn ensure_env(public_dir: &str, data_file: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(public_dir).await.is_err() {
        warn!(%public_dir, "static assets directory not found; / and /admin will 404");
    }
    if let Some(data_dir) = Path::new(data_file).parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    }
    Ok(())
}
