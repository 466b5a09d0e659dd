//! Environment/runtime helpers
//!
//! Sanity checks to ensure the device storage directory exists at startup.

use tracing::{debug, warn};

/// Ensure the storage directory exists, creating it when missing.
pub async fn ensure_env(data_dir: &str) -> anyhow::Result<()> {
    if data_dir.trim().is_empty() {
        warn!("empty data directory configured; storage file will live in the working directory");
        return Ok(());
    }
    if tokio::fs::metadata(data_dir).await.is_ok() {
        debug!(%data_dir, "data directory present");
        return Ok(());
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    warn!(%data_dir, "data directory was missing; created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_data_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("storefront_env_{}", uuid::Uuid::new_v4()));
        let path = dir.to_string_lossy().to_string();
        ensure_env(&path).await?;
        assert!(tokio::fs::metadata(&dir).await?.is_dir());
        // second call is a no-op
        ensure_env(&path).await?;
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
