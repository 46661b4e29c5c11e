//! Environment/runtime helpers
//!
//! Sanity checks so storage files can be written at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the data directory exists, creating it when missing.
pub async fn ensure_data_dir(data_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    debug!(%data_dir, "data directory ready");
    Ok(())
}

/// Ensure the parent directory of each configured storage file exists.
/// Bootstrap files are read-only inputs, so a missing one is only warned about here;
/// loading it later fails loudly.
pub async fn ensure_storage_paths(
    writable: &[Option<&Path>],
    bootstrap: &[Option<&Path>],
) -> anyhow::Result<()> {
    for path in writable.iter().flatten() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        }
    }
    for path in bootstrap.iter().flatten() {
        if tokio::fs::metadata(path).await.is_err() {
            warn!(path = %path.display(), "bootstrap file not found");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_parent_of_writable_file() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("common_env_{}", uuid::Uuid::new_v4()));
        let file = root.join("nested").join("tokens.json");

        ensure_storage_paths(&[Some(file.as_path()), None], &[None]).await?;
        assert!(tokio::fs::metadata(root.join("nested")).await?.is_dir());

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn data_dir_is_idempotent() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("common_data_{}", uuid::Uuid::new_v4()));
        let dir = root.to_string_lossy().to_string();
        ensure_data_dir(&dir).await?;
        ensure_data_dir(&dir).await?;
        assert!(tokio::fs::metadata(&root).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
