//! Environment/runtime helpers
//!
//! Sanity checks on the static asset directories at startup.

use tracing::warn;

/// Warn about asset directories that do not exist. Returns the missing ones.
///
/// Missing assets are not fatal: the page still renders, only `/images` and
/// `/css` requests will 404.
pub async fn ensure_asset_dirs(dirs: &[&str]) -> Vec<String> {
    let mut missing = Vec::new();
    for dir in dirs {
        match tokio::fs::metadata(dir).await {
            Ok(meta) if meta.is_dir() => {}
            _ => {
                warn!(%dir, "static assets directory not found; requests under it will 404");
                missing.push(dir.to_string());
            }
        }
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_only_missing_dirs() {
        let existing = std::env::temp_dir();
        let existing = existing.to_string_lossy().to_string();
        let missing = ensure_asset_dirs(&[existing.as_str(), "/nonexistent/contacts-assets"]).await;
        assert_eq!(missing, vec!["/nonexistent/contacts-assets".to_string()]);
    }
}
