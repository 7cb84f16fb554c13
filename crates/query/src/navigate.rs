//! The navigation seam consumed by the session guard.

use async_trait::async_trait;

/// Minimal routing surface: where we are, and how to go elsewhere.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// The path currently being displayed.
    fn current_path(&self) -> String;

    /// Navigate to `path`.
    async fn push(&self, path: &str) -> anyhow::Result<()>;
}
