use anyhow::{Context, Result};
use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

/// 描画結果の書き出し先
#[automock]
#[async_trait]
pub trait OutputStore: Send + Sync {
    /// データを書き込む（既存ファイルは上書き）
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// 出力先が既に存在するかチェック
    async fn exists(&self, path: &Path) -> bool;
}

/// ローカルファイルシステムへの書き出し
#[derive(Clone, Default)]
pub struct LocalOutputStore;

impl LocalOutputStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputStore for LocalOutputStore {
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        tokio::fs::write(path, data)
            .await
            .with_context(|| format!("Failed to write output: {}", path.display()))
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}
