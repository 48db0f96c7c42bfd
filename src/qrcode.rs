use async_trait::async_trait;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Shows the login QR code to the user.
///
/// `show` receives the PNG bytes as served; `dismiss` is called once the code
/// has been scanned.
#[async_trait]
pub trait QrCodeDisplay: Send + Sync {
    async fn show(&self, png: &[u8]) -> anyhow::Result<()>;

    async fn dismiss(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Writes the QR code to a file and removes it after the scan.
#[derive(Debug, Clone)]
pub struct FileQrCodeDisplay {
    path: PathBuf,
}

impl FileQrCodeDisplay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<temp dir>/webqq-qrcode.png`
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("webqq-qrcode.png"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QrCodeDisplay for FileQrCodeDisplay {
    async fn show(&self, png: &[u8]) -> anyhow::Result<()> {
        tokio::fs::write(&self.path, png).await?;
        info!(target: "Client/QR", "QR code saved to {}, scan it with the mobile app", self.path.display());
        Ok(())
    }

    async fn dismiss(&self) -> anyhow::Result<()> {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            warn!(target: "Client/QR", "Could not remove {}: {e}", self.path.display());
        }
        Ok(())
    }
}
