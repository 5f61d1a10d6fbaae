use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::error::AppError;

/// Public prefix of every stored attachment path.
pub const PUBLIC_PREFIX: &str = "uploads";

/// Upload destinations, one directory each under the upload root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    EventPayment,
    ProductImage,
    PurchasePayment,
    Receipt,
}

impl UploadKind {
    pub const ALL: [UploadKind; 4] = [
        UploadKind::EventPayment,
        UploadKind::ProductImage,
        UploadKind::PurchasePayment,
        UploadKind::Receipt,
    ];

    pub fn dir(&self) -> &'static str {
        match self {
            UploadKind::EventPayment => "eventPayment",
            UploadKind::ProductImage => "productImage",
            UploadKind::PurchasePayment => "purchasePayment",
            UploadKind::Receipt => "receipts",
        }
    }

    /// Multipart field that carries the file.
    pub fn field(&self) -> &'static str {
        match self {
            UploadKind::EventPayment | UploadKind::PurchasePayment => "paymentSlip",
            UploadKind::ProductImage => "image",
            UploadKind::Receipt => "receipt",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self { root: root.into(), max_bytes }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for kind in UploadKind::ALL {
            tokio::fs::create_dir_all(self.root.join(kind.dir())).await?;
        }
        Ok(())
    }

    /// Writes the file and returns its public path (`uploads/<dir>/<name>`).
    pub async fn save(&self, kind: UploadKind, file: &UploadedFile) -> Result<String, AppError> {
        if file.bytes.len() > self.max_bytes {
            return Err(AppError::UploadError(format!(
                "File exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let stored_name = format!("{}-{}", uuid::Uuid::new_v4(), sanitize_filename(&file.filename));
        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir).await?;

        let mut out = tokio::fs::File::create(dir.join(&stored_name)).await?;
        out.write_all(&file.bytes).await?;
        out.flush().await?;

        let public = format!("{}/{}/{}", PUBLIC_PREFIX, kind.dir(), stored_name);
        log::info!("📎 Stored upload {} ({} bytes)", public, file.bytes.len());
        Ok(public)
    }

    /// Best-effort removal of a previously stored attachment.
    pub async fn remove(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            log::warn!("⚠️  Refusing to remove upload outside the upload root: {}", public_path);
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(_) => log::info!("🗑️  Removed upload {}", public_path),
            Err(e) => log::warn!("⚠️  Could not remove upload {}: {}", public_path, e),
        }
    }

    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let relative = Path::new(public_path.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return None;
        }
        Some(self.root.join(relative))
    }
}

pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\slip.pdf"), "slip.pdf");
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename(".."), "file");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = UploadStore::new("/srv/uploads", 1024);
        assert_eq!(
            store.resolve("uploads/productImage/a.png"),
            Some(PathBuf::from("/srv/uploads/productImage/a.png"))
        );
        assert_eq!(store.resolve("uploads/../secret"), None);
        assert_eq!(store.resolve("elsewhere/a.png"), None);
        assert_eq!(store.resolve("uploads/"), None);
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 1024);

        let file = UploadedFile { filename: "slip.pdf".into(), bytes: b"%PDF-1.4".to_vec() };
        let public = store.save(UploadKind::Receipt, &file).await.unwrap();

        assert!(public.starts_with("uploads/receipts/"));
        assert!(public.ends_with("-slip.pdf"));
        let on_disk = store.resolve(&public).unwrap();
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), b"%PDF-1.4");

        store.remove(&public).await;
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn test_save_rejects_oversized() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 4);

        let file = UploadedFile { filename: "big.bin".into(), bytes: vec![0; 5] };
        let result = store.save(UploadKind::ProductImage, &file).await;
        assert!(matches!(result, Err(AppError::UploadError(_))));
    }
}
