//! Local-disk upload storage
//!
//! A thin adapter: uploaded image bytes land under the configured
//! uploads directory with a unique derived filename, and the stored
//! post keeps the public `/uploads/<name>` path. The directory itself
//! is served read-only by the static file route.

use std::io;
use std::path::{Path, PathBuf};

use inkstone_core::slugify;

/// Public URL prefix the uploads directory is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

const DEFAULT_STEM: &str = "image";
const DEFAULT_EXT: &str = "jpg";

/// Upload storage rooted at a directory
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the uploads directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Store file bytes under a unique derived name, returning the
    /// public path to persist on the post.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let filename = derive_filename(original_name);
        tokio::fs::write(self.dir.join(&filename), bytes).await?;
        Ok(format!("{}/{}", PUBLIC_PREFIX, filename))
    }
}

/// Derive a unique, filesystem-safe filename from the client-supplied
/// one. The client name is untrusted: only its slugified stem and a
/// sanitized extension survive.
fn derive_filename(original_name: &str) -> String {
    let (stem, ext) = match original_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (original_name, ""),
    };

    let stem = match slugify(stem) {
        s if s.is_empty() => DEFAULT_STEM.to_string(),
        s => s,
    };

    let ext: String = ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .flat_map(char::to_lowercase)
        .collect();
    let ext = if ext.is_empty() { DEFAULT_EXT } else { ext.as_str() };

    format!("post-{}-{}.{}", stem, uuid::Uuid::new_v4(), ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_safe_unique_names() {
        let a = derive_filename("My Photo.JPG");
        let b = derive_filename("My Photo.JPG");

        assert!(a.starts_with("post-my-photo-"));
        assert!(a.ends_with(".jpg"));
        assert_ne!(a, b, "same input must not collide");
    }

    #[test]
    fn handles_hostile_names() {
        let name = derive_filename("../../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));

        let name = derive_filename("");
        assert!(name.starts_with("post-image-"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn keeps_recognizable_extension() {
        assert!(derive_filename("cover.png").ends_with(".png"));
        assert!(derive_filename("noext").ends_with(".jpg"));
    }

    #[tokio::test]
    async fn stores_bytes_and_returns_public_path() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());
        store.ensure_dir().await.unwrap();

        let public = store.store("banner.png", b"not-really-a-png").await.unwrap();
        assert!(public.starts_with("/uploads/post-banner-"));

        let filename = public.strip_prefix("/uploads/").unwrap();
        let on_disk = tokio::fs::read(tmp.path().join(filename)).await.unwrap();
        assert_eq!(on_disk, b"not-really-a-png");
    }
}
