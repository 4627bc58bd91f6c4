//! On-disk store for uploaded image files.
//!
//! Files are written under a freshly generated `<uuid-v4>.<ext>` name so
//! concurrent uploads can never collide, and removed again when the record
//! that references them is deleted or its image replaced. The store is an
//! explicitly owned dependency injected through `AppState`, not a process
//! global.

use std::io;
use std::path::{Path, PathBuf};

/// Owns the upload directory and the naming scheme for stored files.
#[derive(Debug)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Open (and create if missing) the upload directory.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory files are stored in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a generated filename, returning that filename.
    ///
    /// The original filename contributes only its extension; the rest of the
    /// name is a random UUID.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let filename = generated_filename(original_name);
        let path = self.root.join(&filename);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(filename = %filename, size = bytes.len(), "Stored uploaded file");
        Ok(filename)
    }

    /// Remove a stored file. Missing files are not an error: the record may
    /// have been created before any image was attached.
    pub async fn remove(&self, filename: &str) -> io::Result<()> {
        let Some(path) = self.resolve(filename) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Resolve a stored filename to its path inside the upload directory.
    ///
    /// Returns `None` for names that could escape the directory (path
    /// separators, `..`, empty names).
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename == ".."
            || filename.contains('/')
            || filename.contains('\\')
        {
            return None;
        }
        Some(self.root.join(filename))
    }
}

/// Generate a collision-free stored filename, keeping the original extension.
fn generated_filename(original_name: &str) -> String {
    let id = uuid::Uuid::new_v4();
    match extension_of(original_name) {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

/// Extract a usable lowercase extension from an uploaded filename.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Guess a Content-Type from a stored filename's extension.
pub fn content_type_for_extension(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_generates_unique_names_and_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let a = store.save("cat.PNG", b"aaa").await.unwrap();
        let b = store.save("cat.PNG", b"bbb").await.unwrap();

        assert_ne!(a, b, "two uploads of the same name must not collide");
        assert!(a.ends_with(".png"), "extension is kept, lowercased: {a}");
        assert_eq!(std::fs::read(dir.path().join(&a)).unwrap(), b"aaa");
    }

    #[tokio::test]
    async fn save_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let name = store.save("noext", b"data").await.unwrap();
        assert!(!name.contains('.'), "no extension to keep: {name}");
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let name = store.save("x.png", b"data").await.unwrap();
        store.remove(&name).await.unwrap();
        assert!(!dir.path().join(&name).exists());

        // Removing again (or removing a name that never existed) is fine.
        store.remove(&name).await.unwrap();
        store.remove("never-there.png").await.unwrap();
    }

    #[test]
    fn resolve_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        assert!(store.resolve("ok.png").is_some());
        assert!(store.resolve("").is_none());
        assert!(store.resolve("..").is_none());
        assert!(store.resolve("../etc/passwd").is_none());
        assert!(store.resolve("a/b.png").is_none());
        assert!(store.resolve("a\\b.png").is_none());
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for_extension("a.png"), "image/png");
        assert_eq!(content_type_for_extension("a.JPG"), "image/jpeg");
        assert_eq!(
            content_type_for_extension("mystery"),
            "application/octet-stream"
        );
    }
}
