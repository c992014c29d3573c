use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::Result;

/// Subdirectory of the media root that holds uploaded images.
pub const UPLOAD_DIR: &str = "images";

/// Blob storage for uploaded image files, rooted at a directory.
/// Paths handed out are relative to that root.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored blob.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Store `bytes` under `images/<file_name>` and return the relative path.
    /// A name collision with different content gets `_1`, `_2`, ... appended;
    /// a file already holding identical bytes is reused.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dir = self.root.join(UPLOAD_DIR);
        fs::create_dir_all(&dir)?;

        let digest = sha256_bytes(bytes);
        let base = sanitize_file_name(file_name);
        let original = Path::new(&base);
        let stem = original
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let ext = original
            .extension()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let mut candidate = base.clone();
        let mut counter = 1u32;
        loop {
            let target = dir.join(&candidate);
            if !target.exists() {
                fs::write(&target, bytes)?;
                tracing::debug!(path = %target.display(), "stored upload");
                break;
            }
            if sha256_file(&target)? == digest {
                tracing::debug!(path = %target.display(), "reusing identical upload");
                break;
            }
            candidate = if ext.is_empty() {
                format!("{stem}_{counter}")
            } else {
                format!("{stem}_{counter}.{ext}")
            };
            counter += 1;
        }

        Ok(Path::new(UPLOAD_DIR).join(candidate))
    }

    /// Delete a stored blob. A blob that is already gone is not an error.
    pub fn remove(&self, relative: &Path) -> Result<()> {
        match fs::remove_file(self.resolve(relative)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keep only the final path component; fall back to a fixed name.
fn sanitize_file_name(file_name: &str) -> String {
    let last = file_name
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty() && *part != "." && *part != "..")
        .unwrap_or("");
    if last.is_empty() {
        "upload".to_string()
    } else {
        last.to_string()
    }
}

fn sha256_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Streaming SHA-256 of a file in 64KB chunks.
fn sha256_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = std::io::BufReader::with_capacity(64 * 1024, file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_under_images() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path());

        let rel = media.save("beach.jpg", b"abc").unwrap();
        assert_eq!(rel, PathBuf::from("images/beach.jpg"));
        assert_eq!(fs::read(media.resolve(&rel)).unwrap(), b"abc");
    }

    #[test]
    fn test_save_collision_appends_counter() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path());

        let first = media.save("beach.jpg", b"one").unwrap();
        let second = media.save("beach.jpg", b"two").unwrap();
        let third = media.save("beach.jpg", b"three").unwrap();
        assert_eq!(first, PathBuf::from("images/beach.jpg"));
        assert_eq!(second, PathBuf::from("images/beach_1.jpg"));
        assert_eq!(third, PathBuf::from("images/beach_2.jpg"));
        assert_eq!(fs::read(media.resolve(&second)).unwrap(), b"two");
    }

    #[test]
    fn test_save_identical_content_reuses_file() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path());

        media.save("beach.jpg", b"one").unwrap();
        media.save("beach.jpg", b"two").unwrap();
        let again = media.save("beach.jpg", b"two").unwrap();
        assert_eq!(again, PathBuf::from("images/beach_1.jpg"));
    }

    #[test]
    fn test_save_without_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path());

        media.save("raw", b"one").unwrap();
        let second = media.save("raw", b"two").unwrap();
        assert_eq!(second, PathBuf::from("images/raw_1"));
    }

    #[test]
    fn test_save_strips_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path());

        let rel = media.save("../../etc/passwd", b"x").unwrap();
        assert_eq!(rel, PathBuf::from("images/passwd"));
        let rel = media.save("C:\\photos\\cat.png", b"y").unwrap();
        assert_eq!(rel, PathBuf::from("images/cat.png"));
        let rel = media.save("..", b"z").unwrap();
        assert_eq!(rel, PathBuf::from("images/upload"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let media = MediaStore::new(tmp.path());

        let rel = media.save("beach.jpg", b"abc").unwrap();
        media.remove(&rel).unwrap();
        assert!(!media.resolve(&rel).exists());
        media.remove(&rel).unwrap();
    }
}
