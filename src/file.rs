use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::fs;

use crate::stash_error::{Result, StashError};

/// Whole-file storage scoped to the app's private data directory.
///
/// Relative paths resolve against the data root. Absolute paths address
/// native files outside of it, which is how a freshly captured photo is read.
#[async_trait]
pub(crate) trait Filesystem: Send + Sync {
    /// File names in `dir`, in enumeration order. Fails with
    /// `StashError::NotFound` when the directory does not exist.
    async fn list(&self, dir: &str) -> Result<Vec<String>>;
    async fn make_dir(&self, dir: &str) -> Result<()>;
    /// Full file contents, base64 encoded.
    async fn read_file(&self, path: &str) -> Result<String>;
    async fn write_file(&self, path: &str, base64_data: &str) -> Result<()>;
    async fn delete_file(&self, path: &str) -> Result<()>;
    async fn exists(&self, path: &str) -> Result<bool>;
}

pub(crate) struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    pub(crate) fn new(root: PathBuf) -> Self {
        LocalFilesystem { root }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Orders `<millis>[-<n>].<ext>` names numerically, anything else after them by name.
fn listing_key(name: &str) -> (bool, u64, u64, &str) {
    let stem = name.split('.').next().unwrap_or(name);
    let (millis, n) = match stem.split_once('-') {
        Some((millis, n)) => (millis.parse::<u64>(), n.parse::<u64>()),
        None => (stem.parse::<u64>(), Ok(0)),
    };

    match (millis, n) {
        (Ok(millis), Ok(n)) => (false, millis, n, name),
        _ => (true, 0, 0, name),
    }
}

fn not_found(path: &Path, err: io::Error) -> StashError {
    if err.kind() == io::ErrorKind::NotFound {
        StashError::NotFound(path.display().to_string())
    } else {
        StashError::Io(err)
    }
}

#[async_trait]
impl Filesystem for LocalFilesystem {
    async fn list(&self, dir: &str) -> Result<Vec<String>> {
        let path = self.resolve(dir);
        let mut entries = fs::read_dir(&path).await.map_err(|e| not_found(&path, e))?;

        let mut names = vec!();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => tracing::warn!("skipping non utf-8 file name {:?}", name),
            }
        }

        // read_dir order is platform dependent, keep listings in save order
        names.sort_by(|a, b| listing_key(a).cmp(&listing_key(b)));
        Ok(names)
    }

    async fn make_dir(&self, dir: &str) -> Result<()> {
        fs::create_dir_all(self.resolve(dir)).await?;
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        let path = self.resolve(path);
        let content = fs::read(&path).await.map_err(|e| not_found(&path, e))?;
        Ok(STANDARD.encode(content))
    }

    async fn write_file(&self, path: &str, base64_data: &str) -> Result<()> {
        let content = STANDARD.decode(base64_data)?;
        fs::write(self.resolve(path), content).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let path = self.resolve(path);
        fs::remove_file(&path).await.map_err(|e| not_found(&path, e))
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        match fs::metadata(self.resolve(path)).await {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(StashError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn filesystem() -> (TempDir, LocalFilesystem) {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new(dir.path().to_path_buf());
        (dir, fs)
    }

    #[tokio::test]
    async fn list_of_missing_dir_is_not_found() {
        let (_dir, fs) = filesystem();

        let err = fs.list("stored-images").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn write_then_read_keeps_bytes() {
        let (dir, fs) = filesystem();
        fs.make_dir("stored-images").await.unwrap();

        fs.write_file("stored-images/a.jpeg", "aGVsbG8=").await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("stored-images/a.jpeg")).unwrap(), b"hello");
        assert_eq!(fs.read_file("stored-images/a.jpeg").await.unwrap(), "aGVsbG8=");
        assert_eq!(fs.list("stored-images").await.unwrap(), vec!["a.jpeg"]);
    }

    #[tokio::test]
    async fn list_skips_directories() {
        let (_dir, fs) = filesystem();
        fs.make_dir("stored-images/nested").await.unwrap();
        fs.write_file("stored-images/b.jpeg", "").await.unwrap();

        assert_eq!(fs.list("stored-images").await.unwrap(), vec!["b.jpeg"]);
    }

    #[tokio::test]
    async fn absolute_paths_bypass_the_root() {
        let (_dir, fs) = filesystem();
        let native = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(native.path(), b"raw").unwrap();

        let data = fs.read_file(native.path().to_str().unwrap()).await.unwrap();
        assert_eq!(data, STANDARD.encode(b"raw"));
    }

    #[test]
    fn listing_key_orders_collision_suffixes_numerically() {
        let mut names = vec![
            "holiday.png",
            "1700000000000-10.jpeg",
            "1700000000000-2.jpeg",
            "1700000000001.jpeg",
            "1700000000000.jpeg",
            "1700000000000-1.jpeg",
        ];
        names.sort_by(|a, b| listing_key(a).cmp(&listing_key(b)));

        assert_eq!(names, vec![
            "1700000000000.jpeg",
            "1700000000000-1.jpeg",
            "1700000000000-2.jpeg",
            "1700000000000-10.jpeg",
            "1700000000001.jpeg",
            "holiday.png",
        ]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exists_propagates_errors_other_than_not_found() {
        let (dir, fs) = filesystem();
        // a path through a plain file fails with NotADirectory, not NotFound
        std::fs::write(dir.path().join("plain"), b"").unwrap();

        assert!(!fs.exists("missing.jpeg").await.unwrap());
        assert!(fs.exists("plain/child.jpeg").await.is_err());
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let (_dir, fs) = filesystem();
        fs.make_dir("stored-images").await.unwrap();
        fs.write_file("stored-images/c.jpeg", "AA==").await.unwrap();

        fs.delete_file("stored-images/c.jpeg").await.unwrap();

        assert!(!fs.exists("stored-images/c.jpeg").await.unwrap());
        assert!(fs.delete_file("stored-images/c.jpeg").await.unwrap_err().is_not_found());
    }
}
