//! Filesystem error sink.
//!
//! Keys map to paths under the base directory:
//! ```text
//! {base_path}/{errors_prefix}error_{timestamp}.txt
//! ```

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{ErrorSink, ErrorSinkError, Result};

/// Writes error logs as files under a base directory.
pub struct FilesystemErrorSink {
    base_path: PathBuf,
}

impl FilesystemErrorSink {
    /// Create a sink rooted at `base_path`, creating the directory if needed.
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    /// Resolve `key` to a path inside the base directory.
    ///
    /// Keys are relative and may not climb out of the base directory.
    fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if key.is_empty() || escapes {
            return Err(ErrorSinkError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(relative))
    }
}

#[async_trait]
impl ErrorSink for FilesystemErrorSink {
    async fn put(&self, key: &str, body: &[u8]) -> Result<()> {
        let path = self.path_for_key(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to temp file then rename for atomicity
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, body).await?;
        fs::rename(&temp_path, &path).await?;

        debug!(path = %path.display(), size = body.len(), "Wrote error log");
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("file://{}", self.base_path.join(key).display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_temp_sink() -> (FilesystemErrorSink, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let sink = FilesystemErrorSink::new(temp_dir.path()).await.unwrap();
        (sink, temp_dir)
    }

    #[tokio::test]
    async fn test_put_writes_under_prefix() {
        let (sink, temp) = create_temp_sink().await;

        sink.put("ERRORS/search-rds/error_20240315_170405.txt", b"log body")
            .await
            .unwrap();

        let path = temp
            .path()
            .join("ERRORS/search-rds/error_20240315_170405.txt");
        assert_eq!(std::fs::read(path).unwrap(), b"log body");
    }

    #[tokio::test]
    async fn test_put_overwrites_same_key() {
        let (sink, temp) = create_temp_sink().await;

        tokio_test::assert_ok!(sink.put("error_x.txt", b"first").await);
        tokio_test::assert_ok!(sink.put("error_x.txt", b"second").await);

        assert_eq!(
            std::fs::read(temp.path().join("error_x.txt")).unwrap(),
            b"second"
        );
    }

    #[tokio::test]
    async fn test_put_leaves_no_temp_file() {
        let (sink, temp) = create_temp_sink().await;

        sink.put("errors/error_a.txt", b"body").await.unwrap();

        let names: Vec<_> = std::fs::read_dir(temp.path().join("errors"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["error_a.txt"]);
    }

    #[tokio::test]
    async fn test_put_rejects_escaping_key() {
        let (sink, _temp) = create_temp_sink().await;

        let result = sink.put("../outside.txt", b"body").await;
        assert!(matches!(result, Err(ErrorSinkError::InvalidKey(_))));

        let result = sink.put("/etc/passwd", b"body").await;
        assert!(matches!(result, Err(ErrorSinkError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_location() {
        let (sink, temp) = create_temp_sink().await;
        let location = sink.location("errors/error_a.txt");

        assert!(location.starts_with("file://"));
        assert!(location.ends_with("errors/error_a.txt"));
        assert!(location.contains(&temp.path().display().to_string()));
    }
}
