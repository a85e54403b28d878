// Local filesystem adapter - File system operations through tokio::fs

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::io::ErrorKind;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }

    /// Add the Windows long-path prefix to absolute paths beyond MAX_PATH
    fn to_long_path(file_path: &str) -> String {
        if cfg!(windows) && file_path.len() > 260 && !file_path.starts_with("\\\\?\\") {
            format!("\\\\?\\{}", file_path)
        } else {
            file_path.to_string()
        }
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError> {
        match tokio::fs::metadata(Self::to_long_path(file_path)).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to check {}: {}",
                file_path, e
            ))),
        }
    }

    async fn file_size(&self, file_path: &str) -> Result<u64, DomainError> {
        let metadata = tokio::fs::metadata(Self::to_long_path(file_path))
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))?;
        Ok(metadata.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_size_and_existence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, vec![0u8; 4096]).unwrap();
        let path = path.to_str().unwrap();

        let fs = LocalFsAdapter::new();
        assert!(fs.file_exists(path).await.unwrap());
        assert_eq!(fs.file_size(path).await.unwrap(), 4096);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.mp4");
        let path = path.to_str().unwrap();

        let fs = LocalFsAdapter::new();
        assert!(!fs.file_exists(path).await.unwrap());
        assert!(matches!(
            fs.file_size(path).await,
            Err(DomainError::FsFail(_))
        ));
    }

    #[tokio::test]
    async fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFsAdapter::new();
        assert!(!fs.file_exists(dir.path().to_str().unwrap()).await.unwrap());
    }
}
