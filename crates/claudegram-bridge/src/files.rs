//! File retrieval for `/getfile`.

use std::path::PathBuf;

use tracing::debug;

use crate::error::{FileRetrievalError, MAX_FILE_BYTES};
use crate::workdir::WorkingDirectory;

/// A file that passed validation and can be sent as a document.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievedFile {
    /// Resolved path on disk.
    pub path: PathBuf,
    /// Name shown to the recipient.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
}

/// Resolve `requested` against the working directory and validate it.
///
/// Rejects missing paths, directories and files over 50 MiB.
pub async fn retrieve(
    workdir: &WorkingDirectory,
    requested: &str,
) -> Result<RetrievedFile, FileRetrievalError> {
    let path = workdir.resolve(requested);

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FileRetrievalError::NotFound(path));
        }
        Err(e) => return Err(e.into()),
    };

    if metadata.is_dir() {
        return Err(FileRetrievalError::IsDirectory(path));
    }

    let size = metadata.len();
    if size > MAX_FILE_BYTES {
        return Err(FileRetrievalError::TooLarge { path, size });
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    debug!(path = %path.display(), size, "file ready for sending");
    Ok(RetrievedFile {
        path,
        filename,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workdir() -> (WorkingDirectory, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (WorkingDirectory::new(dir.path()), dir)
    }

    #[tokio::test]
    async fn test_retrieve_relative_file() {
        let (wd, dir) = workdir();
        std::fs::write(dir.path().join("report.txt"), "contents").unwrap();

        let file = retrieve(&wd, "report.txt").await.unwrap();
        assert_eq!(file.path, dir.path().join("report.txt"));
        assert_eq!(file.filename, "report.txt");
        assert_eq!(file.size, 8);
    }

    #[tokio::test]
    async fn test_retrieve_absolute_file() {
        let (wd, _dir) = workdir();
        let other = tempfile::tempdir().unwrap();
        let path = other.path().join("abs.log");
        std::fs::write(&path, "x").unwrap();

        let file = retrieve(&wd, path.to_str().unwrap()).await.unwrap();
        assert_eq!(file.path, path);
    }

    #[tokio::test]
    async fn test_retrieve_missing() {
        let (wd, dir) = workdir();
        let err = retrieve(&wd, "nope.txt").await.unwrap_err();
        assert!(matches!(err, FileRetrievalError::NotFound(_)));
        assert_eq!(
            err.to_string(),
            format!("File not found: {}", dir.path().join("nope.txt").display())
        );
    }

    #[tokio::test]
    async fn test_retrieve_directory() {
        let (wd, dir) = workdir();
        std::fs::create_dir(dir.path().join("src")).unwrap();

        let err = retrieve(&wd, "src").await.unwrap_err();
        assert!(matches!(err, FileRetrievalError::IsDirectory(_)));
        assert!(err.to_string().starts_with("This is a directory, not a file:"));
    }

    #[tokio::test]
    async fn test_retrieve_too_large() {
        let (wd, dir) = workdir();
        let path = dir.path().join("big.bin");
        let file = std::fs::File::create(&path).unwrap();
        // Sparse file: no real disk usage.
        file.set_len(MAX_FILE_BYTES + 1).unwrap();

        let err = retrieve(&wd, "big.bin").await.unwrap_err();
        assert!(matches!(err, FileRetrievalError::TooLarge { .. }));
        assert_eq!(err.to_string(), "File too large (50 MB). Telegram limit is 50MB.");
    }

    #[tokio::test]
    async fn test_retrieve_exactly_at_limit() {
        let (wd, dir) = workdir();
        let path = dir.path().join("edge.bin");
        std::fs::File::create(&path)
            .unwrap()
            .set_len(MAX_FILE_BYTES)
            .unwrap();

        assert!(retrieve(&wd, "edge.bin").await.is_ok());
    }
}
