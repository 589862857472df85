//! Per-command errors. Their `Display` text is the user-facing reply.

use std::path::PathBuf;

/// Size limit for documents sent through the chat transport.
pub const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// `/cd` target does not exist or is not a directory.
#[derive(Debug, thiserror::Error)]
#[error("Directory not found: {requested}")]
pub struct DirectoryNotFound {
    /// The path as the user typed it.
    pub requested: String,
}

/// Why a `/getfile` request could not be served.
#[derive(Debug, thiserror::Error)]
pub enum FileRetrievalError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("This is a directory, not a file: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("File too large ({} MB). Telegram limit is 50MB.", .size / (1024 * 1024))]
    TooLarge { path: PathBuf, size: u64 },

    #[error("Error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_not_found_message() {
        let err = DirectoryNotFound {
            requested: "/nope".into(),
        };
        assert_eq!(err.to_string(), "Directory not found: /nope");
    }

    #[test]
    fn test_too_large_reports_whole_megabytes() {
        let err = FileRetrievalError::TooLarge {
            path: PathBuf::from("/big.bin"),
            size: 75 * 1024 * 1024 + 12345,
        };
        assert_eq!(err.to_string(), "File too large (75 MB). Telegram limit is 50MB.");
    }

    #[test]
    fn test_not_found_message() {
        let err = FileRetrievalError::NotFound(PathBuf::from("/tmp/missing.txt"));
        assert_eq!(err.to_string(), "File not found: /tmp/missing.txt");
    }
}
