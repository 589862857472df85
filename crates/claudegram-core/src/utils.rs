//! Utility helpers: path resolution and string manipulation.

use std::path::PathBuf;

/// Directory containing the running executable.
///
/// Used as the home of `config.json` and as the fallback working directory.
/// Falls back to the current directory when the executable path is unknown.
pub fn get_app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand `~` to the home directory in a path string.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// First `max_chars` characters of `s`, for log previews. Unicode-safe.
pub fn preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_string() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn test_preview_exact_length() {
        assert_eq!(preview("hello", 5), "hello");
    }

    #[test]
    fn test_preview_long_string() {
        assert_eq!(preview("hello world", 5), "hello...");
    }

    #[test]
    fn test_preview_unicode() {
        assert_eq!(preview("こんにちは世界です", 5), "こんにちは...");
    }

    #[test]
    fn test_expand_home_tilde() {
        let expanded = expand_home("~/test/path");
        assert!(!expanded.starts_with("~"));
        assert!(expanded.to_str().unwrap().ends_with("test/path"));
    }

    #[test]
    fn test_expand_home_absolute() {
        assert_eq!(expand_home("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_home_relative() {
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn test_app_dir_exists() {
        assert!(get_app_dir().is_dir());
    }
}
