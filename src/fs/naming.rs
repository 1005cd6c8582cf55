//! Filename handling for downloads and session files.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::error::{Error, Result};

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Last path segment of a URL, without the query string.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let last = without_query.rsplit('/').next().unwrap_or(without_query);

    sanitize_filename(last)
}

/// Where a download of `url` is written.
///
/// - no path: the URL's file name in the current directory
/// - a directory, or a path ending with a separator: the URL's file name inside it
/// - an existing file, or a name with an extension: that path
/// - anything else: the URL's file name
pub fn resolve_download_target(url: &str, path: Option<&Path>) -> Result<PathBuf> {
    let file_name = file_name_from_url(url)?;

    let Some(path) = path else {
        return Ok(PathBuf::from(file_name));
    };

    let raw = path.to_string_lossy();
    if raw.ends_with(MAIN_SEPARATOR) || raw.ends_with('/') || path.is_dir() {
        return Ok(path.join(file_name));
    }

    let has_extension = path
        .file_name()
        .map(|n| n.to_string_lossy().contains('.'))
        .unwrap_or(false);
    if path.is_file() || has_extension {
        return Ok(path.to_path_buf());
    }

    Ok(PathBuf::from(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_valid() {
        assert_eq!(sanitize_filename("normal.txt").unwrap(), "normal.txt");
        assert_eq!(sanitize_filename("file:name.txt").unwrap(), "file_name.txt");
        assert_eq!(
            sanitize_filename("alice@example.com").unwrap(),
            "alice@example.com"
        );
    }

    #[test]
    fn test_sanitize_filename_path_traversal() {
        assert!(sanitize_filename("../etc/passwd").is_err());
        assert!(sanitize_filename("..\\windows\\system32").is_err());
    }

    #[test]
    fn test_sanitize_filename_rejects_separators_and_nulls() {
        assert!(sanitize_filename("path/to/file.txt").is_err());
        assert!(sanitize_filename("file\0name.txt").is_err());
        assert!(sanitize_filename("   ").is_err());
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://cdn.example/v/abc-480p.mp4?token=1&e=2").unwrap(),
            "abc-480p.mp4"
        );
        assert!(file_name_from_url("https://cdn.example/dir/").is_err());
    }

    #[test]
    fn test_target_defaults_to_url_name() {
        let target = resolve_download_target("https://cdn/x/clip.mp4", None).unwrap();
        assert_eq!(target, PathBuf::from("clip.mp4"));
    }

    #[test]
    fn test_target_inside_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = resolve_download_target("https://cdn/x/clip.mp4?s=1", Some(dir.path())).unwrap();
        assert_eq!(target, dir.path().join("clip.mp4"));

        let trailing = format!("videos{}", MAIN_SEPARATOR);
        let target = resolve_download_target("https://cdn/clip.mp4", Some(Path::new(&trailing))).unwrap();
        assert_eq!(target, Path::new("videos").join("clip.mp4"));
    }

    #[test]
    fn test_target_explicit_file_name() {
        let target = resolve_download_target("https://cdn/clip.mp4", Some(Path::new("out/my.mp4"))).unwrap();
        assert_eq!(target, PathBuf::from("out/my.mp4"));
    }

    #[test]
    fn test_target_unusable_path_falls_back() {
        let target =
            resolve_download_target("https://cdn/clip.mp4", Some(Path::new("no-such-dir-xyz"))).unwrap();
        assert_eq!(target, PathBuf::from("clip.mp4"));
    }
}
