//! Content-based MIME detection.
//!
//! The upload host is told the container type in `qqtype`, so the type comes
//! from the file's leading bytes; the extension is only a fallback.

use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::error::Result;

/// Type reported when nothing else matches.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Bytes read from the start of a file for sniffing.
const SNIFF_LEN: usize = 512;

/// MPEG transport stream packet size.
const TS_PACKET: usize = 188;

/// Identify a container or image format from its leading bytes.
pub fn sniff(head: &[u8]) -> Option<&'static str> {
    // ISO base media: size(4) "ftyp" brand(4)
    if head.len() >= 12 && &head[4..8] == b"ftyp" {
        return Some(match &head[8..12] {
            b"qt  " => "video/quicktime",
            b"3gp4" | b"3gp5" | b"3gp6" | b"3g2a" => "video/3gpp",
            b"M4A " => "audio/mp4",
            b"M4V " | b"M4VH" | b"M4VP" => "video/x-m4v",
            _ => "video/mp4",
        });
    }

    if head.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        let probe = &head[..head.len().min(64)];
        if probe.windows(4).any(|w| w == b"webm") {
            return Some("video/webm");
        }
        return Some("video/x-matroska");
    }

    if head.len() >= 12 && head.starts_with(b"RIFF") {
        return match &head[8..12] {
            b"AVI " => Some("video/x-msvideo"),
            b"WEBP" => Some("image/webp"),
            b"WAVE" => Some("audio/x-wav"),
            _ => None,
        };
    }

    if head.starts_with(&[0x00, 0x00, 0x01, 0xBA]) || head.starts_with(&[0x00, 0x00, 0x01, 0xB3]) {
        return Some("video/mpeg");
    }

    if head.len() > TS_PACKET && head[0] == 0x47 && head[TS_PACKET] == 0x47 {
        return Some("video/mp2t");
    }

    if head.starts_with(b"FLV\x01") {
        return Some("video/x-flv");
    }

    if head.starts_with(&[0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11]) {
        return Some("video/x-ms-asf");
    }

    if head.starts_with(b"OggS") {
        return Some("video/ogg");
    }

    // Images, for thumbnails
    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if head.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return Some("image/gif");
    }

    None
}

/// Read the head of `path` and sniff it.
pub async fn sniff_file(path: &Path) -> Result<Option<&'static str>> {
    let file = tokio::fs::File::open(path).await?;
    let mut head = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut head).await?;

    Ok(sniff(&head))
}

/// MIME type of `path`: content first, then extension, then octet-stream.
pub async fn detect_mime(path: &Path) -> Result<String> {
    if let Some(mime) = sniff_file(path).await? {
        return Ok(mime.to_string());
    }

    let guessed = mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string());

    tracing::debug!("No signature match for {}, guessed {}", path.display(), guessed);
    Ok(guessed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ftyp(brand: &[u8; 4]) -> Vec<u8> {
        let mut head = vec![0x00, 0x00, 0x00, 0x20];
        head.extend_from_slice(b"ftyp");
        head.extend_from_slice(brand);
        head.extend_from_slice(&[0u8; 20]);
        head
    }

    #[test]
    fn test_sniff_iso_media() {
        assert_eq!(sniff(&ftyp(b"isom")), Some("video/mp4"));
        assert_eq!(sniff(&ftyp(b"qt  ")), Some("video/quicktime"));
        assert_eq!(sniff(&ftyp(b"3gp5")), Some("video/3gpp"));
    }

    #[test]
    fn test_sniff_matroska_family() {
        let mut webm = vec![0x1A, 0x45, 0xDF, 0xA3, 0x9F, 0x42, 0x82, 0x84];
        webm.extend_from_slice(b"webm");
        assert_eq!(sniff(&webm), Some("video/webm"));

        let mut mkv = vec![0x1A, 0x45, 0xDF, 0xA3, 0x9F, 0x42, 0x82, 0x88];
        mkv.extend_from_slice(b"matroska");
        assert_eq!(sniff(&mkv), Some("video/x-matroska"));
    }

    #[test]
    fn test_sniff_transport_stream() {
        let mut ts = vec![0u8; 400];
        ts[0] = 0x47;
        ts[188] = 0x47;
        assert_eq!(sniff(&ts), Some("video/mp2t"));
    }

    #[test]
    fn test_sniff_images() {
        assert_eq!(sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff(b"\x89PNG\r\n\x1a\n...."), Some("image/png"));
    }

    #[test]
    fn test_sniff_unknown() {
        assert_eq!(sniff(b"plain text"), None);
        assert_eq!(sniff(&[]), None);
    }

    #[tokio::test]
    async fn test_detect_mime_falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.avi");
        std::fs::write(&path, b"not really a video").unwrap();

        assert_eq!(detect_mime(&path).await.unwrap(), "video/x-msvideo");
    }

    #[tokio::test]
    async fn test_detect_mime_last_resort() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob");
        std::fs::write(&path, b"???").unwrap();

        assert_eq!(detect_mime(&path).await.unwrap(), OCTET_STREAM);
    }

    #[tokio::test]
    async fn test_detect_mime_prefers_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("misnamed.txt");
        std::fs::write(&path, ftyp(b"mp42")).unwrap();

        assert_eq!(detect_mime(&path).await.unwrap(), "video/mp4");
    }
}
