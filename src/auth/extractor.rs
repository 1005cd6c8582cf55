//! Page-state extraction.
//!
//! The sign-in and verification pages embed the handshake state as
//! JavaScript object literals (`guid: "…",`). Extraction sits behind
//! [`PageStateExtractor`] so a structured parser can replace the string scan
//! without touching the handshake.

use regex::Regex;

use crate::error::{Error, Result};

/// Reads named values out of a page's embedded script state.
pub trait PageStateExtractor: Send + Sync {
    /// Value of `key`, or `None` when the page does not carry it.
    fn extract(&self, page: &str, key: &str) -> Option<String>;

    /// Like [`extract`](Self::extract) but fails with `ProtocolExtraction`.
    fn require(&self, page: &str, key: &str) -> Result<String> {
        self.extract(page, key)
            .ok_or_else(|| Error::ProtocolExtraction(key.to_string()))
    }
}

/// Scans for `key: "value",` literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLiteralExtractor;

impl PageStateExtractor for ScriptLiteralExtractor {
    fn extract(&self, page: &str, key: &str) -> Option<String> {
        between(page, &format!("{}: \"", key), "\",")
    }
}

/// Text between the first `start` marker and the following `end` marker.
pub fn between(text: &str, start: &str, end: &str) -> Option<String> {
    let from = text.find(start)? + start.len();
    let len = text[from..].find(end)?;
    Some(text[from..from + len].to_string())
}

/// Verification code embedded in the signup page (`?code=…&account=`).
pub fn extract_signup_code(page: &str) -> Result<String> {
    between(page, "?code=", "&account=").ok_or_else(|| Error::ProtocolExtraction("code".to_string()))
}

/// First verification link starting with `prefix` inside `text`.
///
/// `text` may be the bare link or a whole email body.
pub fn find_signup_link(text: &str, prefix: &str) -> Result<Option<String>> {
    let pattern = format!(r#"{}[^\s\]\)"']+"#, regex::escape(prefix));
    let re = Regex::new(&pattern)
        .map_err(|e| Error::InvalidArgument(format!("Invalid signup link prefix: {}", e)))?;

    Ok(re.find(text).map(|m| m.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints::SIGNUP_LINK_PREFIX;

    const PAGE: &str = r#"<script>window.__state = { guid: "6f1c-22aa", additionalGet: "?ref=mail&x=1", };</script>"#;

    #[test]
    fn test_extract_guid() {
        let extractor = ScriptLiteralExtractor;
        assert_eq!(extractor.extract(PAGE, "guid").as_deref(), Some("6f1c-22aa"));
        assert_eq!(
            extractor.extract(PAGE, "additionalGet").as_deref(),
            Some("?ref=mail&x=1")
        );
    }

    #[test]
    fn test_missing_marker_is_protocol_error() {
        let result = ScriptLiteralExtractor.require("<html></html>", "guid");
        assert!(matches!(result, Err(Error::ProtocolExtraction(key)) if key == "guid"));
    }

    #[test]
    fn test_signup_code() {
        let page = r#"<a href="/verify?code=98231&account=a@b.c">"#;
        assert_eq!(extract_signup_code(page).unwrap(), "98231");
        assert!(extract_signup_code("nothing here").is_err());
    }

    #[test]
    fn test_find_signup_link_in_email_body() {
        let body = "Hello!\nClick (http://email.aparat.com/ls/click?upn=u001.AbC-123_x) to verify.";
        let link = find_signup_link(body, SIGNUP_LINK_PREFIX).unwrap();
        assert_eq!(
            link.as_deref(),
            Some("http://email.aparat.com/ls/click?upn=u001.AbC-123_x")
        );
    }

    #[test]
    fn test_find_signup_link_absent() {
        let link = find_signup_link("http://example.com/other", SIGNUP_LINK_PREFIX).unwrap();
        assert!(link.is_none());
    }
}
