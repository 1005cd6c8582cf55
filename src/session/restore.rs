//! Saving, restoring and importing authenticated sessions.

use std::path::PathBuf;

use serde_json::Value;

use crate::api::client::AparatClient;
use crate::api::endpoints::{CONFIG_PROBE, USER_INFORMATION};
use crate::api::transport::{HttpRequest, StoredCookie, Transport};
use crate::api::types::{Document, UserAttributes};
use crate::error::{Error, Result};
use crate::session::store::PersistedSession;

/// Name of the bearer cookie issued after login.
pub const AUTH_COOKIE: &str = "AuthV1";

/// JavaScript-style truthiness of a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl<T: Transport> AparatClient<T> {
    /// Write the current session to `<username>.session` in the session directory.
    pub fn save_session(&self) -> Result<PathBuf> {
        self.require_login()?;

        let username = self
            .session
            .username()
            .ok_or(Error::LoginRequired)?
            .to_string();
        let cookies = self.session_cookies()?;

        self.session_store()
            .save(&PersistedSession::new(username, cookies))
    }

    /// Restore a saved session if the server still accepts its cookies.
    ///
    /// Returns `Ok(false)` and leaves the client untouched when the probe
    /// rejects the stored cookies.
    pub async fn load_session(&mut self, username: &str) -> Result<bool> {
        let saved = self.session_store().load(username)?;

        let request = HttpRequest::get(self.url(CONFIG_PROBE)).with_cookies(saved.cookies.clone());
        let response = self.send(request).await?;

        let accepted = response
            .json()
            .ok()
            .and_then(|body| body.pointer("/included/0/attributes").map(is_truthy))
            .unwrap_or(false);

        if !accepted {
            tracing::info!("Saved session for {} was rejected", username);
            return Ok(false);
        }

        self.transport.reset()?;
        for cookie in &saved.cookies {
            self.transport.add_cookie(cookie)?;
        }
        self.session.mark_logged_in(username);

        tracing::info!("Restored session for {}", username);
        Ok(true)
    }

    /// Value of the bearer cookie of the current session.
    pub fn auth_v1(&self) -> Result<Option<String>> {
        self.require_login()?;

        Ok(self
            .session_cookies()?
            .into_iter()
            .find(|c| c.name == AUTH_COOKIE)
            .map(|c| c.value))
    }

    /// Log in with a bearer cookie obtained elsewhere.
    pub async fn load_auth_v1(&mut self, value: &str) -> Result<bool> {
        let cookie = StoredCookie {
            name: AUTH_COOKIE.to_string(),
            value: value.to_string(),
            url: format!("{}/", self.options.base_url.trim_end_matches('/')),
        };

        let request = HttpRequest::get(self.url(USER_INFORMATION)).with_cookies(vec![cookie.clone()]);
        let response = self.send(request).await?;

        if !response.is_success() {
            tracing::info!("Bearer cookie rejected: HTTP {}", response.status);
            return Ok(false);
        }

        let payload = response.json()?;
        let doc: Document<UserAttributes> = serde_json::from_value(payload.clone())?;
        let attrs = doc.data.attributes;

        let username = if attrs.has_email == Some(true) {
            attrs.email
        } else {
            attrs.username
        }
        .ok_or(Error::Validation(payload))?;

        self.transport.add_cookie(&cookie)?;
        self.session.mark_logged_in(username.clone());

        tracing::info!("Logged in as {} with bearer cookie", username);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ClientOptions;
    use crate::session::store::SessionStore;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, dir: &std::path::Path) -> AparatClient {
        AparatClient::new(ClientOptions {
            base_url: server.uri(),
            upload_base_url: server.uri(),
            session_dir: dir.to_path_buf(),
            ..Default::default()
        })
        .unwrap()
    }

    fn stored(server: &MockServer) -> Vec<StoredCookie> {
        vec![StoredCookie {
            name: AUTH_COOKIE.to_string(),
            value: "abc".to_string(),
            url: format!("{}/", server.uri()),
        }]
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!({"username": "alice"})));
    }

    #[tokio::test]
    async fn test_save_session_requires_login() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let client = client(&server, dir.path());

        assert!(matches!(client.save_session(), Err(Error::LoginRequired)));
        assert!(matches!(client.auth_v1(), Err(Error::LoginRequired)));
    }

    #[tokio::test]
    async fn test_load_session_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CONFIG_PROBE))
            .and(header("cookie", "AuthV1=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "included": [{"type": "user", "attributes": {"username": "alice"}}]
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        SessionStore::new(dir.path())
            .save(&PersistedSession::new("alice", stored(&server)))
            .unwrap();

        let mut client = client(&server, dir.path());
        assert!(client.load_session("alice").await.unwrap());
        assert!(client.is_logged_in());
        assert_eq!(client.username(), Some("alice"));
        assert_eq!(client.auth_v1().unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_load_session_rejected_leaves_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CONFIG_PROBE))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "included": [{"type": "user", "attributes": false}]
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        SessionStore::new(dir.path())
            .save(&PersistedSession::new("alice", stored(&server)))
            .unwrap();

        let mut client = client(&server, dir.path());
        assert!(!client.load_session("alice").await.unwrap());
        assert!(!client.is_logged_in());
        assert!(client.session_cookies().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_session_missing_file() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let mut client = client(&server, dir.path());

        assert!(matches!(
            client.load_session("ghost").await,
            Err(Error::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_load_auth_v1_prefers_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(USER_INFORMATION))
            .and(header("cookie", "AuthV1=token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "7", "type": "user", "attributes": {
                    "username": "alice", "email": "alice@example.com", "has_email": true
                }}
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut client = client(&server, dir.path());

        assert!(client.load_auth_v1("token-1").await.unwrap());
        assert_eq!(client.username(), Some("alice@example.com"));
        assert_eq!(client.auth_v1().unwrap().as_deref(), Some("token-1"));
    }

    #[tokio::test]
    async fn test_load_auth_v1_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(USER_INFORMATION))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"errors": []})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut client = client(&server, dir.path());

        assert!(!client.load_auth_v1("stale").await.unwrap());
        assert!(!client.is_logged_in());
    }
}
