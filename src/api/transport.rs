//! HTTP transport abstraction.
//!
//! Everything above this module talks to the platform through the
//! [`Transport`] trait, so the handshake and upload logic never depend on a
//! concrete HTTP stack. [`ReqwestTransport`] is the production implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Proxy, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{Error, Result};

/// Which cookies travel with a request.
#[derive(Debug, Clone, Default)]
pub enum CookieScope {
    /// Send the session jar and store any `Set-Cookie` replies in it.
    #[default]
    Session,
    /// No cookies at all.
    Bare,
    /// Only the given cookies; the session jar is neither read nor updated.
    Explicit(Vec<StoredCookie>),
}

/// Request body variants used by the platform flows.
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    Multipart(Vec<MultipartField>),
}

/// A single multipart/form-data field.
#[derive(Debug, Clone)]
pub enum MultipartField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        path: PathBuf,
        file_name: String,
        mime: String,
    },
}

impl MultipartField {
    pub fn text(name: impl Into<String>, value: impl ToString) -> Self {
        MultipartField::Text {
            name: name.into(),
            value: value.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MultipartField::Text { name, .. } | MultipartField::File { name, .. } => name,
        }
    }
}

/// One outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Body,
    pub timeout: Option<Duration>,
    pub cookies: CookieScope,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
            timeout: None,
            cookies: CookieScope::Session,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::HEAD, url)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = Body::Form(fields);
        self
    }

    pub fn multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = Body::Multipart(fields);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn bare(mut self) -> Self {
        self.cookies = CookieScope::Bare;
        self
    }

    pub fn with_cookies(mut self, cookies: Vec<StoredCookie>) -> Self {
        self.cookies = CookieScope::Explicit(cookies);
        self
    }
}

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Parse the body as JSON, mapping an unparseable body to `Value::String`.
    ///
    /// Used where the body is only surfaced to the caller, never interpreted.
    pub fn payload(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }
}

/// A cookie as persisted between runs: the minimal durable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    /// URL the cookie is scoped to.
    pub url: String,
}

/// Render cookies as a `Cookie` request header value.
pub fn cookie_header(cookies: &[StoredCookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Capabilities the client needs from an HTTP stack.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and buffer the whole response body.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Stream a response body to `dest`, returning the number of bytes written.
    async fn download(&self, url: &str, dest: &Path, progress: Option<&ProgressBar>)
        -> Result<u64>;

    /// Cookies the session jar would send to `url`.
    fn cookies(&self, url: &Url) -> Vec<StoredCookie>;

    /// Insert a cookie into the session jar.
    fn add_cookie(&self, cookie: &StoredCookie) -> Result<()>;

    /// Drop every session cookie.
    fn reset(&mut self) -> Result<()>;
}

/// Settings shared by every client the transport builds.
#[derive(Debug, Clone, Default)]
pub struct TransportSettings {
    pub user_agent: String,
    /// Scheme (`http`, `https` or `all`) to proxy URL.
    pub proxy: HashMap<String, String>,
}

/// [`Transport`] backed by reqwest.
///
/// Two clients share the settings: one with the session cookie jar and a
/// bare one for the upload host and credential probes.
pub struct ReqwestTransport {
    settings: TransportSettings,
    jar: Arc<Jar>,
    session: Client,
    bare: Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let session = build_client(&settings, Some(jar.clone()))?;
        let bare = build_client(&settings, None)?;

        Ok(Self {
            settings,
            jar,
            session,
            bare,
        })
    }
}

fn build_client(settings: &TransportSettings, jar: Option<Arc<Jar>>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(&settings.user_agent);

    if let Some(jar) = jar {
        builder = builder.cookie_provider(jar);
    }

    for proxy in build_proxies(&settings.proxy)? {
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Translate a scheme → URL map into reqwest proxies.
pub fn build_proxies(map: &HashMap<String, String>) -> Result<Vec<Proxy>> {
    let mut proxies = Vec::with_capacity(map.len());

    for (scheme, url) in map {
        let proxy = match scheme.as_str() {
            "http" => Proxy::http(url),
            "https" => Proxy::https(url),
            "all" => Proxy::all(url),
            other => {
                return Err(Error::ConfigValidation {
                    field: "proxy".to_string(),
                    message: format!("Unsupported proxy scheme '{}'", other),
                })
            }
        }
        .map_err(|e| Error::ConfigValidation {
            field: "proxy".to_string(),
            message: format!("Invalid proxy URL '{}': {}", url, e),
        })?;

        proxies.push(proxy);
    }

    Ok(proxies)
}

async fn build_form(fields: Vec<MultipartField>) -> Result<Form> {
    let mut form = Form::new();

    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name, value),
            MultipartField::File {
                name,
                path,
                file_name,
                mime,
            } => {
                let data = tokio::fs::read(&path).await?;
                let part = Part::bytes(data).file_name(file_name).mime_str(&mime)?;
                form.part(name, part)
            }
        };
    }

    Ok(form)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let client = match request.cookies {
            CookieScope::Session => &self.session,
            CookieScope::Bare | CookieScope::Explicit(_) => &self.bare,
        };

        tracing::debug!("{} {}", request.method, request.url);

        let mut builder = client.request(request.method, &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let CookieScope::Explicit(cookies) = &request.cookies {
            builder = builder.header(COOKIE, cookie_header(cookies));
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Form(fields) => builder.form(&fields),
            Body::Multipart(fields) => builder.multipart(build_form(fields).await?),
        };

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<u64> {
        tracing::debug!("GET {} -> {}", url, dest.display());

        let response = self.session.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        if let (Some(pb), Some(len)) = (progress, response.content_length()) {
            pb.set_length(len);
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await?;

        Ok(downloaded)
    }

    fn cookies(&self, url: &Url) -> Vec<StoredCookie> {
        let Some(header) = self.jar.cookies(url) else {
            return Vec::new();
        };
        let Ok(header) = header.to_str() else {
            return Vec::new();
        };

        header
            .split("; ")
            .filter_map(|pair| pair.split_once('='))
            .map(|(name, value)| StoredCookie {
                name: name.to_string(),
                value: value.to_string(),
                url: url.to_string(),
            })
            .collect()
    }

    fn add_cookie(&self, cookie: &StoredCookie) -> Result<()> {
        let url = Url::parse(&cookie.url)?;
        self.jar
            .add_cookie_str(&format!("{}={}", cookie.name, cookie.value), &url);
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.jar = Arc::new(Jar::default());
        self.session = build_client(&self.settings, Some(self.jar.clone()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(TransportSettings {
            user_agent: "aparat-client-test".to_string(),
            proxy: HashMap::new(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_execute_json_post_with_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/echo"))
            .and(query_param("callbackType", "postmessage"))
            .and(body_json(json!({"guid": "abc"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let request = HttpRequest::post(format!("{}/api/echo", server.uri()))
            .query("callbackType", "postmessage")
            .json(json!({"guid": "abc"}));
        let response = transport().execute(request).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.json().unwrap()["ok"], true);
    }

    #[tokio::test]
    async fn test_explicit_cookies_sent_as_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("cookie", "AuthV1=token; lang=fa"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let cookies = vec![
            StoredCookie {
                name: "AuthV1".into(),
                value: "token".into(),
                url: server.uri(),
            },
            StoredCookie {
                name: "lang".into(),
                value: "fa".into(),
                url: server.uri(),
            },
        ];
        let request = HttpRequest::get(format!("{}/me", server.uri())).with_cookies(cookies);
        let response = transport().execute(request).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_jar_captures_set_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/signin"))
            .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "AuthV1=xyz; Path=/"))
            .mount(&server)
            .await;

        let transport = transport();
        transport
            .execute(HttpRequest::get(format!("{}/signin", server.uri())))
            .await
            .unwrap();

        let url = Url::parse(&server.uri()).unwrap();
        let cookies = transport.cookies(&url);
        assert!(cookies.iter().any(|c| c.name == "AuthV1" && c.value == "xyz"));
    }

    #[tokio::test]
    async fn test_bare_request_skips_session_jar() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/set"))
            .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "sid=1; Path=/"))
            .mount(&server)
            .await;

        let transport = transport();
        transport
            .execute(HttpRequest::get(format!("{}/set", server.uri())).bare())
            .await
            .unwrap();

        let url = Url::parse(&server.uri()).unwrap();
        assert!(transport.cookies(&url).is_empty());
    }

    #[tokio::test]
    async fn test_add_cookie_and_reset() {
        let mut transport = transport();
        let url = Url::parse("https://www.aparat.com/").unwrap();
        transport
            .add_cookie(&StoredCookie {
                name: "AuthV1".into(),
                value: "v".into(),
                url: url.to_string(),
            })
            .unwrap();
        assert_eq!(transport.cookies(&url).len(), 1);

        transport.reset().unwrap();
        assert!(transport.cookies(&url).is_empty());
    }

    #[tokio::test]
    async fn test_multipart_fields_and_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header("x-token", "tok"))
            .and(body_string_contains("name=\"qquuid\""))
            .and(body_string_contains("name=\"qqfile\"; filename=\"clip.mp4\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"data").unwrap();

        let request = HttpRequest::post(format!("{}/upload", server.uri()))
            .bare()
            .header("x-token", "tok")
            .multipart(vec![
                MultipartField::text("qquuid", "u-1"),
                MultipartField::File {
                    name: "qqfile".into(),
                    path: file,
                    file_name: "clip.mp4".into(),
                    mime: "application/octet-stream".into(),
                },
            ]);
        let response = transport().execute(request).await.unwrap();

        assert_eq!(response.json().unwrap()["success"], true);
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/video.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 2048]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("video.mp4");
        let written = transport()
            .download(&format!("{}/video.mp4", server.uri()), &dest, None)
            .await
            .unwrap();

        assert_eq!(written, 2048);
        assert_eq!(std::fs::metadata(&dest).unwrap().len(), 2048);
    }

    #[tokio::test]
    async fn test_download_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let result = transport()
            .download(&format!("{}/missing", server.uri()), &dir.path().join("x"), None)
            .await;

        assert!(matches!(result, Err(Error::Download(_))));
    }

    #[test]
    fn test_build_proxies_rejects_unknown_scheme() {
        let mut map = HashMap::new();
        map.insert("socks9".to_string(), "socks5://127.0.0.1:1080".to_string());
        assert!(matches!(
            build_proxies(&map),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_build_proxies_accepts_http_and_https() {
        let mut map = HashMap::new();
        map.insert("http".to_string(), "http://proxy.example.com:8080".to_string());
        map.insert("https".to_string(), "http://proxy.example.com:8443".to_string());
        assert_eq!(build_proxies(&map).unwrap().len(), 2);
    }

    #[test]
    fn test_payload_falls_back_to_string() {
        let response = HttpResponse {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>oops</html>".to_string(),
        };
        assert_eq!(response.payload(), json!("<html>oops</html>"));
    }
}
