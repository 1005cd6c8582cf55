//! Aparat API client.
//!
//! The client is built for one logical caller: requests are issued one at a
//! time and mutating operations take `&mut self`. Sharing a client between
//! tasks needs external synchronisation, which this crate does not provide.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::api::endpoints::{BASE_URL, SIGNUP_LINK_PREFIX, UPLOAD_BASE_URL};
use crate::api::transport::{HttpRequest, HttpResponse, ReqwestTransport, StoredCookie, Transport, TransportSettings};
use crate::auth::extractor::{PageStateExtractor, ScriptLiteralExtractor};
use crate::error::{Error, Result};
use crate::session::{SessionState, SessionStore};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for the binary transfer to the upload host.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Default browser user agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Hosts, timeouts and proxy used by a client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub upload_base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub upload_timeout: Duration,
    pub proxy: HashMap<String, String>,
    pub session_dir: PathBuf,
    /// Prefix identifying the verification link in signup emails.
    pub signup_link_prefix: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            upload_base_url: UPLOAD_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
            proxy: HashMap::new(),
            session_dir: PathBuf::from("."),
            signup_link_prefix: SIGNUP_LINK_PREFIX.to_string(),
        }
    }
}

/// Client for the platform's private web API.
pub struct AparatClient<T: Transport = ReqwestTransport> {
    pub(crate) transport: T,
    pub(crate) session: SessionState,
    pub(crate) options: ClientOptions,
    pub(crate) extractor: Box<dyn PageStateExtractor>,
}

impl AparatClient<ReqwestTransport> {
    /// Create a client backed by reqwest.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let transport = ReqwestTransport::new(TransportSettings {
            user_agent: options.user_agent.clone(),
            proxy: options.proxy.clone(),
        })?;

        Ok(Self::with_transport(transport, options))
    }
}

impl<T: Transport> AparatClient<T> {
    /// Create a client on top of any transport.
    pub fn with_transport(transport: T, options: ClientOptions) -> Self {
        let proxy = if options.proxy.is_empty() {
            None
        } else {
            Some(options.proxy.clone())
        };

        Self {
            transport,
            session: SessionState::new(proxy),
            options,
            extractor: Box::new(ScriptLiteralExtractor),
        }
    }

    /// Replace the page-state extractor used during login and signup.
    pub fn with_extractor(mut self, extractor: impl PageStateExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn session_store(&self) -> SessionStore {
        SessionStore::new(self.options.session_dir.clone())
    }

    /// Fail with `LoginRequired` unless logged in.
    pub(crate) fn require_login(&self) -> Result<()> {
        if !self.session.is_logged_in() {
            return Err(Error::LoginRequired);
        }
        Ok(())
    }

    /// URL on the primary host.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.options.base_url.trim_end_matches('/'), path)
    }

    /// URL on the upload host.
    pub(crate) fn upload_url(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.options.upload_base_url.trim_end_matches('/'),
            path
        )
    }

    /// Server links are either absolute or relative to the primary host.
    pub(crate) fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            self.url(link)
        }
    }

    /// Send a request, applying the default timeout when none is set.
    pub(crate) async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        if request.timeout.is_none() {
            request.timeout = Some(self.options.timeout);
        }
        self.transport.execute(request).await
    }

    /// Session cookies for both hosts, without duplicates.
    pub(crate) fn session_cookies(&self) -> Result<Vec<StoredCookie>> {
        let mut cookies: Vec<StoredCookie> = Vec::new();

        for base in [&self.options.base_url, &self.options.upload_base_url] {
            let url = Url::parse(base)?;
            for cookie in self.transport.cookies(&url) {
                if !cookies
                    .iter()
                    .any(|c| c.name == cookie.name && c.url == cookie.url)
                {
                    cookies.push(cookie);
                }
            }
        }

        Ok(cookies)
    }

    /// Log out: forget every cookie and reset the login flag.
    pub fn logout(&mut self) -> Result<()> {
        self.transport.reset()?;
        self.session.reset();
        tracing::info!("Logged out");
        Ok(())
    }
}
