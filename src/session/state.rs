//! In-memory session state.

use std::collections::HashMap;

/// Login flag, username and proxy of one client.
///
/// The cookie jar itself lives in the transport; this struct only records
/// what the jar currently represents.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    is_logged_in: bool,
    username: Option<String>,
    proxy: Option<HashMap<String, String>>,
}

impl SessionState {
    pub fn new(proxy: Option<HashMap<String, String>>) -> Self {
        Self {
            proxy,
            ..Default::default()
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn proxy(&self) -> Option<&HashMap<String, String>> {
        self.proxy.as_ref()
    }

    /// Record a successful authentication.
    pub fn mark_logged_in(&mut self, username: impl Into<String>) {
        self.is_logged_in = true;
        self.username = Some(username.into());
    }

    /// Back to the state of a freshly constructed client. The proxy survives.
    pub fn reset(&mut self) {
        self.is_logged_in = false;
        self.username = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_logged_out() {
        let state = SessionState::new(None);
        assert!(!state.is_logged_in());
        assert!(state.username().is_none());
    }

    #[test]
    fn test_reset_keeps_proxy() {
        let mut proxy = HashMap::new();
        proxy.insert("https".to_string(), "http://proxy:8080".to_string());

        let mut state = SessionState::new(Some(proxy));
        state.mark_logged_in("alice");
        assert!(state.is_logged_in());
        assert_eq!(state.username(), Some("alice"));

        state.reset();
        assert!(!state.is_logged_in());
        assert!(state.username().is_none());
        assert!(state.proxy().is_some());
    }
}
