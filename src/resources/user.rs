//! User profiles and account-level listings.

use reqwest::StatusCode;
use serde_json::Value;

use crate::api::client::AparatClient;
use crate::api::endpoints::{DASHBOARD, NOTIFICATIONS, USER_BY_USERNAME, USER_INFORMATION};
use crate::api::transport::{HttpRequest, Transport};
use crate::api::types::{Document, ResourceObject, UserAttributes};
use crate::error::Result;

/// A user profile with its included objects (the follow toggle).
#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<String>,
    pub attributes: UserAttributes,
    pub included: Vec<ResourceObject<Value>>,
}

impl From<Document<UserAttributes>> for User {
    fn from(doc: Document<UserAttributes>) -> Self {
        Self {
            id: doc.data.id,
            attributes: doc.data.attributes,
            included: doc.included,
        }
    }
}

impl<T: Transport> AparatClient<T> {
    /// Look up a public profile by username.
    pub async fn get_user(&self, username: &str) -> Result<Option<User>> {
        let url = self.url(&format!("{}/{}", USER_BY_USERNAME, username));
        self.fetch_user(url).await
    }

    /// Profile of the logged-in account.
    pub async fn get_me(&self) -> Result<Option<User>> {
        self.require_login()?;
        self.fetch_user(self.url(USER_INFORMATION)).await
    }

    async fn fetch_user(&self, url: String) -> Result<Option<User>> {
        let response = self.send(HttpRequest::get(url)).await?;
        if response.status != StatusCode::OK {
            tracing::debug!("Profile lookup returned HTTP {}", response.status);
            return Ok(None);
        }

        let doc: Document<UserAttributes> = serde_json::from_str(&response.body)?;
        Ok(Some(doc.into()))
    }

    pub async fn follow_user(&self, user: &User, toggle_push: bool) -> Result<bool> {
        self.follow_included(&user.included, toggle_push).await
    }

    pub async fn unfollow_user(&self, user: &User) -> Result<bool> {
        self.unfollow_included(&user.included).await
    }

    /// Raw notification listing.
    pub async fn notifications(&self) -> Result<Option<Value>> {
        self.require_login()?;
        self.fetch_raw(NOTIFICATIONS).await
    }

    /// Raw comment dashboard.
    pub async fn dashboard(&self) -> Result<Option<Value>> {
        self.require_login()?;
        self.fetch_raw(DASHBOARD).await
    }

    async fn fetch_raw(&self, path: &str) -> Result<Option<Value>> {
        let response = self.send(HttpRequest::get(self.url(path))).await?;
        if response.status != StatusCode::OK {
            return Ok(None);
        }
        Ok(Some(response.json()?))
    }
}
