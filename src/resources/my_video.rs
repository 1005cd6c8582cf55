//! Videos owned by the logged-in account.

use reqwest::StatusCode;

use crate::api::client::AparatClient;
use crate::api::endpoints::MY_VIDEOS;
use crate::api::transport::{HttpRequest, Transport};
use crate::api::types::{MyVideoAttributes, MyVideosResponse, ResourceObject};
use crate::error::{Error, Result};

/// An entry of the account's own video listing.
pub type MyVideo = ResourceObject<MyVideoAttributes>;

/// How to pick one of the account's videos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MyVideoKey {
    /// Listing id, as returned by the upload finalizer.
    Id(String),
    /// Public video hash.
    Uid(String),
}

impl MyVideoKey {
    fn value(&self) -> &str {
        match self {
            MyVideoKey::Id(v) | MyVideoKey::Uid(v) => v,
        }
    }

    fn matches(&self, video: &MyVideo) -> bool {
        match self {
            MyVideoKey::Id(id) => video.id.as_deref() == Some(id.as_str()),
            MyVideoKey::Uid(uid) => video.attributes.uid.as_deref() == Some(uid.as_str()),
        }
    }
}

impl<T: Transport> AparatClient<T> {
    /// List the account's videos; empty when the server refuses.
    pub async fn get_my_videos(&self) -> Result<Vec<MyVideo>> {
        self.require_login()?;

        let response = self.send(HttpRequest::get(self.url(MY_VIDEOS))).await?;
        if response.status != StatusCode::OK {
            tracing::debug!("Video listing returned HTTP {}", response.status);
            return Ok(Vec::new());
        }

        let listing: MyVideosResponse = serde_json::from_str(&response.body)?;
        Ok(listing.included)
    }

    /// Find one of the account's videos.
    pub async fn get_my_video(&self, key: MyVideoKey) -> Result<Option<MyVideo>> {
        self.require_login()?;

        if key.value().is_empty() {
            return Err(Error::InvalidArgument(
                "a video id or uid must be provided".to_string(),
            ));
        }

        Ok(self
            .get_my_videos()
            .await?
            .into_iter()
            .find(|video| key.matches(video)))
    }

    pub async fn delete_my_video(&self, video: &MyVideo) -> Result<bool> {
        self.require_login()?;

        let attrs = &video.attributes;
        let link = attrs
            .share_delete_url
            .as_deref()
            .filter(|l| !l.is_empty())
            .or_else(|| attrs.delete_url.as_deref().filter(|l| !l.is_empty()))
            .ok_or_else(|| Error::InvalidArgument("delete_url does not exist.".to_string()))?;

        let response = self.send(HttpRequest::get(self.resolve(link))).await?;
        Ok(response.status == StatusCode::OK)
    }
}
