//! Playlists.

use reqwest::StatusCode;
use serde_json::Value;

use crate::api::client::AparatClient;
use crate::api::endpoints::PLAYLIST_ONE;
use crate::api::transport::{HttpRequest, Transport};
use crate::api::types::{Document, PlaylistAttributes};
use crate::error::{Error, Result};
use crate::resources::{action_attributes, action_succeeded};
use crate::resources::video::Video;

/// A playlist with its videos resolved.
#[derive(Debug, Clone)]
pub struct Playlist {
    pub id: Option<String>,
    pub attributes: PlaylistAttributes,
    pub videos: Vec<Video>,
}

impl Playlist {
    pub fn is_followed(&self) -> bool {
        self.attributes.playlist_follow_status.as_deref() == Some("yes")
    }
}

impl<T: Transport> AparatClient<T> {
    /// Fetch a playlist and resolve each of its videos.
    ///
    /// Videos that no longer exist are left out.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let url = self.url(&format!("{}/{}", PLAYLIST_ONE, playlist_id));
        let response = self.send(HttpRequest::get(url)).await?;

        if response.status != StatusCode::OK {
            return Err(Error::Validation(Value::String(
                "There is no playlist with this ID.".to_string(),
            )));
        }

        let doc: Document<PlaylistAttributes> = serde_json::from_str(&response.body)?;

        let mut videos = Vec::new();
        for item in doc.included.iter().filter(|i| i.kind.as_deref() == Some("Video")) {
            let Some(uid) = item.attributes.get("uid").and_then(Value::as_str) else {
                continue;
            };

            match self.get_video(uid).await {
                Ok(video) => videos.push(video),
                Err(Error::VideoNotFound) => {
                    tracing::debug!("Skipping unavailable playlist video {}", uid);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Playlist {
            id: doc.data.id,
            attributes: doc.data.attributes,
            videos,
        })
    }

    pub async fn follow_playlist(&self, playlist: &mut Playlist) -> Result<bool> {
        self.set_playlist_follow(playlist, "no", "yes").await
    }

    pub async fn unfollow_playlist(&self, playlist: &mut Playlist) -> Result<bool> {
        self.set_playlist_follow(playlist, "yes", "no").await
    }

    /// Flip the follow state from `from` to `to`, storing the server's new link.
    async fn set_playlist_follow(&self, playlist: &mut Playlist, from: &str, to: &str) -> Result<bool> {
        self.require_login()?;

        let attrs = &mut playlist.attributes;
        if attrs.playlist_follow_status.as_deref() != Some(from) {
            return Ok(false);
        }
        let Some(link) = attrs.playlist_follow_link.as_deref() else {
            return Ok(false);
        };

        let response = self.send(HttpRequest::get(self.resolve(link))).await?;
        let payload = response.payload();
        if response.status != StatusCode::OK || !action_succeeded(&payload) {
            return Ok(false);
        }

        if let Some(next) = action_attributes(&payload).link {
            attrs.playlist_follow_link = Some(next);
        }
        attrs.playlist_follow_status = Some(to.to_string());
        Ok(true)
    }
}
