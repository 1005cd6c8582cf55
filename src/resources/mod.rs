//! Typed wrappers over the platform's resources.
//!
//! Records are plain data; every network action is a client method taking
//! the record it acts on.

pub mod comment;
pub mod my_video;
pub mod playlist;
pub mod user;
pub mod video;

use reqwest::StatusCode;
use serde_json::Value;

use crate::api::client::AparatClient;
use crate::api::transport::{HttpRequest, HttpResponse, Transport};
use crate::api::types::{ActionAttributes, ResourceObject, Toggle};
use crate::error::Result;

pub use comment::Comment;
pub use my_video::{MyVideo, MyVideoKey};
pub use playlist::Playlist;
pub use user::User;
pub use video::{Quality, ReportDetails, ReportReason, Video};

/// The toggle carried by the first included object of type `kind`.
pub(crate) fn included_toggle(included: &[ResourceObject<Value>], kind: &str) -> Option<Toggle> {
    included
        .iter()
        .find(|item| item.kind.as_deref() == Some(kind))
        .and_then(|item| serde_json::from_value(item.attributes.clone()).ok())
}

/// `data.attributes` of an action reply; empty when absent or malformed.
pub(crate) fn action_attributes(payload: &Value) -> ActionAttributes {
    payload
        .pointer("/data/attributes")
        .cloned()
        .and_then(|attrs| serde_json::from_value(attrs).ok())
        .unwrap_or_default()
}

/// Whether an action reply reports `type: success`, at either nesting level.
pub(crate) fn action_succeeded(payload: &Value) -> bool {
    ["/data/attributes/type", "/data/type"]
        .iter()
        .any(|pointer| payload.pointer(pointer).and_then(Value::as_str) == Some("success"))
}

impl<T: Transport> AparatClient<T> {
    /// Follow a toggle's link when it is in state `from`.
    ///
    /// Returns the reply on `200`, `None` when the toggle is absent, in
    /// another state, or the server refused.
    pub(crate) async fn flip_toggle(&self, toggle: Option<Toggle>, from: &str) -> Result<Option<HttpResponse>> {
        let Some(Toggle {
            status: Some(status),
            link: Some(link),
        }) = toggle
        else {
            return Ok(None);
        };

        if status != from {
            return Ok(None);
        }

        let response = self.send(HttpRequest::get(self.resolve(&link))).await?;
        if response.status == StatusCode::OK {
            Ok(Some(response))
        } else {
            tracing::debug!("Toggle {} refused: HTTP {}", link, response.status);
            Ok(None)
        }
    }

    /// Follow the owner behind a video or profile, optionally enabling push notifications.
    pub(crate) async fn follow_included(&self, included: &[ResourceObject<Value>], toggle_push: bool) -> Result<bool> {
        self.require_login()?;

        let Some(response) = self
            .flip_toggle(included_toggle(included, "Follow"), "unfollow")
            .await?
        else {
            return Ok(false);
        };

        if toggle_push {
            let push_link = response
                .json()
                .ok()
                .and_then(|body| {
                    body.pointer("/data/attributes/link_toggle_push_follow")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                });

            match push_link {
                Some(link) => {
                    self.send(HttpRequest::get(self.resolve(&link))).await?;
                }
                None => tracing::warn!("Follow reply carries no push-notification link"),
            }
        }

        Ok(true)
    }

    pub(crate) async fn unfollow_included(&self, included: &[ResourceObject<Value>]) -> Result<bool> {
        self.require_login()?;

        Ok(self
            .flip_toggle(included_toggle(included, "Follow"), "follow")
            .await?
            .is_some())
    }
}
