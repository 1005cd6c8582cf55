//! API response type definitions.
//!
//! Resources follow a JSON:API-like envelope: `{data, included, links, meta}`
//! where each resource is `{id, type, attributes}`. Attribute records name the
//! fields the client uses; everything else lands in `extra`.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::api::serde_helpers::{flexible_bool, opt_string, opt_u64, vec_or_null};

/// One `{id, type, attributes}` object.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceObject<A> {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub attributes: A,
}

/// Envelope with a single primary resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Document<A> {
    pub data: ResourceObject<A>,
    #[serde(default)]
    pub included: Vec<ResourceObject<Value>>,
    #[serde(default)]
    pub meta: Option<Value>,
}

/// Envelope with a list of resources.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct ListDocument<A> {
    #[serde(default, deserialize_with = "vec_or_null")]
    pub data: Vec<ResourceObject<A>>,
    #[serde(default)]
    pub links: Option<Links>,
}

/// Pagination links.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub more: Option<String>,
}

/// A like/follow toggle: current status plus the link that flips it.
#[derive(Debug, Clone, Deserialize)]
pub struct Toggle {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// One encoded rendition of a video.
#[derive(Debug, Clone, Deserialize)]
pub struct FileLink {
    pub profile: String,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Attributes of a public video.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoAttributes {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub visit_cnt: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub visit_cnt_non_formatted: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub like_cnt_non_formatted: Option<u64>,
    #[serde(default)]
    pub big_poster: Option<String>,
    #[serde(default)]
    pub small_poster: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub sdate: Option<String>,
    #[serde(default, deserialize_with = "vec_or_null")]
    pub file_link_all: Vec<FileLink>,
    #[serde(default)]
    pub file_link: Option<String>,
    #[serde(default)]
    pub hls_link: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub can_download: Option<bool>,
    #[serde(default, deserialize_with = "opt_string")]
    pub tags_str: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub comment_enable: Option<String>,
    #[serde(rename = "commentSendLink", default)]
    pub comment_send_link: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_reportable: Option<bool>,
    #[serde(rename = "addToChannelLink", default)]
    pub add_to_channel_link: Option<String>,
    #[serde(default)]
    pub owner_username: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub kids_friendly: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub max_width: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub max_height: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Attributes of a user profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAttributes {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub hash_user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub has_email: Option<bool>,
    #[serde(default)]
    pub pic_m: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub follower_cnt: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub follow_cnt: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub video_cnt: Option<u64>,
    #[serde(default, deserialize_with = "opt_string")]
    pub official: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub banned: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Attributes of a comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentAttributes {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub sdate: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub approved: Option<String>,
    #[serde(rename = "isYours", default, deserialize_with = "flexible_bool")]
    pub is_yours: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub deleted: Option<bool>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub like_cnt: Option<u64>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub reply_cnt: Option<u64>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_pinned: Option<bool>,
    #[serde(default)]
    pub like: Option<Toggle>,
    #[serde(default)]
    pub delete_url: Option<String>,
    #[serde(default)]
    pub report_url: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Attributes of a playlist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistAttributes {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub cnt: Option<u64>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub publish_type: Option<String>,
    #[serde(rename = "isYours", default, deserialize_with = "flexible_bool")]
    pub is_yours: Option<bool>,
    #[serde(default)]
    pub playlist_follow_link: Option<String>,
    #[serde(default)]
    pub playlist_follow_status: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Attributes of a video in the logged-in account's own listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MyVideoAttributes {
    #[serde(default, deserialize_with = "opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    pub visit_cnt: Option<String>,
    #[serde(default)]
    pub share_delete_url: Option<String>,
    #[serde(default)]
    pub delete_url: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Listing of the account's own videos; the videos live in `included`.
#[derive(Debug, Clone, Deserialize)]
pub struct MyVideosResponse {
    #[serde(default, deserialize_with = "vec_or_null")]
    pub included: Vec<ResourceObject<MyVideoAttributes>>,
}

/// Error entry of a failed handshake step.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default)]
    pub type_info: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
}

/// `{"errors": [...]}` body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrors {
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

/// Attributes carrying the handshake's rotating `temp_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct TempIdAttributes {
    #[serde(deserialize_with = "opt_string")]
    pub temp_id: Option<String>,
}

/// Attributes of one upload slot.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSlotAttributes {
    pub token: String,
    #[serde(rename = "uploadId", deserialize_with = "opt_string")]
    pub upload_id: Option<String>,
}

/// Response to the upload-slot request.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSlotResponse {
    #[serde(default, deserialize_with = "vec_or_null")]
    pub data: Vec<ResourceObject<UploadSlotAttributes>>,
}

/// Upload host acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkAck {
    #[serde(default)]
    pub success: bool,
}

/// Attributes of an action result (`{"type": "success", ...}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionAttributes {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub link_toggle_push_follow: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ActionAttributes {
    pub fn is_success(&self) -> bool {
        self.kind.as_deref() == Some("success")
    }
}
