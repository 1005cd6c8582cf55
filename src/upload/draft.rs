//! Publish-time metadata of an upload.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use crate::error::Result;
use crate::upload::category::{CommentPolicy, VideoCategory};
use crate::upload::mime::sniff;

/// Type assumed for thumbnails with an unrecognised signature.
const DEFAULT_THUMBNAIL_MIME: &str = "image/jpeg";

/// Fields submitted when finalizing an upload.
#[derive(Debug, Clone)]
pub struct VideoMetadataDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: VideoCategory,
    pub comment: CommentPolicy,
    pub watermark: bool,
    /// Sent as `kids_friendly`.
    pub kids_friendly: bool,
    pub thumbnail: Option<PathBuf>,
}

impl VideoMetadataDraft {
    pub fn new(title: impl Into<String>, category: VideoCategory) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            category,
            comment: CommentPolicy::Yes,
            watermark: true,
            kids_friendly: false,
            thumbnail: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn comment(mut self, comment: CommentPolicy) -> Self {
        self.comment = comment;
        self
    }

    pub fn watermark(mut self, watermark: bool) -> Self {
        self.watermark = watermark;
        self
    }

    pub fn kids_friendly(mut self, kids_friendly: bool) -> Self {
        self.kids_friendly = kids_friendly;
        self
    }

    pub fn thumbnail(mut self, path: impl Into<PathBuf>) -> Self {
        self.thumbnail = Some(path.into());
        self
    }

    /// Tags as the platform expects them: joined with `-`.
    pub fn joined_tags(&self) -> String {
        self.tags.join("-")
    }

    /// Body of the finalize request.
    pub(crate) fn to_payload(
        &self,
        upload_id: &str,
        chunk_uuid: &str,
        thumbnail: &str,
        upload_base_url: &str,
    ) -> Value {
        json!({
            "uploadId": id_value(upload_id),
            "video": chunk_uuid,
            "watermark": if self.watermark { "1" } else { "0" },
            "watermark_bool": self.watermark,
            "comment": self.comment.as_str(),
            "kids_friendly": self.kids_friendly,
            "title": self.title,
            "descr": self.description,
            "thumbnail": thumbnail,
            "tags": self.joined_tags(),
            "category": self.category.code(),
            "upload_base_url": upload_base_url,
            "new_playlist": "",
            "playlist_temp": "",
            "playlistid": [],
            "subtitle": [],
            "subtitle_temp": [],
            "publish_date": "",
            "video_pass": 0,
        })
    }
}

/// Upload ids arrive as numbers and go back the same way.
fn id_value(id: &str) -> Value {
    id.parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(id))
}

/// `data:<mime>;base64,<bytes>` for the thumbnail, or an empty string.
pub async fn thumbnail_data_uri(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(String::new());
    };

    let bytes = tokio::fs::read(path).await?;
    let mime = sniff(&bytes)
        .filter(|m| m.starts_with("image/"))
        .unwrap_or(DEFAULT_THUMBNAIL_MIME);

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
}
