//! Video comments.

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::api::client::AparatClient;
use crate::api::endpoints::{COMMENT_LIST, COMMENT_REPLIES, COMMENT_REPLY};
use crate::api::transport::{HttpRequest, Transport};
use crate::api::types::{CommentAttributes, ListDocument, ResourceObject};
use crate::error::{Error, Result};
use crate::resources::action_succeeded;

/// Page size requested from the comment listing.
const PER_PAGE: &str = "100";

/// A comment on a video.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: Option<String>,
    /// Uid of the video the comment belongs to.
    pub video_uid: String,
    pub attributes: CommentAttributes,
}

impl Comment {
    fn from_resource(resource: ResourceObject<CommentAttributes>, video_uid: &str) -> Self {
        Self {
            id: resource.attributes.id.clone().or(resource.id),
            video_uid: video_uid.to_string(),
            attributes: resource.attributes,
        }
    }

    fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .ok_or_else(|| Error::InvalidArgument("comment has no id".to_string()))
    }
}

impl<T: Transport> AparatClient<T> {
    /// Find a comment under a video, following the listing's `more` links.
    pub async fn get_comment(&self, video_uid: &str, comment_id: &str) -> Result<Comment> {
        let first = HttpRequest::get(self.url(&format!("{}/{}", COMMENT_LIST, video_uid)))
            .query("perpage", PER_PAGE);
        let mut request = Some(first);

        while let Some(next) = request.take() {
            let response = self.send(next).await?;
            if response.status != StatusCode::OK {
                break;
            }

            let page: ListDocument<CommentAttributes> = serde_json::from_str(&response.body)?;
            let more = page.links.and_then(|l| l.more).filter(|m| !m.is_empty());

            if let Some(found) = page
                .data
                .into_iter()
                .find(|c| c.id.as_deref() == Some(comment_id))
            {
                return Ok(Comment::from_resource(found, video_uid));
            }

            request = more.map(|link| HttpRequest::get(self.resolve(&link)).query("perpage", PER_PAGE));
        }

        Err(Error::Validation(Value::String("No comment found.".to_string())))
    }

    pub async fn like_comment(&self, comment: &Comment) -> Result<bool> {
        Ok(self
            .flip_toggle(comment.attributes.like.clone(), "unlike")
            .await?
            .is_some())
    }

    pub async fn unlike_comment(&self, comment: &Comment) -> Result<bool> {
        Ok(self
            .flip_toggle(comment.attributes.like.clone(), "like")
            .await?
            .is_some())
    }

    pub async fn delete_comment(&self, comment: &Comment) -> Result<bool> {
        self.require_login()?;

        let link = comment
            .attributes
            .delete_url
            .as_deref()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| Error::InvalidArgument("This comment does not have a delete URL.".to_string()))?;

        let response = self.send(HttpRequest::get(self.resolve(link))).await?;
        Ok(response.status == StatusCode::OK && action_succeeded(&response.payload()))
    }

    pub async fn report_comment(&self, comment: &Comment) -> Result<bool> {
        self.require_login()?;

        let link = comment
            .attributes
            .report_url
            .as_deref()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| Error::InvalidArgument("This comment does not have a report URL.".to_string()))?;

        let response = self.send(HttpRequest::get(self.resolve(link))).await?;
        Ok(response.status == StatusCode::OK && action_succeeded(&response.payload()))
    }

    pub async fn reply_to_comment(&self, comment: &Comment, body: &str) -> Result<bool> {
        self.require_login()?;

        let url = self.url(&format!("{}/{}", COMMENT_REPLY, comment.video_uid));
        let request = HttpRequest::post(url).json(json!({
            "comment_id": comment.require_id()?,
            "body": body,
        }));
        let response = self.send(request).await?;

        Ok(response.status == StatusCode::OK && action_succeeded(&response.payload()))
    }

    /// Replies to a comment; empty when there are none.
    pub async fn comment_replies(&self, comment: &Comment) -> Result<Vec<Comment>> {
        let url = self.url(&format!(
            "{}/{}/videohash/{}",
            COMMENT_REPLIES,
            comment.require_id()?,
            comment.video_uid
        ));
        let response = self.send(HttpRequest::get(url)).await?;

        if response.status != StatusCode::OK {
            return Err(Error::Validation(response.payload()));
        }

        let page: ListDocument<CommentAttributes> = serde_json::from_str(&response.body)?;
        Ok(page
            .data
            .into_iter()
            .map(|r| Comment::from_resource(r, &comment.video_uid))
            .collect())
    }
}
