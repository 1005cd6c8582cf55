//! Public videos.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::api::client::AparatClient;
use crate::api::endpoints::VIDEO_REPORT;
use crate::api::endpoints::VIDEO_SHOW;
use crate::api::serde_helpers::value_to_string;
use crate::api::transport::{HttpRequest, Transport};
use crate::api::types::{Document, ResourceObject, VideoAttributes};
use crate::auth::extractor::between;
use crate::codes::platform_codes;
use crate::error::{Error, Result};
use crate::fs::resolve_download_target;
use crate::output::create_download_bar;
use crate::resources::comment::Comment;
use crate::resources::my_video::{MyVideo, MyVideoKey};
use crate::resources::{action_attributes, action_succeeded, included_toggle};
use crate::upload::category::CommentPolicy;

platform_codes! {
    /// Reason attached to a video report.
    pub enum ReportReason {
        FakeNews = 45 => "fake_news",
        NationalSecurity = 24 => "national_security",
        ImproperClothing = 25 => "improper_clothing",
        SexualContent = 26 => "sexual_content",
        EthnicInsults = 27 => "ethnic_insults",
        ReligiousInsults = 28 => "religious_insults",
        PoliticalInsults = 29 => "political_insults",
        ViolentContent = 30 => "violent_content",
        Defamation = 31 => "defamation",
        DangerousActivities = 32 => "dangerous_activities",
        HateSpeech = 33 => "hate_speech",
        ChildAbuse = 34 => "child_abuse",
        InappropriateForChildren = 35 => "inappropriate_for_children",
        ImitativeBehavior = 36 => "imitative_behavior",
        MisleadingContent = 37 => "misleading_content",
        ViolationOfRules = 38 => "violation_of_rules",
        MisleadingTitle = 39 => "misleading_title",
        PrivacyViolation = 40 => "privacy_violation",
        CopyrightViolation = 41 => "copyright_violation",
        UnauthorizedAdvertising = 42 => "unauthorized_advertising",
        TechnicalProblem = 43 => "technical_problem",
        Other = 44 => "other",
    }
}

/// Optional details of a report.
#[derive(Debug, Clone, Default)]
pub struct ReportDetails {
    /// Time points in the video the report refers to.
    pub main_time: String,
    pub main_time1: String,
    pub main_time2: String,
    pub body: Option<String>,
}

/// Which rendition to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quality {
    /// A profile such as `480p`.
    Resolution(String),
    /// The last listed rendition.
    Highest,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Resolution(profile) => f.write_str(profile),
            Quality::Highest => f.write_str("highest"),
        }
    }
}

/// A video with its included objects (like and follow toggles).
#[derive(Debug, Clone)]
pub struct Video {
    pub id: Option<String>,
    pub attributes: VideoAttributes,
    pub included: Vec<ResourceObject<Value>>,
}

impl Video {
    pub fn uid(&self) -> Option<&str> {
        self.attributes.uid.as_deref()
    }

    fn require_uid(&self) -> Result<&str> {
        self.uid()
            .ok_or_else(|| Error::InvalidArgument("video has no uid".to_string()))
    }

    /// First URL of the requested rendition.
    pub fn rendition_url(&self, quality: &Quality) -> Option<&str> {
        let links = &self.attributes.file_link_all;

        let link = match quality {
            Quality::Highest => links.last(),
            Quality::Resolution(profile) => links.iter().find(|l| &l.profile == profile),
        }?;

        link.urls.first().map(String::as_str)
    }
}

impl From<Document<VideoAttributes>> for Video {
    fn from(doc: Document<VideoAttributes>) -> Self {
        Self {
            id: doc.data.id,
            attributes: doc.data.attributes,
            included: doc.included,
        }
    }
}

impl<T: Transport> AparatClient<T> {
    /// Fetch a video by uid.
    ///
    /// The reply must carry a `meta` object without a `status` entry;
    /// anything else means the video does not exist.
    pub async fn get_video(&self, uid: &str) -> Result<Video> {
        let request = HttpRequest::get(self.url(&format!("{}/{}", VIDEO_SHOW, uid)))
            .query("pr", "1")
            .query("mf", "1");
        let payload = self.send(request).await?.payload();

        let found = payload
            .get("meta")
            .map(|meta| meta.get("status").is_none())
            .unwrap_or(false);
        if !found {
            return Err(Error::VideoNotFound);
        }

        let doc: Document<VideoAttributes> = serde_json::from_value(payload)?;
        Ok(doc.into())
    }

    pub async fn like_video(&self, video: &Video) -> Result<bool> {
        Ok(self
            .flip_toggle(included_toggle(&video.included, "Like"), "unlike")
            .await?
            .is_some())
    }

    pub async fn unlike_video(&self, video: &Video) -> Result<bool> {
        Ok(self
            .flip_toggle(included_toggle(&video.included, "Like"), "like")
            .await?
            .is_some())
    }

    /// Follow the video's channel.
    pub async fn follow_video_owner(&self, video: &Video, toggle_push: bool) -> Result<bool> {
        self.follow_included(&video.included, toggle_push).await
    }

    pub async fn unfollow_video_owner(&self, video: &Video) -> Result<bool> {
        self.unfollow_included(&video.included).await
    }

    /// Post a comment and return it as listed under the video.
    pub async fn send_comment(&self, video: &Video, text: &str) -> Result<Comment> {
        self.require_login()?;

        let link = video
            .attributes
            .comment_send_link
            .as_deref()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| Error::InvalidArgument("This video does not have a comment link.".to_string()))?;

        let enabled = video
            .attributes
            .comment_enable
            .as_deref()
            .map(CommentPolicy::accepts_comments)
            .unwrap_or(false);
        if !enabled {
            return Err(Error::InvalidArgument(
                "Comments are disabled for this video.".to_string(),
            ));
        }

        let request = HttpRequest::post(self.resolve(link))
            .form(vec![("commentbody".to_string(), text.to_string())]);
        let payload = self.send(request).await?.payload();

        let comment_id = payload.pointer("/data/id").and_then(value_to_string);
        match comment_id {
            Some(id) if action_succeeded(&payload) => self.get_comment(video.require_uid()?, &id).await,
            _ => Err(Error::Validation(payload)),
        }
    }

    /// Report a video; returns the server's confirmation text on success.
    pub async fn report_video(&self, video: &Video, reason: ReportReason, details: &ReportDetails) -> Result<Option<String>> {
        self.require_login()?;

        if video.attributes.is_reportable != Some(true) {
            return Err(Error::InvalidArgument(
                "This video cannot be reported.".to_string(),
            ));
        }
        let uid = video.require_uid()?;

        let mut body = json!({
            "videoURL": self.url(&format!("/v/{}", uid)),
            "reason": reason.code(),
            "main_time": details.main_time,
            "main_time1": details.main_time1,
            "main_time2": details.main_time2,
        });
        if let Some(text) = &details.body {
            body["body"] = Value::String(text.clone());
        }

        let url = self.url(&format!("{}/{}", VIDEO_REPORT, uid));
        let payload = self.send(HttpRequest::post(url).json(body)).await?.payload();

        let attrs = action_attributes(&payload);
        if !attrs.is_success() {
            return Ok(None);
        }

        Ok(attrs
            .text
            .as_deref()
            .and_then(|text| between(text, "<span>", "</span>"))
            .map(|text| text.trim().to_string()))
    }

    /// Add someone else's video to the account's channel.
    pub async fn republish_video(&self, video: &Video) -> Result<MyVideo> {
        self.require_login()?;

        let link = video
            .attributes
            .add_to_channel_link
            .as_deref()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| Error::InvalidArgument("addToChannelLink does not exist.".to_string()))?;

        let response = self.send(HttpRequest::get(self.resolve(link))).await?;
        let payload = response.payload();

        let id = payload.pointer("/data/id").and_then(value_to_string);
        match id {
            Some(id) if response.is_success() => self
                .get_my_video(MyVideoKey::Id(id))
                .await?
                .ok_or(Error::VideoNotFound),
            _ => Err(Error::Validation(payload)),
        }
    }

    /// Download a rendition and return the written path.
    pub async fn download_video(&self, video: &Video, quality: &Quality, path: Option<&Path>, show_progress: bool) -> Result<PathBuf> {
        let url = video
            .rendition_url(quality)
            .ok_or_else(|| Error::Resolution(quality.to_string()))?;
        let target = resolve_download_target(url, path)?;

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bar = show_progress.then(|| {
            let name = target
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            create_download_bar(&name)
        });

        let written = self.transport.download(url, &target, bar.as_ref()).await?;
        if let Some(bar) = bar {
            bar.finish();
        }

        tracing::info!("Downloaded {} bytes to {}", written, target.display());
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ClientOptions;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn video(attributes: Value) -> Video {
        let doc: Document<VideoAttributes> = serde_json::from_value(json!({
            "data": {"id": "1", "type": "Video", "attributes": attributes},
            "included": [{"type": "Like", "attributes": {"status": "unlike", "link": "/like/abc"}}]
        }))
        .unwrap();
        doc.into()
    }

    fn client(server: &MockServer) -> AparatClient {
        AparatClient::new(ClientOptions {
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_rendition_url() {
        let video = video(json!({
            "uid": "abc",
            "file_link_all": [
                {"profile": "144p", "urls": ["https://cdn/abc-144p.mp4"]},
                {"profile": "720p", "urls": ["https://cdn/abc-720p.mp4"]}
            ]
        }));

        assert_eq!(
            video.rendition_url(&Quality::Resolution("144p".into())),
            Some("https://cdn/abc-144p.mp4")
        );
        assert_eq!(
            video.rendition_url(&Quality::Highest),
            Some("https://cdn/abc-720p.mp4")
        );
        assert_eq!(video.rendition_url(&Quality::Resolution("1080p".into())), None);
    }

    #[test]
    fn test_report_reason_codes() {
        assert_eq!(ReportReason::FakeNews.code(), 45);
        assert_eq!(ReportReason::Other.code(), 44);
        assert_eq!("hate-speech".parse::<ReportReason>(), Ok(ReportReason::HateSpeech));
    }

    #[tokio::test]
    async fn test_get_video_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/abc", VIDEO_SHOW)))
            .and(query_param("pr", "1"))
            .and(query_param("mf", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "1", "type": "Video", "attributes": {"uid": "abc", "title": "clip"}},
                "included": [],
                "meta": {}
            })))
            .mount(&server)
            .await;

        let video = client(&server).get_video("abc").await.unwrap();
        assert_eq!(video.uid(), Some("abc"));
        assert_eq!(video.attributes.title.as_deref(), Some("clip"));
    }

    #[tokio::test]
    async fn test_get_video_null_file_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/bare", VIDEO_SHOW)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"id": "4", "type": "Video", "attributes": {"uid": "bare", "file_link_all": null}},
                "meta": {}
            })))
            .mount(&server)
            .await;

        let video = client(&server).get_video("bare").await.unwrap();
        assert_eq!(video.uid(), Some("bare"));
        assert!(video.attributes.file_link_all.is_empty());
        assert_eq!(video.rendition_url(&Quality::Resolution("480p".into())), None);
    }

    #[tokio::test]
    async fn test_get_video_error_meta() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "meta": {"status": "error"}
            })))
            .mount(&server)
            .await;

        let result = client(&server).get_video("gone").await;
        assert!(matches!(result, Err(Error::VideoNotFound)));
    }

    #[tokio::test]
    async fn test_like_video() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/like/abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let video = video(json!({"uid": "abc"}));

        assert!(client.like_video(&video).await.unwrap());
        assert!(!client.unlike_video(&video).await.unwrap());
    }

    #[tokio::test]
    async fn test_actions_require_login() {
        let server = MockServer::start().await;
        let client = client(&server);
        let video = video(json!({"uid": "abc", "is_reportable": true}));

        assert!(matches!(
            client.send_comment(&video, "hi").await,
            Err(Error::LoginRequired)
        ));
        assert!(matches!(
            client
                .report_video(&video, ReportReason::Other, &ReportDetails::default())
                .await,
            Err(Error::LoginRequired)
        ));
        assert!(matches!(
            client.follow_video_owner(&video, false).await,
            Err(Error::LoginRequired)
        ));
        assert!(matches!(
            client.republish_video(&video).await,
            Err(Error::LoginRequired)
        ));
    }

    #[tokio::test]
    async fn test_download_missing_resolution() {
        let server = MockServer::start().await;
        let video = video(json!({"uid": "abc", "file_link_all": []}));

        let result = client(&server)
            .download_video(&video, &Quality::Resolution("480p".into()), None, false)
            .await;
        assert!(matches!(result, Err(Error::Resolution(q)) if q == "480p"));
    }

    #[tokio::test]
    async fn test_download_into_directory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/abc-480p.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 64]))
            .mount(&server)
            .await;

        let video = video(json!({
            "uid": "abc",
            "file_link_all": [{"profile": "480p", "urls": [format!("{}/media/abc-480p.mp4?sig=x", server.uri())]}]
        }));
        let dir = tempfile::tempdir().unwrap();

        let target = client(&server)
            .download_video(&video, &Quality::Resolution("480p".into()), Some(dir.path()), false)
            .await
            .unwrap();

        assert_eq!(target, dir.path().join("abc-480p.mp4"));
        assert_eq!(std::fs::metadata(&target).unwrap().len(), 64);
    }
}
