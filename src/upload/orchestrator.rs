//! Video upload pipeline.
//!
//! Three network phases that must all succeed:
//!
//! 1. Slot and identifier allocation: an upload slot (`token` + `uploadId`)
//!    from the primary host, then an unused chunk id on the upload host.
//! 2. Binary transfer of the whole file as a single chunk, followed by the
//!    file and chunk completion notices.
//! 3. Metadata finalization on the primary host, whose reply carries the new
//!    video id, resolved through the account's video listing.
//!
//! No step is retried here apart from chunk-id collisions.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::api::client::AparatClient;
use crate::api::endpoints::{CHUNKS_DONE, CHUNK_UPLOAD, FILE_DONE, UPLOAD_FINALIZE, UPLOAD_SLOT};
use crate::api::serde_helpers::value_to_string;
use crate::api::transport::{HttpRequest, MultipartField, Transport};
use crate::api::types::{ChunkAck, UploadSlotResponse};
use crate::error::{Error, Result};
use crate::resources::my_video::{MyVideo, MyVideoKey};
use crate::upload::draft::{thumbnail_data_uri, VideoMetadataDraft};
use crate::upload::mime::{detect_mime, OCTET_STREAM};

/// Header authenticating requests to the upload host.
const TOKEN_HEADER: &str = "x-token";

/// State of one `upload_video` call.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub file_path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
    pub byte_size: u64,
    pub upload_id: String,
    pub token: String,
    pub chunk_uuid: String,
}

fn ensure_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

impl<T: Transport> AparatClient<T> {
    /// Upload and publish a video, returning it as listed in the account.
    pub async fn upload_video(&self, video: impl AsRef<Path>, draft: &VideoMetadataDraft) -> Result<MyVideo> {
        self.require_login()?;

        let video = video.as_ref();
        ensure_file(video)?;
        if let Some(thumbnail) = &draft.thumbnail {
            ensure_file(thumbnail)?;
        }

        let mime_type = detect_mime(video).await?;
        let byte_size = tokio::fs::metadata(video).await?.len();
        let file_name = video
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::FileNotFound(video.to_path_buf()))?;

        let (upload_id, token) = self.request_upload_slot().await?;
        let chunk_uuid = self.allocate_chunk_id().await?;

        let session = UploadSession {
            file_path: video.to_path_buf(),
            file_name,
            mime_type,
            byte_size,
            upload_id,
            token,
            chunk_uuid,
        };
        tracing::info!(
            "Uploading {} ({} bytes, {}) as upload {}",
            session.file_name,
            session.byte_size,
            session.mime_type,
            session.upload_id
        );

        self.transfer_file(&session).await?;
        self.complete_transfer(&session).await?;

        let thumbnail = thumbnail_data_uri(draft.thumbnail.as_deref()).await?;
        let video_id = self.finalize_upload(&session, draft, &thumbnail).await?;

        self.get_my_video(MyVideoKey::Id(video_id))
            .await?
            .ok_or(Error::VideoNotFound)
    }

    /// Reserve an upload slot: `(uploadId, token)`.
    async fn request_upload_slot(&self) -> Result<(String, String)> {
        let body = json!({
            "uploadIds": [0],
            "upload_base_url": self.options.upload_base_url,
            "upload_cnt": 1,
        });
        let response = self
            .send(HttpRequest::post(self.url(UPLOAD_SLOT)).json(body))
            .await?;
        let payload = response.payload();

        if !response.is_success() {
            return Err(Error::Validation(payload));
        }

        let slot = serde_json::from_value::<UploadSlotResponse>(payload.clone())
            .ok()
            .and_then(|r| r.data.into_iter().next())
            .map(|r| r.attributes);

        match slot {
            Some(attrs) => match attrs.upload_id {
                Some(upload_id) => {
                    tracing::info!("Upload slot {} allocated", upload_id);
                    Ok((upload_id, attrs.token))
                }
                None => Err(Error::Validation(payload)),
            },
            None => Err(Error::Validation(payload)),
        }
    }

    /// Send the file as a single chunk.
    async fn transfer_file(&self, session: &UploadSession) -> Result<()> {
        let fields = vec![
            MultipartField::text("qqpartindex", 0),
            MultipartField::text("qqchunksize", session.byte_size),
            MultipartField::text("qqpartbyteoffset", 0),
            MultipartField::text("qqtotalfilesize", session.byte_size),
            MultipartField::text("qqtype", &session.mime_type),
            MultipartField::text("qquuid", &session.chunk_uuid),
            MultipartField::text("qqfilename", &session.file_name),
            MultipartField::text("qqfilepath", &session.file_name),
            MultipartField::text("qqtotalparts", 1),
            MultipartField::File {
                name: "qqfile".to_string(),
                path: session.file_path.clone(),
                file_name: session.file_name.clone(),
                mime: OCTET_STREAM.to_string(),
            },
        ];

        let request = HttpRequest::post(self.upload_url(CHUNK_UPLOAD))
            .bare()
            .header(TOKEN_HEADER, &session.token)
            .multipart(fields)
            .timeout(self.options.upload_timeout);
        let response = self.send(request).await?;
        let payload = response.payload();

        let acknowledged = serde_json::from_value::<ChunkAck>(payload.clone())
            .map(|ack| ack.success)
            .unwrap_or(false);

        if !acknowledged {
            return Err(Error::Validation(payload));
        }

        tracing::debug!("Chunk {} transferred", session.chunk_uuid);
        Ok(())
    }

    /// File and chunk completion notices.
    async fn complete_transfer(&self, session: &UploadSession) -> Result<()> {
        let file_done = HttpRequest::post(self.upload_url(&format!("{}/{}", FILE_DONE, session.chunk_uuid))).bare();
        let response = self.send(file_done).await?;
        if !response.is_success() {
            return Err(Error::Validation(response.payload()));
        }

        let form = vec![
            ("qquuid".to_string(), session.chunk_uuid.clone()),
            ("qqfilename".to_string(), session.file_name.clone()),
            ("qqtotalfilesize".to_string(), session.byte_size.to_string()),
            ("qqtotalparts".to_string(), "1".to_string()),
        ];
        let chunks_done = HttpRequest::post(self.upload_url(CHUNKS_DONE))
            .bare()
            .header(TOKEN_HEADER, &session.token)
            .form(form);
        let response = self.send(chunks_done).await?;
        if !response.is_success() {
            return Err(Error::Validation(response.payload()));
        }

        Ok(())
    }

    /// Submit the metadata and return the new video's id.
    async fn finalize_upload(&self, session: &UploadSession, draft: &VideoMetadataDraft, thumbnail: &str) -> Result<String> {
        let body = draft.to_payload(
            &session.upload_id,
            &session.chunk_uuid,
            thumbnail,
            &self.options.upload_base_url,
        );
        let url = self.url(&format!("{}/{}", UPLOAD_FINALIZE, session.upload_id));
        let response = self.send(HttpRequest::post(url).json(body)).await?;
        let payload = response.payload();

        match payload.pointer("/data/id").and_then(value_to_string) {
            Some(id) => {
                tracing::info!("Upload {} published as video {}", session.upload_id, id);
                Ok(id)
            }
            None => Err(Error::Validation(payload)),
        }
    }
}
