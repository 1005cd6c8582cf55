//! Chunked video upload.

pub mod category;
pub mod chunk_id;
pub mod draft;
pub mod mime;
pub mod orchestrator;

pub use category::{CommentPolicy, VideoCategory};
pub use chunk_id::MAX_CHUNK_ID_ATTEMPTS;
pub use draft::VideoMetadataDraft;
pub use orchestrator::UploadSession;
