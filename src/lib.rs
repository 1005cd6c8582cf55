//! Aparat Client - a client for the Aparat video platform's private web API
//!
//! This library logs in through the site's browser handshake, keeps the
//! authenticated session on disk, uploads videos through the chunked upload
//! host, and wraps the public resources (videos, users, comments, playlists).
//!
//! # Features
//!
//! - Username/password login, including releasing a session slot when the
//!   account has reached its token limit
//! - Two-step signup with email verification
//! - Session save/restore and `AuthV1` cookie import/export
//! - Video upload with metadata and thumbnail
//! - Video download at a chosen resolution
//!
//! # Example
//!
//! ```no_run
//! use aparat_client::{AparatClient, ClientOptions, VideoCategory, VideoMetadataDraft};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = AparatClient::new(ClientOptions::default())?;
//!     client.login("alice", "secret").await?;
//!     client.save_session()?;
//!
//!     let draft = VideoMetadataDraft::new("Holiday", VideoCategory::TravelTourism)
//!         .tags(["sea", "sun"]);
//!     let video = client.upload_video("holiday.mp4", &draft).await?;
//!     println!("uploaded {:?}", video.attributes.uid);
//!     Ok(())
//! }
//! ```

mod codes;

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod output;
pub mod resources;
pub mod session;
pub mod upload;

// Re-exports for convenience
pub use api::{AparatClient, ClientOptions};
pub use config::Config;
pub use error::{Error, Result};
pub use resources::{Comment, MyVideo, MyVideoKey, Playlist, Quality, ReportDetails, ReportReason, User, Video};
pub use upload::{CommentPolicy, VideoCategory, VideoMetadataDraft};
