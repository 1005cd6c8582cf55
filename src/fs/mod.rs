//! Filesystem module.
//!
//! Provides:
//! - Filename sanitizing
//! - Download target resolution

pub mod naming;

pub use naming::{file_name_from_url, resolve_download_target, sanitize_filename};
