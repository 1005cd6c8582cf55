//! Configuration module for the aparat client.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Converting it into client options
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{AccountConfig, Config, DownloadConfig, NetworkConfig, SessionConfig};
pub use validation::{parse_video_uid, validate_config};
