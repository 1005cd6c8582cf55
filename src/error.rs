//! Error types for the aparat client.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // Authentication errors
    #[error("The password is not correct.")]
    IncorrectPassword,

    #[error("Username does not exist.")]
    UsernameNotFound,

    #[error("Login failed.")]
    LoginFailed,

    #[error("Please login first.")]
    LoginRequired,

    #[error("Releasing a session slot failed: {0}")]
    TokenRevocation(String),

    #[error("Signup failed: HTTP {status}: {body}")]
    SignupFailed { status: u16, body: String },

    /// An expected marker was missing from a page, usually after a site layout change.
    #[error("Could not extract '{0}' from page state")]
    ProtocolExtraction(String),

    // Resource errors
    #[error("Video does not exist.")]
    VideoNotFound,

    #[error("The requested video resolution is unavailable: {0}")]
    Resolution(String),

    /// Server replied with a shape the client does not interpret.
    #[error("Unexpected server response: {0}")]
    Validation(serde_json::Value),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Upload errors
    #[error("No unused chunk id found after {attempts} attempts")]
    ChunkIdAllocation { attempts: u32 },

    #[error("The file at path {} does not exist.", .0.display())]
    FileNotFound(PathBuf),

    #[error("Download failed: {0}")]
    Download(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error came from the login/signup handshake or a missing login.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Error::IncorrectPassword
                | Error::UsernameNotFound
                | Error::LoginFailed
                | Error::LoginRequired
                | Error::TokenRevocation(_)
                | Error::SignupFailed { .. }
        )
    }
}

/// Process exit codes used by the CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const TRANSFER_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
