//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::upload::{CommentPolicy, VideoCategory};

/// Aparat command-line client.
#[derive(Parser, Debug)]
#[command(
    name = "aparat",
    version,
    about = "Download, upload and manage videos on Aparat",
    long_about = "A CLI for Aparat's web API.\n\n\
                  Downloads public videos, logs in (keeping the session on disk) \
                  and uploads videos to an account."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Proxy for a scheme, e.g. `https=http://127.0.0.1:8080`. Repeatable.
    #[arg(long, global = true, value_parser = parse_proxy)]
    pub proxy: Vec<(String, String)>,

    /// Directory holding saved sessions.
    #[arg(long, global = true)]
    pub session_dir: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a public video.
    Download {
        /// Watch URL or video uid.
        target: String,

        /// Resolution tier, e.g. 480p.
        resolution: Option<String>,

        /// Target file or directory.
        path: Option<PathBuf>,

        /// Download the highest available resolution.
        #[arg(long)]
        highest: bool,

        /// Hide the progress bar.
        #[arg(long)]
        no_progress: bool,
    },

    /// Log in and optionally keep the session on disk.
    Login {
        /// Username, email or phone number.
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long, env = "APARAT_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Save the session for later commands.
        #[arg(long)]
        save: bool,
    },

    /// Restore a saved session and print the account profile.
    Whoami {
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Upload a video to the account.
    Upload {
        #[arg(short, long)]
        username: Option<String>,

        /// Used when no saved session is accepted.
        #[arg(short, long, env = "APARAT_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Video file to upload.
        video: PathBuf,

        #[arg(long)]
        title: String,

        /// Category name (e.g. `music`) or numeric code.
        #[arg(long)]
        category: VideoCategory,

        /// Tag; repeat for several.
        #[arg(long = "tag", required = true)]
        tags: Vec<String>,

        #[arg(long, default_value = "")]
        description: String,

        /// Thumbnail image.
        #[arg(long)]
        thumbnail: Option<PathBuf>,

        /// Who may comment: yes, approve or no.
        #[arg(long, default_value = "yes")]
        comment: CommentPolicy,

        #[arg(long)]
        no_watermark: bool,

        /// Mark the video as suitable for children.
        #[arg(long)]
        kids: bool,
    },
}

/// Parse a `scheme=url` proxy argument.
fn parse_proxy(value: &str) -> std::result::Result<(String, String), String> {
    let (scheme, url) = value
        .split_once('=')
        .ok_or_else(|| format!("expected scheme=url, got '{}'", value))?;

    if scheme.is_empty() || url.is_empty() {
        return Err(format!("expected scheme=url, got '{}'", value));
    }

    Ok((scheme.trim().to_lowercase(), url.trim().to_string()))
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.network.timeout_seconds = timeout;
        }

        for (scheme, url) in &self.proxy {
            config.network.proxy.insert(scheme.clone(), url.clone());
        }

        if let Some(dir) = &self.session_dir {
            config.session.directory = Some(dir.clone());
        }

        match &self.command {
            Command::Download {
                resolution,
                no_progress,
                ..
            } => {
                if let Some(resolution) = resolution {
                    config.download.resolution = resolution.clone();
                }
                if *no_progress {
                    config.download.show_progress = false;
                }
            }
            Command::Login {
                username, password, ..
            }
            | Command::Upload {
                username, password, ..
            } => {
                if let Some(username) = username {
                    config.account.username = Some(username.clone());
                }
                if let Some(password) = password {
                    config.account.password = Some(password.clone());
                }
            }
            Command::Whoami { username } => {
                if let Some(username) = username {
                    config.account.username = Some(username.clone());
                }
            }
        }
    }
}
