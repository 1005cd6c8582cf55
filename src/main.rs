//! Aparat CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use aparat_client::{
    cli::{Args, Command},
    config::{parse_video_uid, validate_config, Config},
    error::{exit_codes, Error, Result},
    output::{
        create_spinner, print_banner, print_error, print_info, print_profile, print_success,
        print_video_summary, print_warning,
    },
    AparatClient, Quality, VideoMetadataDraft,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

fn exit_code_for(error: &Error) -> i32 {
    match error {
        Error::Config(_) | Error::ConfigValidation { .. } | Error::TomlParse(_) => {
            exit_codes::CONFIG_ERROR
        }
        e if e.is_auth() => exit_codes::API_ERROR,
        Error::VideoNotFound
        | Error::Resolution(_)
        | Error::Validation(_)
        | Error::InvalidArgument(_)
        | Error::ProtocolExtraction(_)
        | Error::Http(_)
        | Error::Json(_) => exit_codes::API_ERROR,
        Error::Download(_)
        | Error::ChunkIdAllocation { .. }
        | Error::FileNotFound(_)
        | Error::Io(_) => exit_codes::TRANSFER_ERROR,
        _ => exit_codes::UNEXPECTED_ERROR,
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        tracing::debug!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let mut client = AparatClient::new(config.client_options())?;

    match args.command {
        Command::Download {
            target,
            path,
            highest,
            ..
        } => download(&client, &config, &target, path, highest).await,
        Command::Login { save, .. } => login(&mut client, &config, save).await,
        Command::Whoami { .. } => whoami(&mut client, &config).await,
        Command::Upload {
            video,
            title,
            category,
            tags,
            description,
            thumbnail,
            comment,
            no_watermark,
            kids,
            ..
        } => {
            authenticate(&mut client, &config).await?;

            let mut draft = VideoMetadataDraft::new(title, category)
                .description(description)
                .tags(tags)
                .comment(comment)
                .watermark(!no_watermark)
                .kids_friendly(kids);
            if let Some(thumbnail) = thumbnail {
                draft = draft.thumbnail(thumbnail);
            }

            upload(&client, video, &draft).await
        }
    }
}

async fn download(
    client: &AparatClient,
    config: &Config,
    target: &str,
    path: Option<PathBuf>,
    highest: bool,
) -> Result<()> {
    let uid = parse_video_uid(target)?;
    let video = client.get_video(&uid).await?;
    print_video_summary(&video);

    let quality = if highest {
        Quality::Highest
    } else {
        Quality::Resolution(config.download.resolution.clone())
    };
    let path = path.or_else(|| config.download.directory.clone());

    let saved = client
        .download_video(&video, &quality, path.as_deref(), config.download.show_progress)
        .await?;

    print_success(&format!("Video path: {}", saved.display()));
    Ok(())
}

fn required_username(config: &Config) -> Result<String> {
    config
        .account
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::Config("A username is required (--username or [account] username)".into()))
}

async fn login(client: &mut AparatClient, config: &Config, save: bool) -> Result<()> {
    let username = required_username(config)?;
    let password = config
        .account
        .password
        .clone()
        .ok_or_else(|| Error::Config("A password is required (--password or APARAT_PASSWORD)".into()))?;

    let spinner = create_spinner(&format!("Logging in as {}...", username));
    let result = client.login(&username, &password).await;
    spinner.finish_and_clear();
    result?;

    print_success(&format!("Logged in as {}", username));

    if save {
        let path = client.save_session()?;
        print_info(&format!("Session saved to {}", path.display()));
    }

    Ok(())
}

/// Restore the saved session, falling back to a password login.
async fn authenticate(client: &mut AparatClient, config: &Config) -> Result<()> {
    let username = required_username(config)?;

    match client.load_session(&username).await {
        Ok(true) => {
            print_info(&format!("Restored session for {}", username));
            return Ok(());
        }
        Ok(false) => print_warning("Saved session was rejected by the server"),
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No saved session for {}", username);
        }
        Err(e) => return Err(e),
    }

    let Some(password) = config.account.password.as_deref() else {
        return Err(Error::LoginRequired);
    };

    client.login(&username, password).await?;
    let path = client.save_session()?;
    print_info(&format!("Session saved to {}", path.display()));
    Ok(())
}

async fn whoami(client: &mut AparatClient, config: &Config) -> Result<()> {
    let username = required_username(config)?;

    if !client.load_session(&username).await? {
        return Err(Error::LoginRequired);
    }

    match client.get_me().await? {
        Some(me) => print_profile(&me.attributes),
        None => print_warning("The server returned no profile for this session"),
    }
    Ok(())
}

async fn upload(client: &AparatClient, video: PathBuf, draft: &VideoMetadataDraft) -> Result<()> {
    print_info(&format!(
        "Uploading {} (category {} [{}], comments: {})",
        video.display(),
        draft.category,
        draft.category.code(),
        draft.comment
    ));

    let spinner = create_spinner("Uploading...");
    let result = client.upload_video(&video, draft).await;
    spinner.finish_and_clear();
    let uploaded = result?;

    let attrs = &uploaded.attributes;
    print_success(&format!(
        "Uploaded '{}' ({})",
        attrs.title.as_deref().unwrap_or(&draft.title),
        attrs.url.as_deref().or(attrs.uid.as_deref()).unwrap_or("pending")
    ));
    Ok(())
}
