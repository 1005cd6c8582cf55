//! Console output utilities.

use console::style;

use crate::api::types::UserAttributes;
use crate::resources::video::Video;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     aparat                                            ║
║     Command-line client for Aparat                    ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

fn field(label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        println!("  {:<12} {}", style(label).dim(), value);
    }
}

/// Print a user profile.
pub fn print_profile(user: &UserAttributes) {
    println!();
    println!("{}", style("Profile:").bold());
    field("Username", user.username.as_deref());
    field("Name", user.name.as_deref());
    field("Email", user.email.as_deref());
    field("Followers", user.follower_cnt.map(|n| n.to_string()).as_deref());
    field("Videos", user.video_cnt.map(|n| n.to_string()).as_deref());
    field("URL", user.url.as_deref());
    println!();
}

/// Print the headline fields of a video and its available renditions.
pub fn print_video_summary(video: &Video) {
    let attrs = &video.attributes;
    println!();
    println!(
        "{} {}",
        style("Video:").bold(),
        attrs.title.as_deref().unwrap_or("(untitled)")
    );
    field("Uid", attrs.uid.as_deref());
    field("Owner", attrs.owner_username.as_deref());
    field("Duration", attrs.duration.as_deref());
    field("Visits", attrs.visit_cnt.as_deref());

    let profiles: Vec<&str> = attrs
        .file_link_all
        .iter()
        .map(|l| l.profile.as_str())
        .collect();
    if !profiles.is_empty() {
        field("Qualities", Some(&profiles.join(", ")));
    }
    println!();
}
