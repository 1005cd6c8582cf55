//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress bars

pub mod console;
pub mod progress;

pub use console::{
    print_banner, print_error, print_info, print_profile, print_success, print_video_summary,
    print_warning,
};
pub use progress::{create_download_bar, create_spinner};
