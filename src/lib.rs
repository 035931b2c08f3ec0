//! Setlist to Spotify importer library
//!
//! This library turns a concert setlist published on setlist.fm into a Spotify
//! playlist. It authenticates against Spotify with the OAuth2
//! authorization-code grant, keeps the resulting credential fresh, and
//! reconciles the setlist's song titles into playlist tracks via search.
//!
//! # Modules
//!
//! - `api` - HTTP handler for the local OAuth redirect receiver
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Credential persistence and the playlist importer
//! - `server` - Local HTTP listener for the OAuth redirect
//! - `setlistfm` - setlist.fm lookup client
//! - `spotify` - Spotify token exchange and Web API client
//! - `tasks` - Background task runner with channel-based status reporting
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use setlistify::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> setlistify::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     cli::setlist(&config, "63de4613".to_string()).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod server;
pub mod setlistfm;
pub mod spotify;
pub mod tasks;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI plumbing where errors of different modules meet. The core
/// components use their own error enums and collapse them into `bool` or
/// `Option` at their public boundary.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Waiting for the Spotify redirect...");
/// info!("Found {} songs", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Only the command-line layer uses
/// this macro; library components report failures through their return values.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable failures: a missing credential file, a rejected API
/// call, a setlist song without a Spotify match.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
