//! Spotify queue and playlist seeding library
//!
//! This library backs the `queueseed` command-line tool. It bootstraps an
//! authorized Spotify session, peeks at the next entry of the playback queue
//! and fills a playlist with recommendations grown from a handful of seed
//! tracks.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local authorization callback server
//! - `cli` - Command-line command implementations
//! - `config` - Credentials, endpoints and environment loading
//! - `error` - Crate error types
//! - `management` - Token cache management
//! - `queue` - Playback queue and currently playing helpers
//! - `scopes` - Catalog of Spotify permission scopes
//! - `seeder` - Recommendation driven playlist seeding loop
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client and session bootstrap
//! - `types` - Data structures and wire types
//! - `utils` - Small helpers
//!
//! # Example
//!
//! ```
//! use queueseed::{config, queue, spotify};
//!
//! #[tokio::main]
//! async fn main() -> queueseed::Res<()> {
//!     config::load_env().await?;
//!     let credentials = config::Credentials::from_env()?;
//!     let client = spotify::auth::create_session(&credentials, &config::Endpoints::from_env()).await?;
//!     println!("Next in queue: {}", queue::get_next_in_queue(&client).await);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod queue;
pub mod scopes;
pub mod seeder;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible library function returns this alias so that errors can be
/// propagated with `?` up to the command layer, which decides how to report
/// them.
///
/// # Example
///
/// ```
/// use queueseed::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Starting authentication process...");
/// info!("Requested {} tracks", count);
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
/// Only meant for the binary's top level: the program terminates with exit
/// code 1 right after printing.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a stale token cache or the diagnostic
/// trace of a failed queue peek.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
