use std::time::Duration;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use queueseed::{
    cli,
    config::{self, Credentials, Endpoints},
    error,
    seeder::{DEFAULT_SLEEP_INTERVAL, RepeatCount, SeederOptions},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API (replaces any cached token)
    Auth,

    /// Print the next track in the playback queue
    Next,

    /// Show the current track and the playlist it plays from
    Current,

    /// List the tracks of the playlist currently playing
    Tracks,

    /// Add recommended tracks to a playlist
    Seed(SeedOptions),

    /// List genres usable as recommendation seeds
    Genres,

    /// List the permission scopes Spotify knows about
    Scopes,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SeedOptions {
    /// Playlist id, URI or link to add tracks to
    pub playlist: String,

    /// Seed track id, URI or link; repeat for up to 5 seeds
    #[clap(long = "seed", required = true, num_args = 1)]
    pub seeds: Vec<String>,

    /// Number of sweeps to run; omit (or "once") to add a single batch
    #[clap(long, default_value = "once", value_parser = parse_repeat)]
    pub repeat: RepeatCount,

    /// Seconds to wait between sweeps
    #[clap(long, default_value_t = DEFAULT_SLEEP_INTERVAL.as_secs())]
    pub sleep: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn parse_repeat(raw: &str) -> Result<RepeatCount, String> {
    raw.parse::<RepeatCount>().map_err(|e| e.to_string())
}

fn credentials() -> Credentials {
    match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => error!("Cannot load credentials. Err: {}", e),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let endpoints = Endpoints::from_env();

    match cli.command {
        Command::Auth => cli::auth(&credentials(), &endpoints).await,
        Command::Next => cli::next(&credentials(), &endpoints).await,
        Command::Current => cli::current(&credentials(), &endpoints).await,
        Command::Tracks => cli::tracks(&credentials(), &endpoints).await,
        Command::Seed(opt) => {
            let options = SeederOptions {
                repeat: opt.repeat,
                sleep_interval: Duration::from_secs(opt.sleep),
            };
            cli::seed(&credentials(), &endpoints, &opt.playlist, &opt.seeds, options).await
        }
        Command::Genres => cli::genres(&credentials(), &endpoints).await,
        Command::Scopes => cli::scopes(),
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
