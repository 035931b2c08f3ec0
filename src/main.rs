use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use setlistify::{cli, config, error};

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
    /// Authorize with Spotify API
    Auth,

    /// Show a setlist from setlist.fm
    Setlist(SetlistOptions),

    /// Create a Spotify playlist from a setlist
    Import(ImportOptions),

    /// Search Spotify for a track
    Search(SearchOptions),

    /// Show a Spotify track
    Track(TrackOptions),

    /// Show the signed-in Spotify user
    Me,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SetlistOptions {
    /// setlist.fm setlist id (the hex token at the end of the setlist URL)
    setlist_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ImportOptions {
    /// setlist.fm setlist id
    setlist_id: String,

    /// Playlist name (defaults to "<artist> @ <venue> (<date>)")
    #[clap(long)]
    name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Track title
    #[clap(long)]
    title: String,

    /// Restrict to an artist
    #[clap(long)]
    artist: Option<String>,

    /// Number of results
    #[clap(long, default_value_t = 5)]
    limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    /// Spotify track id
    track_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!(
            "Invalid configuration: {}\nSee {} for an example.",
            e,
            config::data_dir().join(".env.example").display()
        ),
    };

    match cli.command {
        Command::Auth => cli::auth(&config).await,
        Command::Setlist(opt) => cli::setlist(&config, opt.setlist_id).await,
        Command::Import(opt) => cli::import(&config, opt.setlist_id, opt.name).await,
        Command::Search(opt) => cli::search(&config, opt.title, opt.artist, opt.limit).await,
        Command::Track(opt) => cli::track(&config, opt.track_id).await,
        Command::Me => cli::me(&config).await,
        Command::Completions(_) => {}
    }
}
