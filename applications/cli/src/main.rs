//! Tunebox terminal front-end
//!
//! Browse the catalog, manage likes and run a listening session against a
//! Tunebox backend.

mod config;
mod repl;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunebox_client::TuneboxClient;
use tunebox_core::{CatalogService, Track, TrackFilter, TrackId, UserIdentity};
use tunebox_likes::LikeStateSynchronizer;
use tunebox_playback::{PlaybackSessionController, RepeatMode, ShuffleMode};

use crate::config::AppConfig;
use crate::repl::{format_time, Session};

#[derive(Parser)]
#[command(name = "tunebox")]
#[command(about = "Tunebox terminal player", long_about = None)]
struct Cli {
    /// Configuration file (default: ./tunebox.toml when present)
    #[arg(short, long, global = true, env = "TUNEBOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and print the session token
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// List catalog tracks
    Tracks {
        /// Search titles and artists
        #[arg(short, long, conflicts_with = "popular")]
        search: Option<String>,

        /// Most played tracks first
        #[arg(long)]
        popular: bool,
    },

    /// List liked tracks
    Liked,

    /// Toggle the like on a track
    Like {
        /// Track ID
        track_id: String,
    },

    /// Start an interactive listening session
    Play {
        /// Queue only tracks matching this search
        #[arg(short, long)]
        search: Option<String>,

        /// Repeat mode (overrides configuration)
        #[arg(long, value_enum)]
        repeat: Option<RepeatArg>,

        /// Start with shuffle on
        #[arg(long)]
        shuffle: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RepeatArg {
    None,
    One,
    All,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::None => RepeatMode::Off,
            RepeatArg::One => RepeatMode::One,
            RepeatArg::All => RepeatMode::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tunebox=warn,tunebox_playback=warn,tunebox_likes=warn,tunebox_client=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let client = TuneboxClient::new(config.server_config())?;

    match cli.command {
        Commands::Login { email, password } => {
            let login = client.login(&email, &password).await?;
            info!(user_id = %login.user.id, "Logged in");
            println!("Logged in as {}", login.user.username);
            println!("{}", login.token);
            println!("Export it to stay signed in: TUNEBOX_AUTH__TOKEN=<token>");
        }

        Commands::Tracks { search, popular } => {
            let filter = track_filter(search, popular);
            let tracks = client.list_tracks(&filter).await?;
            print_tracks(&tracks);
        }

        Commands::Liked => {
            let likes = likes_for(&client).await?;
            let tracks = likes.liked_tracks().await?;
            print_tracks(&tracks);
        }

        Commands::Like { track_id } => {
            let likes = likes_for(&client).await?;
            let id = TrackId::new(track_id);
            likes.refresh().await?;
            if likes.toggle_like(&id).await? {
                println!("Liked {}", id);
            } else {
                println!("Unliked {}", id);
            }
        }

        Commands::Play {
            search,
            repeat,
            shuffle,
        } => {
            let mut playback = config.playback.clone();
            if let Some(repeat) = repeat {
                playback.repeat = repeat.into();
            }
            if shuffle {
                playback.shuffle = ShuffleMode::On;
            }

            let tracks = client.list_tracks(&track_filter(search, false)).await?;
            if tracks.is_empty() {
                println!("No tracks");
                return Ok(());
            }

            let likes = if client.is_authenticated().await {
                let likes = likes_for(&client).await?;
                if let Err(e) = likes.refresh().await {
                    warn!(error = %e, "Could not load likes");
                }
                Some(Arc::new(likes))
            } else {
                None
            };

            let mut controller = PlaybackSessionController::new(Arc::new(client), playback);
            controller.load_queue(tracks);
            controller.drain_events();

            let mut session = Session::new(controller, likes, std::io::stdout());
            session.run(BufReader::new(tokio::io::stdin())).await?;
        }
    }

    Ok(())
}

fn track_filter(search: Option<String>, popular: bool) -> TrackFilter {
    match search {
        Some(query) => TrackFilter::Search(query),
        None if popular => TrackFilter::Popular,
        None => TrackFilter::All,
    }
}

async fn signed_in_user(client: &TuneboxClient) -> anyhow::Result<UserIdentity> {
    if !client.is_authenticated().await {
        bail!("Not logged in; run `tunebox login` and set TUNEBOX_AUTH__TOKEN");
    }
    client
        .current_user()
        .await
        .context("Session token was rejected; log in again")
}

async fn likes_for(client: &TuneboxClient) -> anyhow::Result<LikeStateSynchronizer> {
    let user = signed_in_user(client).await?;
    Ok(LikeStateSynchronizer::new(
        Arc::new(client.clone()),
        user.id,
    ))
}

fn print_tracks(tracks: &[Track]) {
    if tracks.is_empty() {
        println!("No tracks");
        return;
    }
    for track in tracks {
        println!(
            "{}  {} - {} [{}] {} plays",
            track.id,
            track.artist,
            track.title,
            format_time(track.duration()),
            track.play_count,
        );
    }
}
