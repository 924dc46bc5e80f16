use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use spotify_web_api::auth::TokenStore;
use spotify_web_api::types::{
    DeviceList, LibraryOptions, RecentlyPlayedOptions, SearchOptions, ShuffleState, UserProfile,
};
use spotify_web_api::{AccessToken, ApiClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "spotify-web",
    version,
    about = "Spotify Web API remote control"
)]
struct Cli {
    /// Access token (overrides the saved token)
    #[arg(long, global = true, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Debug logging (ignored when `RUST_LOG` is set)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save an access token
    Login {
        /// OAuth access token
        #[arg(value_name = "TOKEN", required_unless_present = "check")]
        access_token: Option<String>,
        /// Check the active token (`--token`, env or saved) against `/me`
        #[arg(long)]
        check: bool,
    },
    /// Remove the saved token
    Logout,
    /// List available devices
    Devices,
    /// Show the current playback context
    Status,
    /// Show the currently playing item
    NowPlaying,
    /// Show recently played tracks
    Recent {
        #[arg(short, long)]
        limit: Option<u32>,
        /// Unix timestamp in ms; only items after it
        #[arg(long, conflicts_with = "before")]
        after: Option<u64>,
        /// Unix timestamp in ms; only items before it
        #[arg(long)]
        before: Option<u64>,
    },
    /// Transfer playback to a device
    Transfer {
        device: String,
        /// Start playing on the new device
        #[arg(long)]
        play: bool,
    },
    /// Start playback, optionally from a context URI
    Play {
        device: String,
        /// Album, artist or playlist URI
        #[arg(short, long)]
        context: Option<String>,
    },
    /// Resume playback
    Resume { device: String },
    /// Pause playback
    Pause { device: String },
    /// Seek to a position in the current item
    Seek { device: String, position_ms: u64 },
    /// Skip to the next track
    Next { device: String },
    /// Skip to the previous track
    Previous { device: String },
    /// Set volume (0-100)
    Volume { device: String, percent: u8 },
    /// Set repeat mode (track, context, off)
    Repeat { device: String, state: String },
    /// Set shuffle (true, false)
    Shuffle { device: String, state: String },
    /// Add an item to the queue
    Queue { device: String, uri: String },
    /// Search the catalog
    Search {
        keywords: String,
        /// Item type(s): album, artist, playlist, track, show, episode
        #[arg(short = 't', long = "type", default_value = "track")]
        types: Vec<String>,
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        market: Option<String>,
    },
    /// List saved items (albums, shows, tracks)
    Saved {
        item: String,
        #[arg(short, long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Check whether items are saved
    Contains {
        item: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Save items to the library
    Save {
        item: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show the current user
    Me,
    /// Show another user's public profile
    User { user_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Login {
            access_token,
            check,
        } => cmd_login(access_token, cli.token, check).await,
        Command::Logout => cmd_logout(),
        command => {
            let api = client(cli.token)?;
            run(&api, command).await
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "spotify_web=debug,spotify_web_api=debug,web_playback=debug,warn"
    } else {
        "spotify_web=info,spotify_web_api=info,web_playback=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `--token` / `SPOTIFY_ACCESS_TOKEN` first, then the token store.
fn resolve_token(token: Option<String>) -> Result<Option<AccessToken>> {
    if let Some(t) = token.filter(|t| !t.is_empty()) {
        return Ok(Some(AccessToken::from(t)));
    }
    tracing::debug!("No --token given, reading the token store");
    Ok(TokenStore::load()?.token())
}

fn client(token: Option<String>) -> Result<ApiClient> {
    let token = resolve_token(token)?
        .context("no access token; pass --token, set SPOTIFY_ACCESS_TOKEN or run `login`")?;
    Ok(ApiClient::new(token)?)
}

async fn run(api: &ApiClient, command: Command) -> Result<()> {
    let player = api.player();
    let out = match command {
        Command::Devices => return cmd_devices(api).await,
        Command::Me => return print_profile(api.users().current_user_profile().await?),
        Command::User { user_id } => return print_profile(api.users().user_profile(&user_id).await?),
        Command::Status => player.current_playback().await?,
        Command::NowPlaying => player.currently_playing().await?,
        Command::Recent {
            limit,
            after,
            before,
        } => {
            player
                .recently_played(RecentlyPlayedOptions {
                    limit,
                    after,
                    before,
                })
                .await?
        }
        Command::Transfer { device, play } => player.transfer_playback(&device, play).await?,
        Command::Play { device, context } => {
            player.start_playback(&device, context.as_deref()).await?
        }
        Command::Resume { device } => player.resume_playback(&device).await?,
        Command::Pause { device } => player.pause_playback(&device).await?,
        Command::Seek {
            device,
            position_ms,
        } => player.seek_position(&device, position_ms).await?,
        Command::Next { device } => player.next_track(&device).await?,
        Command::Previous { device } => player.previous_track(&device).await?,
        Command::Volume { device, percent } => player.set_volume(&device, percent).await?,
        Command::Repeat { device, state } => player.set_repeat(&device, state).await?,
        Command::Shuffle { device, state } => {
            let state: ShuffleState = state.parse()?;
            player.set_shuffle(&device, state).await?
        }
        Command::Queue { device, uri } => player.add_to_queue(&device, &uri).await?,
        Command::Search {
            keywords,
            types,
            limit,
            offset,
            market,
        } => {
            let options = SearchOptions {
                limit,
                offset,
                market,
                include_external: None,
            };
            api.search().query(&keywords, types, options).await?
        }
        Command::Saved {
            item,
            limit,
            offset,
        } => {
            let options = LibraryOptions {
                limit,
                offset,
                market: None,
            };
            api.library().get_saved(item, options).await?
        }
        Command::Contains { item, ids } => {
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            api.library().contains(item, &ids).await?
        }
        Command::Save { item, ids } => {
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            api.library().save(item, &ids).await?
        }
        Command::Login { .. } | Command::Logout => {
            anyhow::bail!("login/logout do not take an API client")
        }
    };
    print_json(&out)
}

// ── login / logout ──

async fn cmd_login(access_token: Option<String>, global: Option<String>, check: bool) -> Result<()> {
    if check {
        let Some(token) = resolve_token(global)? else {
            println!("Not logged in.");
            return Ok(());
        };
        let api = ApiClient::new(token)?;
        match api.users().current_user_profile().await {
            Ok(profile) => {
                let profile: UserProfile = serde_json::from_value(profile)?;
                println!(
                    "Logged in as: {} (id={})",
                    profile.display_name.as_deref().unwrap_or("-"),
                    profile.id
                );
            }
            Err(e) => println!("Token validation failed: {e}"),
        }
        return Ok(());
    }

    let token = access_token.context("access token required")?;
    let store = TokenStore {
        access_token: Some(token),
    };
    store.save()?;
    println!("Token saved to {}.", TokenStore::path()?.display());
    Ok(())
}

fn cmd_logout() -> Result<()> {
    TokenStore::clear()?;
    println!("Token cleared.");
    Ok(())
}

// ── output ──

async fn cmd_devices(api: &ApiClient) -> Result<()> {
    let list: DeviceList = serde_json::from_value(api.player().devices().await?)
        .context("unexpected devices payload")?;
    if list.devices.is_empty() {
        println!("No devices available.");
    }
    for d in &list.devices {
        let marker = if d.is_active { "*" } else { " " };
        let volume = d
            .volume_percent
            .map_or_else(|| "-".to_owned(), |v| format!("{v}%"));
        println!(
            "{marker} [{}] {} ({}, volume {volume})",
            d.id.as_deref().unwrap_or("restricted"),
            d.name,
            d.kind,
        );
    }
    Ok(())
}

fn print_profile(value: Value) -> Result<()> {
    let p: UserProfile = serde_json::from_value(value).context("unexpected profile payload")?;
    println!("User:    {} (id={})", p.display_name.as_deref().unwrap_or("-"), p.id);
    println!("URI:     {}", p.uri);
    if let Some(product) = &p.product {
        println!("Product: {product}");
    }
    if let Some(country) = &p.country {
        println!("Country: {country}");
    }
    if let Some(image) = p.images.first() {
        println!("Avatar:  {}", image.url);
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    if value.is_null() {
        println!("OK");
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_check_sees_global_token() {
        let cli = Cli::try_parse_from(["spotify-web", "--token", "XYZ", "login", "--check"]).unwrap();
        assert_eq!(cli.token.as_deref(), Some("XYZ"));
        let Command::Login {
            access_token,
            check,
        } = cli.command
        else {
            panic!("expected login");
        };
        assert!(check);
        assert_eq!(access_token, None);
    }

    #[test]
    fn login_positional_is_the_token_to_save() {
        let cli = Cli::try_parse_from(["spotify-web", "login", "ABC"]).unwrap();
        let Command::Login { access_token, .. } = cli.command else {
            panic!("expected login");
        };
        assert_eq!(access_token.as_deref(), Some("ABC"));
    }

    #[test]
    fn explicit_token_wins_over_store() {
        let token = resolve_token(Some("XYZ".into())).unwrap().unwrap();
        assert_eq!(token.as_str(), "XYZ");
    }

    #[test]
    fn shuffle_argument_must_be_boolean_text() {
        assert_eq!("true".parse::<ShuffleState>().unwrap(), ShuffleState::On);
        assert!("yes".parse::<ShuffleState>().is_err());
    }
}
