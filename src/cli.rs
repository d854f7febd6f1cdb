use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::info;
use spotify_insights::app::{App, AppState, Navigation};
use spotify_insights::clients::{ApiClient, LocalStorage, errors::Result};
use spotify_insights::config::{Config, ConfigBuilder};
use spotify_insights::server;

#[derive(Parser)]
#[command(name = "spotify-insights")]
#[command(version, about = "Log in with Spotify and browse your top tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the authorization URL to open in a browser
    Login,
    /// Consume the redirect URL the authorization flow sent you to
    Callback {
        /// Full URL including the `access_token` query parameter
        url: String,
    },
    /// Show your top tracks using the stored token
    TopTracks,
    /// Serve the page on the configured address
    Serve,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigBuilder::new().build()?;

    match cli.command {
        Commands::Login => login(&config).await,
        Commands::Callback { url } => show_tracks(&config, Navigation::parse(&url)?).await,
        Commands::TopTracks => show_tracks(&config, home(&config)?).await,
        Commands::Serve => server::serve(config).await,
    }
}

fn home(config: &Config) -> Result<Navigation> {
    Navigation::parse(&format!("http://{}/", config.bind_address))
}

async fn build_app(config: &Config) -> Result<App<ApiClient, LocalStorage>> {
    info!("Opening local storage ...");
    let storage = Arc::new(LocalStorage::open(&config.storage_path).await?);
    let backend = Arc::new(ApiClient::from_config(config));
    Ok(App::new(backend, storage))
}

async fn login(config: &Config) -> Result<()> {
    let app = build_app(config).await?;
    let mut navigation = home(config)?;
    app.login(&mut navigation).await;
    match navigation.assigned() {
        Some(url) => println!("Open this URL in your browser to log in:\n{url}"),
        None => println!("Could not reach the authorization endpoint. Run with RUST_LOG=error for details."),
    }
    Ok(())
}

async fn show_tracks(config: &Config, mut navigation: Navigation) -> Result<()> {
    let mut app = build_app(config).await?;
    app.mount(&mut navigation).await;
    print!("{}", format_tracks(app.state()));
    Ok(())
}

fn format_tracks(state: &AppState) -> String {
    if !state.is_logged_in {
        return "Not logged in. Run `spotify-insights login` first.\n".to_string();
    }
    state
        .top_tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "{:>2}. {} - {} (From: {})\n",
                i + 1,
                t.name,
                t.artist_names(),
                t.album.name
            )
        })
        .collect()
}
