#[macro_use]
mod logging;

mod api;
mod app;
mod auth;
mod config;
mod session;
mod terminal;
mod ui;

use anyhow::Result;
use app::{App, InputMode};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::time::Duration;

/// Glimpse - a keyboard-driven terminal client for the Glimpse photo feed
#[derive(Parser)]
#[command(name = "glimpse")]
#[command(about = "Browse the Glimpse feed from your terminal")]
#[command(version)]
struct Cli {
    /// Server URL to connect to
    #[arg(long, short, env = "GLIMPSE_SERVER_URL")]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

// Load environment variables from .env file
// This allows GLIMPSE_SERVER_URL and other config to be set without
// command-line args
fn load_env() {
    let _ = dotenv::dotenv();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    load_env();

    // Initialize logging system
    let log_config = if cli.verbose {
        logging::LogConfig::verbose()
    } else {
        logging::LogConfig::default()
    };
    logging::init_logging(&log_config)?;

    // Determine server URL based on CLI args, env vars, and defaults
    let server_url = config::determine_server_url(cli.server);
    log::info!("Using server {}", server_url);

    // Credentials are written by the login flow; the feed only reads them
    let session_store = session::SessionStore::new()?;
    let mut api_client = api::ApiClient::new(server_url);
    match session_store.load_token() {
        Ok(Some(token)) => {
            log::info!("Restored session token from storage");
            api_client.set_session_token(Some(token));
        }
        Ok(None) => {
            log::info!("No stored session; browsing unauthenticated");
        }
        Err(e) => {
            log::warn!("Failed to read session storage: {}", e);
        }
    }

    let mut tui = terminal::init()?;

    let mut app = App::new(api_client, session_store);
    app.log_config = log_config;

    // Let the first frame render the loading screen, then load
    app.request_reload();

    // Main event loop
    while app.running {
        tui.draw(|frame| ui::render(&mut app, frame))?;

        // Perform a pending load after the UI has rendered the loading state
        if app.feed.pending_load {
            app.feed.pending_load = false;
            app.load_feed().await?;
        }

        // Handle events with timeout
        if event::poll(Duration::from_millis(100))? {
            let event = event::read()?;

            // Keyboard-only navigation
            if matches!(event, Event::Mouse(_)) {
                continue;
            }

            if let Event::Key(key) = event {
                if key.kind == KeyEventKind::Press {
                    log_key_event!(
                        app.log_config,
                        "key={:?}, modal_open={}",
                        key.code,
                        app.composer.is_open()
                    );

                    match key.code {
                        // Like persistence is the one async interaction
                        KeyCode::Char('l')
                            if app.input_mode == InputMode::Navigation && !app.feed.loading =>
                        {
                            app.toggle_selected_like().await?;
                        }
                        _ => {
                            app.handle_key_event(key)?;
                        }
                    }
                }
            }
        }
    }

    // Restore terminal
    terminal::restore()?;

    Ok(())
}
