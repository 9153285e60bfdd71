//! esimly-tui -- terminal front-end for the esimly storefront backend.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use esimly_config::FileVault;
use esimly_core::session::SessionStore;
use esimly_core::{ApiClient, Portal};

/// Terminal UI for the esimly retailer storefront and admin back-office.
#[derive(Debug, Parser)]
#[command(name = "esimly-tui", version)]
struct Args {
    /// Backend profile to use (e.g. production, development)
    #[arg(long, short = 'p', env = "ESIMLY_PROFILE")]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tui::install_hooks()?;
    init_file_logging();

    let config = esimly_config::load_config_or_default();
    let (profile_name, profile) =
        esimly_config::resolve_profile(&config, args.profile.as_deref())
            .map_err(|e| eyre!("{e}"))?;

    let base_url = esimly_config::profile_api_url(profile).map_err(|e| eyre!("{e}"))?;
    let transport = esimly_config::profile_transport(profile, &config.defaults);
    let api = Arc::new(ApiClient::new(base_url, &transport).map_err(|e| eyre!("{e}"))?);

    let vault = FileVault::new(profile_name);
    let session = Arc::new(SessionStore::new(Arc::clone(&api), Box::new(vault)));
    // Optimistic rehydration: a persisted session shows its screens
    // immediately; the data bridge runs the correcting probe.
    session.hydrate();

    let portal = Portal::new(api, session);
    let mut app = app::App::new(portal, profile.storefront_origin.clone());
    app.run().await
}

/// The TUI owns the terminal, so tracing goes to a file under the state
/// directory instead of stderr.
fn init_file_logging() {
    let log_dir = directories_fallback();
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }

    let appender = tracing_appender::rolling::daily(log_dir, "esimly-tui.log");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(appender)
        .with_ansi(false)
        .init();
}

fn directories_fallback() -> std::path::PathBuf {
    esimly_config::config_path()
        .parent()
        .map_or_else(|| std::path::PathBuf::from("."), |p| p.join("logs"))
}
