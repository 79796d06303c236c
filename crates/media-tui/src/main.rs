mod action;
mod app;
mod app_state;
mod cli;
mod component;
mod components;
mod theme;
mod widgets;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use media_core::config::Config;
use media_core::{platform, FileManager, HttpRecordStore};

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;
    let log_path = platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    // Allow RUST_LOG override; default to debug for app code but keep the
    // HTTP client internals quiet.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("mediadex log: {}", log_path.display());

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {:#}", e);
        Config::default()
    });
    if let Some(url) = cli.server_url {
        config.service.base_url = url;
    }
    tracing::info!("mediadex starting against {}", config.service.base_url);

    let store = HttpRecordStore::new(&config.service).context("building the HTTP client")?;
    let mut files = FileManager::new(Arc::new(store), &config.collection);

    match cli.command {
        Some(command) => cli::run(command, &mut files).await,
        None => {
            let state = app_state::AppState::new(files, config.service.base_url.clone());
            app::App::new(state).run().await
        }
    }
}
