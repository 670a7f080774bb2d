//! services/client/src/bin/coursebook.rs

use clap::Parser;
use client_lib::{
    adapters::{credential_store, HttpGateway},
    cli::{self, Cli, Context},
    config::Config,
    error::AppError,
};
use coursebook_core::{ChatBackend, SessionStore};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!("Configuration loaded: {:?}", config);

    // --- 2. Initialize Adapters ---
    let gateway = Arc::new(HttpGateway::with_timeout(
        &config.api_base_url,
        config.request_timeout,
    )?);
    let credentials = credential_store(config.credentials_dir.as_deref());

    let chat_backend = match &config.chat_api_base_url {
        Some(url) => ChatBackend::Live(Arc::new(HttpGateway::with_timeout(
            url,
            config.request_timeout,
        )?)),
        None => {
            info!("No chat endpoint configured; the assistant runs in demo mode.");
            ChatBackend::Demo {
                delay: config.chat_demo_delay,
            }
        }
    };

    // --- 3. Restore the Session ---
    let session = SessionStore::new(gateway, credentials);
    if cli.command.needs_session() {
        let status = session.initialize().await;
        debug!(?status, "Session restored.");
    }

    // --- 4. Run the Command ---
    let ctx = Context {
        session,
        chat_backend,
        json: cli.json,
    };
    let mut stdout = std::io::stdout();
    cli::run(cli.command, &ctx, &mut stdout).await
}
