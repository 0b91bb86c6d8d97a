//! formbot CLI and Slack HTTP server entry point.
//!
//! Binary name: `formbot`
//!
//! Loads `.env`, sets up tracing, reads `config.toml` from the data
//! directory, then either serves the Slack endpoints or runs a local
//! form-inspection command.

mod cli;
mod http;
mod state;

use std::path::Path;

use clap::Parser;
use clap_complete::generate;

use formbot_infra::config::{forms_dir, load_config};
use formbot_infra::filesystem::{JsonFormRepository, resolve_data_dir};
use formbot_infra::secret::Credentials;
use formbot_observe::tracing_setup::{LogOptions, filter_for_verbosity, init_tracing, shutdown_tracing};
use formbot_types::config::BotConfig;

use cli::{Cli, Commands, FormsAction};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&LogOptions {
        default_filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        json: cli.log_json,
        otel: cli.otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "formbot", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = load_config(&data_dir).await;
    let repo = JsonFormRepository::new(forms_dir(&config, &data_dir));

    let result = match cli.command {
        Commands::Serve { port, host } => serve(config, &data_dir, port, host).await,
        Commands::Forms { action } => match action {
            FormsAction::List { user } => cli::forms::list_forms(&repo, user.as_deref(), cli.json).await,
            FormsAction::Show { id } => cli::forms::show_form(&repo, &id, cli.json).await,
        },
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}

async fn serve(
    mut config: BotConfig,
    data_dir: &Path,
    port: Option<u16>,
    host: Option<String>,
) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(host) = host {
        config.host = host;
    }

    let credentials = Credentials::from_env()?;
    let state = AppState::init(&config, data_dir, credentials)?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, forms_dir = %forms_dir(&config, data_dir).display(), "formbot listening");

    println!(
        "  {} formbot listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
