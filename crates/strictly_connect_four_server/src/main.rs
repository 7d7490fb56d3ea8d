//! Connect-Four - unified CLI
//!
//! Gateway server, one-shot solver and terminal game against an external oracle.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use strictly_connect_four::{
    FirstMover, MoveRequest, MoveResult, Oracle, SearchBudget, TurnCoordinator, classify_reply,
};
use strictly_connect_four_server::cli::{Cli, Command};
use strictly_connect_four_server::{GatewayConfig, HttpOracle, ProcessOracle, play, router};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,strictly_connect_four=debug,strictly_connect_four_server=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Serve { port, host } => run_server(&cli.config, host, port).await,
        Command::Solve {
            game,
            next_player,
            num_try,
        } => run_solve(&cli.config, &game, &next_player, num_try.as_deref()).await,
        Command::Play {
            first,
            num_try,
            server_url,
        } => run_play(&cli.config, first.into(), num_try, server_url).await,
    }
}

/// Installs the tracing subscriber. Logs go to stderr so stdout carries
/// only command output.
fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the HTTP gateway
#[instrument(skip(config_path), fields(config_path = %config_path.display()))]
async fn run_server(config_path: &Path, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = GatewayConfig::load(config_path)?;

    let host = host.unwrap_or_else(|| config.server().host().clone());
    let port = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(*config.server().port());

    info!(
        program = %config.oracle().program(),
        timeout_ms = config.oracle().timeout_ms(),
        "Starting Connect-Four gateway"
    );

    let app = router(ProcessOracle::new(config.oracle().clone()));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("Server ready at http://{}:{}/", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Run one validated oracle round trip
#[instrument(skip(config_path))]
async fn run_solve(
    config_path: &Path,
    game: &str,
    next_player: &str,
    num_try: Option<&str>,
) -> Result<()> {
    let config = GatewayConfig::load(config_path)?;
    let request =
        MoveRequest::from_wire_or(game, next_player, num_try, config.oracle().search_budget()?)?;

    let oracle = ProcessOracle::new(config.oracle().clone());
    let reply = oracle.run(&request).await?;
    if !reply.stderr().is_empty() {
        warn!(stderr = %reply.stderr(), "Oracle wrote diagnostics");
    }

    match classify_reply(reply.stdout(), oracle.sentinels())? {
        MoveResult::BoardUpdate(_) => info!("Oracle moved"),
        MoveResult::TerminalOutcome(outcome) => info!(%outcome, "Oracle reported game over"),
    }
    println!("{}", reply.stdout());

    Ok(())
}

/// Play a game in the terminal
#[instrument(skip(config_path))]
async fn run_play(
    config_path: &Path,
    first: FirstMover,
    num_try: Option<u32>,
    server_url: Option<String>,
) -> Result<()> {
    let config = GatewayConfig::load(config_path)?;
    let budget = match num_try {
        Some(n) => SearchBudget::new(n)?,
        None => config.oracle().search_budget()?,
    };

    let oracle: Box<dyn Oracle> = match server_url {
        Some(url) => {
            info!(url = %url, "Using remote gateway");
            Box::new(HttpOracle::new(
                url,
                config.oracle().sentinel_table(),
                config.oracle().timeout(),
            ))
        }
        None => Box::new(ProcessOracle::new(config.oracle().clone())),
    };

    let coordinator = TurnCoordinator::new(oracle).with_budget(budget);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let state = play(&coordinator, first, stdin, tokio::io::stdout()).await?;

    info!(phase = ?state.phase(), "Session ended");
    Ok(())
}
