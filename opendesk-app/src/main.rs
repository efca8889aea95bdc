use anyhow::Result;
use clap::Parser;
use opendesk_app::cli::{Cli, Commands};
use opendesk_app::doctor::DoctorReport;
use opendesk_app::logging::{self, LogConfig, LOG_ENV};
use opendesk_app::McpServer;
use opendesk_core::OpenerConfig;
use opendesk_executor::{CommandRunner, SystemRunner};
use opendesk_opener::Opener;
use std::sync::Arc;
use tracing::info;

async fn run_mcp_server(config: OpenerConfig, runner: Arc<dyn CommandRunner>) -> Result<()> {
    let opener = Arc::new(Opener::new(config, runner));
    info!(
        "Starting opendesk on {} (browser: {})",
        opener.platform(),
        opener.config().preferred_browser
    );

    let mut server = McpServer::new(opener);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server
        .run_until(stdin, tokio::io::stdout(), interrupted())
        .await
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn run_doctor(config: OpenerConfig, runner: Arc<dyn CommandRunner>) -> Result<()> {
    let platform = opendesk_core::Platform::detect();
    let report = DoctorReport::collect(platform, config, runner.as_ref()).await;
    print!("{}", report);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose && std::env::var(LOG_ENV).is_err() && std::env::var("RUST_LOG").is_err() {
        log_config = log_config.verbose();
    }
    logging::init(log_config);

    let config = OpenerConfig::from_env();
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());

    match cli.subcommand() {
        Commands::Serve => run_mcp_server(config, runner).await,
        Commands::Doctor => run_doctor(config, runner).await,
    }
}
