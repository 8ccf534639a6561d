use anyhow::{Context, Result};
use bridge_desktop::ReqwestHttpClient;
use clap::Parser;
use core_runtime::config::{Credentials, PlannerConfig, SyncConfig, DEFAULT_IMAGE_BASE_URL};
use core_runtime::logging::{init_logging, LoggingConfig};
use provider_jwplayer::JwPlatformConnector;
use sms_sync_cli::cli::{Cli, Command};
use sms_sync_cli::{commands, exit_code};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// Credentials, HTTP client and connector for commands that talk to the platform
fn connect() -> Result<(SyncConfig, Arc<JwPlatformConnector>)> {
    let config = SyncConfig::builder()
        .credentials(Credentials::from_env().context("Failed to load platform credentials")?)
        .build()
        .context("Invalid configuration")?;

    let http_client = Arc::new(ReqwestHttpClient::new().context("Failed to create HTTP client")?);
    let connector = Arc::new(JwPlatformConnector::new(
        http_client,
        config.credentials.clone(),
        config.api_base_url.clone(),
    ));
    Ok((config, connector))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Fetch { kind, base_name } => {
            let (config, connector) = connect()?;
            let written =
                commands::fetch(connector.as_ref(), kind.into(), &base_name, &config.backoff)
                    .await?;
            info!(files = written.len(), "Fetch complete");
        }
        Command::GenUpdateJob {
            target,
            csv,
            metadata,
            base,
            base_image_url,
            strip_leading,
            output,
        } => {
            let config = PlannerConfig::new(base.unwrap_or_default())
                .with_image_base_url(base_image_url.unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()))
                .with_strip_leading(strip_leading);
            config.validate().context("Invalid planner options")?;

            let outcome = commands::plan(target, &csv, &metadata, config)?;
            commands::write_jobs(&outcome.jobs, output.as_deref())?;
        }
        Command::ApplyUpdateJob { update, log_file } => {
            let jobs = commands::read_jobs(update.as_deref())?;
            let (config, connector) = connect()?;
            let log = commands::apply(connector, config.backoff, &jobs, log_file.as_deref()).await?;
            info!(jobs = jobs.len(), failures = log.failures(), "Job file applied");
        }
        Command::Tidy { metadata, output } => {
            let jobs = commands::tidy(&metadata)?;
            commands::write_jobs(&jobs, output.as_deref())?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_logging(LoggingConfig::default().verbose(cli.verbose)) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}
