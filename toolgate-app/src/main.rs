use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use toolgate_app::{bootstrap, logging, server, Config};

#[derive(Debug, Parser)]
#[command(name = "toolgate", version, about = "User management over a tool gateway")]
struct Args {
    /// Path to the YAML config file.
    #[arg(short, long, env = "TOOLGATE_CONFIG", default_value = "toolgate.yaml")]
    config: PathBuf,

    /// Listen address, overriding `server.bind`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?.with_env_overrides();
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    config.validate()?;

    logging::init(&config.logging).context("Failed to initialize logging")?;

    let addr = config.bind_addr()?;
    let state = bootstrap::build_state(&config).await?;

    server::serve(addr, state, shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
