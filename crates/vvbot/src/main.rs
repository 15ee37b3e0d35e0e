//! vvbot binary.
//!
//! ```bash
//! vvbot --config ./config.yml
//! VVBOT_PROFILE=production NAPCAT_API_HOST=napcat vvbot --port 8081
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use vvbot::EventHandler;
use vvbot_runtime::VvRuntime;

#[derive(Parser)]
#[command(name = "vvbot", version, about = "QQ group bot that answers `vv <keywords>` with a picture")]
struct Cli {
    /// Configuration file (defaults to vvbot.yml / config.yml in the usual places)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile (overrides VVBOT_PROFILE)
    #[arg(short, long)]
    profile: Option<String>,

    /// Listen port (overrides server.port)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = VvRuntime::builder();
    if let Some(path) = &cli.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &cli.profile {
        builder = builder.profile(profile);
    }
    if let Some(port) = cli.port {
        builder = builder.port(port);
    }

    let runtime = builder.build().context("failed to load configuration")?;

    let handler = EventHandler::from_config(runtime.config())
        .context("failed to set up outbound HTTP clients")?;

    info!(mention = %vvbot_onebot::mention_code(&runtime.config().bot.qq), "Starting vvbot");
    runtime.run(Arc::new(handler)).await?;

    Ok(())
}
