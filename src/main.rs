use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cast_gateway::{Config, Daemon};

/// castd - discovery and casting gateway for networked media displays
#[derive(Parser)]
#[command(name = "castd", version, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "CAST_CONFIG", default_value = "cast-gateway.toml")]
    config: PathBuf,

    /// Port to listen on (overrides the configuration file)
    #[arg(long)]
    port: Option<u16>,

    /// Directory of static frontend assets (overrides the configuration file)
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,cast_gateway=info",
        1 => "info,cast_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(Some(&cli.config))?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(static_dir) = cli.static_dir {
        config.static_dir = Some(static_dir);
    }

    tracing::debug!(?config, "loaded configuration");
    tracing::info!(
        port = config.port,
        service_type = %config.service_type,
        "starting cast gateway"
    );

    Daemon::new(config).run().await?;

    Ok(())
}
