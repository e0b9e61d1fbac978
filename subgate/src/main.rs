#![forbid(unsafe_code)]

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use subgate_lib::{config::load_from_path, proxy, telemetry};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Subdomain-routing edge gateway")]
struct Cli {
    /// Path to configuration TOML file
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "SUBGATE_CONFIG",
        default_value = "config/gateway.toml"
    )]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cfg = match load_from_path(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to load configuration from {}: {err}", cli.config.display());
            std::process::exit(1);
        }
    };

    if let Err(err) = telemetry::init_from_config(&cfg.logging) {
        eprintln!("failed to initialize logging: {err}");
        std::process::exit(1);
    }

    info!(
        listen = %cfg.listen,
        root_domain = %cfg.gateway.root_domain,
        environment = ?cfg.environment,
        "configuration loaded"
    );

    if let Err(err) = proxy::run(Arc::new(cfg)).await {
        error!(%err, "gateway exited with error");
        std::process::exit(1);
    }
}
