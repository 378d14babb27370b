//! Kopilka main entry point

use anyhow::Context;
use clap::Parser;
use kopilka_api::start_server;
use kopilka_config::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kopilka")]
#[command(version = "0.1.0")]
#[command(about = "A small personal-finance web interface", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn init_logger(config: &Config) {
    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let loaded = Config::load_optional(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    let config_found = loaded.is_some();
    let config = loaded.unwrap_or_default();
    init_logger(&config);
    if !config_found {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }

    log::info!(
        "Config loaded: listening on {}, demo data {}",
        config.bind_addr(),
        if config.data.seed_demo { "on" } else { "off" }
    );

    start_server(config).await
}
