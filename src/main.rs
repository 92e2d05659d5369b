//! sfinweb main entry point

use anyhow::Context;
use clap::Parser;
use sfinweb_api::start_server;
use sfinweb_client::SfinappClient;
use sfinweb_config::Config;
use sfinweb_core::memory::InMemoryBackend;
use sfinweb_core::Services;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "sfinweb")]
#[command(version = "0.1.0")]
#[command(about = "Web front-end for the sfinapp personal finance tracker", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Serve a seeded in-memory backend instead of the sfinapp service
    #[arg(long)]
    demo: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    // RUST_LOG wins; otherwise the level comes from the config file,
    // which is read with only warnings enabled
    let env_filter = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace")).init();
    if !env_filter {
        log::set_max_level(log::LevelFilter::Warn);
    }

    let config = Config::load_or_default(&args.config)
        .map_err(|e| anyhow::anyhow!("{}", e.to_details()))
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    if !env_filter {
        log::set_max_level(config.logging.level_filter());
    }

    let services = if args.demo {
        log::info!("Demo mode: using the in-memory backend");
        let backend = InMemoryBackend::seeded().with_suggest_limit(config.suggest.limit);
        Services::from_backend(Arc::new(backend))
    } else {
        log::info!("Using sfinapp service at {}", config.api.base_url);
        let client = SfinappClient::from_config(&config)
            .context("Failed to create the sfinapp client")?;
        Services::from_backend(Arc::new(client))
    };

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, services))
        .context("Server failed")?;

    Ok(())
}
