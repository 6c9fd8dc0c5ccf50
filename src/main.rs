use anyhow::Result;
use clap::Parser;
use plant_cart::{cli::{Args, CliApp}, utils::Config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let config = Config::from_env()
        .and_then(|config| config.with_overrides(args.catalog.clone(), args.command.cart_path()));

    // RUST_LOG still wins unless --verbose was given
    let level = match &config {
        Ok(config) => config.log_filter(args.verbose),
        Err(_) => Config::default().log_filter(args.verbose),
    };
    let filter = if args.verbose {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("🌿 Plant cart starting...");

    let config = config.map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    tracing::info!("Config: successfully loaded for {} environment", config.environment);

    let mut app = CliApp::new(&config)?;
    app.run(args.command)?;

    tracing::info!("🌿 Plant cart stopped");
    Ok(())
}
