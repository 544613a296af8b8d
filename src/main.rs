use anyhow::Result;
use climatelens::{ClimateLensConfig, logging, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClimateLensConfig::load()?;
    logging::init(&config.logging)?;

    tracing::info!("Starting ClimateLens {}", climatelens::VERSION);
    web::run(&config).await
}
