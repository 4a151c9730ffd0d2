mod bootstrap;
mod config;
mod error;
mod ledger;
mod store;
mod submitter;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,crowdsale_registrar=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("starting crowdsale registrar");

    dotenv::dotenv().ok();
    let config = Config::load()?;

    let scheduler = bootstrap::start(&config).await?;

    // The scheduler loop never returns; a join error here means it panicked.
    scheduler.await?;

    Ok(())
}
