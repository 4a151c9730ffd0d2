use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::ledger::rpc::RpcLedgerClient;
use crate::store::repository::RegistrantRepository;
use crate::submitter::{SubmissionMachine, SubmitterConfig, TickScheduler};

/// Wire up the store, the ledger client and the submission scheduler.
pub async fn start(config: &Config) -> AppResult<JoinHandle<()>> {
    let pool = initialize_database(&config.database_url).await?;

    let store = Arc::new(RegistrantRepository::new(pool));
    let ledger = Arc::new(RpcLedgerClient::new(
        config.node_rpc_url.clone(),
        config.wallet_path.clone(),
    ));

    info!(
        network = %config.network,
        contract = %config.contract_hash,
        batch_size = config.batch_size,
        "submitter configured"
    );

    let machine = SubmissionMachine::new(SubmitterConfig::from(config), store, ledger);
    Ok(TickScheduler::new(config.tick_seconds, machine).start())
}

async fn initialize_database(database_url: &str) -> AppResult<PgPool> {
    info!("connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await?;

    info!("running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("database initialized");
    Ok(pool)
}
