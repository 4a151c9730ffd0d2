use config::{Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Default number of ticks between loads of unapproved registrants.
const DEFAULT_LOAD_INTERVAL_TICKS: u64 = 5;
/// Default number of ticks to wait out a submitted registration transaction.
const DEFAULT_CONFIRMATION_TICKS: u64 = 5;
/// Default number of addresses submitted per `crowdsale_register` call.
const DEFAULT_BATCH_SIZE: usize = 6;
/// Default scheduler tick length in seconds.
const DEFAULT_TICK_SECONDS: u64 = 3;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Network the contract is deployed on ("mainnet", "testnet", "privnet").
    pub network: String,
    /// Script hash of the crowdsale contract (40 hex characters).
    pub contract_hash: String,
    /// JSON-RPC endpoint of the ledger node that hosts the wallet.
    pub node_rpc_url: String,
    /// Path of the wallet file opened by the node.
    pub wallet_path: String,
    pub database_url: String,
    #[serde(default = "default_load_interval_ticks")]
    pub load_interval_ticks: u64,
    #[serde(default = "default_confirmation_ticks")]
    pub confirmation_ticks: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,
    /// Query `crowdsale_status` for each batch after a successful submission.
    #[serde(default)]
    pub verify_after_submit: bool,
}

fn default_load_interval_ticks() -> u64 {
    DEFAULT_LOAD_INTERVAL_TICKS
}

fn default_confirmation_ticks() -> u64 {
    DEFAULT_CONFIRMATION_TICKS
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_tick_seconds() -> u64 {
    DEFAULT_TICK_SECONDS
}

impl Config {
    /// Load configuration from the JSON file named by `REGISTRAR_CONFIG`
    /// (default `registrar.json`), layered under `REGISTRAR_*` environment
    /// overrides. `DATABASE_URL` wins over both when set.
    pub fn load() -> AppResult<Self> {
        let path =
            std::env::var("REGISTRAR_CONFIG").unwrap_or_else(|_| "registrar.json".to_string());

        let mut cfg: Config = config::Config::builder()
            .add_source(File::new(&path, FileFormat::Json).required(true))
            .add_source(Environment::with_prefix("REGISTRAR"))
            .build()?
            .try_deserialize()?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.database_url = url;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> AppResult<()> {
        if hex::decode(&self.contract_hash).is_err() || self.contract_hash.len() != 40 {
            return Err(AppError::Config(format!(
                "contract_hash must be 40 hex characters, got {:?}",
                self.contract_hash
            )));
        }
        if self.batch_size == 0 {
            return Err(AppError::Config("batch_size must be positive".to_string()));
        }
        if self.load_interval_ticks == 0 || self.confirmation_ticks == 0 {
            return Err(AppError::Config(
                "load_interval_ticks and confirmation_ticks must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
