// Batch submission core: queue, state machine, tick scheduler.
pub mod machine;
pub mod queue;
pub mod scheduler;

pub use machine::SubmissionMachine;
pub use queue::BatchQueue;
pub use scheduler::TickScheduler;

use crate::config::Config;

/// Submission parameters carved out of the application configuration.
#[derive(Debug, Clone)]
pub struct SubmitterConfig {
    /// Script hash of the crowdsale contract.
    pub contract_hash: String,
    /// Load unapproved registrants every this many ticks (queue empty only).
    pub load_interval_ticks: u64,
    /// Ticks to wait after a relayed submission before resuming.
    pub confirmation_ticks: u64,
    /// Addresses submitted per `crowdsale_register` invocation.
    pub batch_size: usize,
    /// Query `crowdsale_status` after each successful submission.
    pub verify_after_submit: bool,
}

impl From<&Config> for SubmitterConfig {
    fn from(config: &Config) -> Self {
        Self {
            contract_hash: config.contract_hash.clone(),
            load_interval_ticks: config.load_interval_ticks,
            confirmation_ticks: config.confirmation_ticks,
            batch_size: config.batch_size,
            verify_after_submit: config.verify_after_submit,
        }
    }
}
