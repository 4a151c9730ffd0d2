use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::queue::BatchQueue;
use super::SubmitterConfig;
use crate::ledger::{LedgerClient, REGISTER_METHOD};
use crate::store::RegistrantStore;

/// Emit a chain status line every this many ticks.
const STATUS_REPORT_INTERVAL_TICKS: u64 = 2;

/// The single in-flight submission, held while its confirmation window runs.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub batch: Vec<String>,
    pub tx_ref: String,
    pub deadline_tick: u64,
}

/// Where the machine is between ticks. Wallet recovery is a flag consumed in
/// the same tick it is honored, so it never persists as a phase of its own.
#[derive(Debug)]
enum Phase {
    Idle,
    AwaitingConfirmation(SubmissionRecord),
}

/// Tick-driven batch submission state machine.
///
/// Owns the batch queue and decides, once per tick, whether to load new
/// registrants, submit a batch, wait out a confirmation window, or recover
/// the wallet. All external effects go through the two injected capabilities.
pub struct SubmissionMachine<S, L> {
    config: SubmitterConfig,
    store: Arc<S>,
    ledger: Arc<L>,
    queue: BatchQueue,
    phase: Phase,
    wallet_needs_recovery: bool,
}

impl<S, L> SubmissionMachine<S, L>
where
    S: RegistrantStore,
    L: LedgerClient,
{
    pub fn new(config: SubmitterConfig, store: Arc<S>, ledger: Arc<L>) -> Self {
        Self {
            config,
            store,
            ledger,
            queue: BatchQueue::new(),
            phase: Phase::Idle,
            wallet_needs_recovery: false,
        }
    }

    /// Evaluate one tick to completion. Never returns an error: every failure
    /// from a collaborator is downgraded to "nothing happened this tick" and
    /// picked up again on a later one.
    pub async fn step(&mut self, tick: u64) {
        self.report_status(tick).await;

        if let Phase::AwaitingConfirmation(record) = &self.phase {
            if tick < record.deadline_tick {
                debug!(tx_ref = %record.tx_ref, "registration tx still settling");
                return;
            }
            info!(tx_ref = %record.tx_ref, "confirmation window elapsed");
            // The deadline tick itself is evaluated as a normal idle tick.
            self.phase = Phase::Idle;
        }

        if self.queue.is_empty() {
            if tick % self.config.load_interval_ticks != 0 {
                return;
            }
            self.load_registrants().await;
            if self.queue.is_empty() {
                return;
            }
        }

        self.prepare_wallet().await;
        self.submit_batch(tick).await;
    }

    /// Log chain heights on a fixed modulus of ticks. Side effect only.
    async fn report_status(&self, tick: u64) {
        if tick % STATUS_REPORT_INTERVAL_TICKS != 0 {
            return;
        }
        match self.ledger.sync_status().await {
            Ok(status) => info!(
                height = status.height,
                header_height = status.header_height,
                "chain status"
            ),
            Err(e) => warn!(error = ?e, "failed to fetch chain status"),
        }
    }

    /// Pull up to one batch worth of unapproved registrants into the queue.
    /// A store error is treated as an empty result.
    async fn load_registrants(&mut self) {
        match self.store.fetch_unapproved(self.config.batch_size).await {
            Ok(addresses) => {
                if !addresses.is_empty() {
                    debug!(count = addresses.len(), "loaded registrants to submit");
                }
                self.queue.enqueue_all(addresses);
            }
            Err(e) => error!(error = ?e, "failed to load unapproved registrants"),
        }
    }

    /// Recover the wallet if the last submission burned it, otherwise sync it.
    /// Either way the machine proceeds to submission afterwards.
    async fn prepare_wallet(&mut self) {
        if self.wallet_needs_recovery {
            info!("recovering wallet before submission");
            if let Err(e) = self.ledger.recover_wallet().await {
                warn!(error = ?e, "wallet recovery failed");
            }
            self.wallet_needs_recovery = false;
        } else if let Err(e) = self.ledger.sync_wallet().await {
            warn!(error = ?e, "wallet sync failed");
        }
    }

    async fn submit_batch(&mut self, tick: u64) {
        let batch = self.queue.dequeue_up_to(self.config.batch_size);
        debug!(?batch, "submitting registration batch");

        let receipt = match self
            .ledger
            .submit(&self.config.contract_hash, REGISTER_METHOD, &batch)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                // Transport failure and a legitimate empty result look the
                // same from here; both fall into the recovery path below.
                warn!(error = ?e, "submission call failed");
                crate::ledger::SubmitReceipt {
                    ack: None,
                    tx_ref: None,
                }
            }
        };

        let (Some(_ack), Some(tx_ref)) = (receipt.ack, receipt.tx_ref) else {
            info!("submission returned no usable result, scheduling wallet recovery");
            self.wallet_needs_recovery = true;
            // The popped batch is intentionally dropped, not requeued.
            return;
        };

        info!(%tx_ref, count = batch.len(), "registration transaction relayed");

        match self.store.mark_approved(&batch).await {
            Ok(rows) => debug!(rows, "registrants marked approved"),
            Err(e) => error!(error = ?e, "failed to mark registrants approved"),
        }

        if self.config.verify_after_submit {
            match self
                .ledger
                .check_registered(&self.config.contract_hash, &batch)
                .await
            {
                Ok(result) => debug!(?result, "crowdsale_status after submission"),
                Err(e) => warn!(error = ?e, "crowdsale_status query failed"),
            }
        }

        self.phase = Phase::AwaitingConfirmation(SubmissionRecord {
            batch,
            tx_ref,
            deadline_tick: tick + self.config.confirmation_ticks,
        });
    }

    /// The in-flight submission, if one is awaiting its confirmation window.
    pub fn in_flight(&self) -> Option<&SubmissionRecord> {
        match &self.phase {
            Phase::AwaitingConfirmation(record) => Some(record),
            Phase::Idle => None,
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn wallet_needs_recovery(&self) -> bool {
        self.wallet_needs_recovery
    }
}
