use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

use super::machine::SubmissionMachine;
use crate::ledger::LedgerClient;
use crate::store::RegistrantStore;

/// Fixed-interval driver for the submission machine.
///
/// One task owns the machine; each tick runs a full machine step to completion
/// before the next tick is awaited, so steps never overlap and the tick
/// counter is the only clock the machine sees. Runs until the process exits.
pub struct TickScheduler<S, L> {
    tick_seconds: u64,
    machine: SubmissionMachine<S, L>,
}

impl<S, L> TickScheduler<S, L>
where
    S: RegistrantStore + 'static,
    L: LedgerClient + 'static,
{
    pub fn new(tick_seconds: u64, machine: SubmissionMachine<S, L>) -> Self {
        Self {
            tick_seconds,
            machine,
        }
    }

    /// Start the scheduler loop in the background.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(mut self) {
        info!(tick_seconds = self.tick_seconds, "submission scheduler started");

        let mut ticker = interval(Duration::from_secs(self.tick_seconds));
        // A slow collaborator must delay later ticks, not bunch them up.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut tick: u64 = 0;
        loop {
            ticker.tick().await;
            tick += 1;
            self.machine.step(tick).await;
        }
    }
}
