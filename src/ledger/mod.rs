pub mod rpc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;

/// Contract method that registers a batch of crowdsale participants.
pub const REGISTER_METHOD: &str = "crowdsale_register";
/// Contract method that reports the registration state of addresses.
pub const STATUS_METHOD: &str = "crowdsale_status";

/// Outcome of a contract invocation relayed through the node wallet.
///
/// The node may answer with an execution result but no relayed transaction,
/// or with nothing usable at all; the submission machine treats anything short
/// of `ack` + `tx_ref` as a failed submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// Raw execution result returned by the invocation, if any.
    pub ack: Option<Value>,
    /// Hash of the relayed transaction, if one was broadcast.
    pub tx_ref: Option<String>,
}

impl SubmitReceipt {
    /// A receipt is usable only when the node both executed the invocation
    /// and relayed a transaction for it.
    pub fn is_usable(&self) -> bool {
        self.ack.is_some() && self.tx_ref.is_some()
    }
}

/// Chain heights reported by the node, for the periodic status line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SyncStatus {
    pub height: u64,
    pub header_height: u64,
}

/// Narrow ledger capability consumed by the submission machine.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Invoke a contract method through the node wallet and relay the
    /// resulting transaction.
    async fn submit(&self, contract: &str, method: &str, args: &[String])
        -> AppResult<SubmitReceipt>;

    /// Rebuild the wallet state after a failed submission.
    async fn recover_wallet(&self) -> AppResult<()>;

    /// Bring the wallet up to date with the chain before submitting.
    async fn sync_wallet(&self) -> AppResult<()>;

    /// Current block and header heights, for reporting only.
    async fn sync_status(&self) -> AppResult<SyncStatus>;

    /// Read-only `crowdsale_status` query for already-submitted addresses.
    async fn check_registered(&self, contract: &str, args: &[String]) -> AppResult<Value>;
}
