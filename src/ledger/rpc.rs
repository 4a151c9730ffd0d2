use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::{LedgerClient, SubmitReceipt, SyncStatus, STATUS_METHOD};
use crate::error::{AppResult, LedgerError};

/// JSON-RPC client for a ledger node that hosts the registrar wallet.
pub struct RpcLedgerClient {
    client: Client,
    endpoint: String,
    wallet_path: String,
}

impl RpcLedgerClient {
    pub fn new(endpoint: String, wallet_path: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            wallet_path,
        }
    }

    /// Perform one JSON-RPC 2.0 call and unwrap its `result` field.
    async fn call(&self, method: &str, params: Value) -> AppResult<Value> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let body: Value = response.json().await?;

        if let Some(error) = body.get("error") {
            return Err(LedgerError::Rpc {
                method: method.to_string(),
                reason: error.clone(),
            }
            .into());
        }

        body.get("result").cloned().ok_or_else(|| {
            LedgerError::MalformedResponse(format!("no result for {}", method)).into()
        })
    }

    async fn block_count(&self, method: &str) -> AppResult<u64> {
        let result = self.call(method, json!([])).await?;
        result.as_u64().ok_or_else(|| {
            LedgerError::MalformedResponse(format!("{} returned non-integer", method)).into()
        })
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn submit(
        &self,
        contract: &str,
        method: &str,
        args: &[String],
    ) -> AppResult<SubmitReceipt> {
        // The node executes the invocation against the open wallet and relays
        // the signed transaction in one call.
        let params = json!([contract, method, args, args.len()]);
        let result = self.call("invokefunction", params).await?;

        let tx_ref = result
            .get("txid")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let ack = result.get("stack").cloned();

        debug!(?tx_ref, "invocation relayed");
        Ok(SubmitReceipt { ack, tx_ref })
    }

    async fn recover_wallet(&self) -> AppResult<()> {
        self.call("rebuildwallet", json!([self.wallet_path])).await?;
        Ok(())
    }

    async fn sync_wallet(&self) -> AppResult<()> {
        self.call("syncwallet", json!([self.wallet_path])).await?;
        Ok(())
    }

    async fn sync_status(&self) -> AppResult<SyncStatus> {
        let height = self.block_count("getblockcount").await?;
        let header_height = self.block_count("getblockheadercount").await?;
        Ok(SyncStatus {
            height,
            header_height,
        })
    }

    async fn check_registered(&self, contract: &str, args: &[String]) -> AppResult<Value> {
        let params = json!([contract, STATUS_METHOD, args, args.len()]);
        self.call("invokefunction", params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_usable_requires_ack_and_tx_ref() {
        let receipt = SubmitReceipt {
            ack: Some(json!([{"type": "Boolean", "value": true}])),
            tx_ref: Some("0xabc".to_string()),
        };
        assert!(receipt.is_usable());

        let no_tx = SubmitReceipt {
            ack: Some(json!([])),
            tx_ref: None,
        };
        assert!(!no_tx.is_usable());

        let empty = SubmitReceipt {
            ack: None,
            tx_ref: None,
        };
        assert!(!empty.is_usable());
    }
}
