pub mod repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// One participant row awaiting crowdsale registration.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Registrant {
    pub address: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Narrow store capability consumed by the submission machine.
///
/// Both operations are independently retryable; callers treat any error as an
/// empty/zero result and pick the work up again on a later tick.
#[async_trait]
pub trait RegistrantStore: Send + Sync {
    /// Return at most `limit` addresses not yet marked approved.
    async fn fetch_unapproved(&self, limit: usize) -> AppResult<Vec<String>>;

    /// Mark the given addresses approved, returning the number of rows updated.
    async fn mark_approved(&self, addresses: &[String]) -> AppResult<u64>;
}
