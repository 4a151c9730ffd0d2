use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{Registrant, RegistrantStore};
use crate::error::AppResult;

/// Postgres-backed registrant store.
pub struct RegistrantRepository {
    pool: PgPool,
}

impl RegistrantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrantStore for RegistrantRepository {
    async fn fetch_unapproved(&self, limit: usize) -> AppResult<Vec<String>> {
        let rows: Vec<Registrant> = sqlx::query_as(
            r#"
            SELECT address, approved, created_at, updated_at
            FROM registrants
            WHERE approved = FALSE
            ORDER BY created_at
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        debug!("loaded {} unapproved registrants", rows.len());
        Ok(rows.into_iter().map(|r| r.address).collect())
    }

    async fn mark_approved(&self, addresses: &[String]) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE registrants
            SET approved = TRUE, updated_at = NOW()
            WHERE address = ANY($1) AND approved = FALSE
            "#,
        )
        .bind(addresses)
        .execute(&self.pool)
        .await?;

        debug!("rows marked approved: {}", result.rows_affected());
        Ok(result.rows_affected())
    }
}
