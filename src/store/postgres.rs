use async_trait::async_trait;
use sqlx::postgres::{PgListener, PgPoolOptions};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ReportStore, StoreConnectionError, TokenStore};
use crate::models::report::{NewReport, Report};
use crate::models::token::ApprovalToken;

/// Channel the `reports` insert trigger notifies on.
pub const REPORT_INSERTED_CHANNEL: &str = "report_inserted";

const REPORT_COLUMNS: &str = "id, link, phone, approved, page_title, impersonated_brands, notified_at, published_at, created_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, StoreConnectionError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreConnectionError(e.into()))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations from the migrations/ directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// A dedicated LISTEN connection subscribed to report inserts.
    pub async fn listen_report_inserts(&self) -> anyhow::Result<PgListener> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(REPORT_INSERTED_CHANNEL).await?;
        Ok(listener)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ReportStore for PgStore {
    async fn insert_report(&self, new: NewReport) -> anyhow::Result<Report> {
        let row = sqlx::query_as::<_, Report>(&format!(
            "INSERT INTO reports (link, phone) VALUES ($1, $2) RETURNING {REPORT_COLUMNS}"
        ))
        .bind(&new.link)
        .bind(&new.phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_report(&self, id: Uuid) -> anyhow::Result<Option<Report>> {
        let row = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_reports(&self, limit: i64) -> anyhow::Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_unnotified(&self) -> anyhow::Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE notified_at IS NULL AND approved = false ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_approved(&self) -> anyhow::Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports WHERE approved = true ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn save_enrichment(
        &self,
        id: Uuid,
        page_title: Option<&str>,
        brands: &[String],
    ) -> anyhow::Result<()> {
        sqlx::query("UPDATE reports SET page_title = $1, impersonated_brands = $2 WHERE id = $3")
            .bind(page_title)
            .bind(brands)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_notified(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE reports SET notified_at = NOW() WHERE id = $1 AND notified_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn release_notified(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE reports SET notified_at = NULL WHERE id = $1 AND approved = false")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_approved(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE reports SET approved = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_published(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE reports SET approved = false, published_at = NOW() WHERE id = $1 AND approved = true",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for PgStore {
    async fn insert_token(&self, token: &ApprovalToken) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO approval_tokens (token, report_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&token.token)
        .bind(token.report_id)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn consume_token(&self, value: &str) -> anyhow::Result<Option<ApprovalToken>> {
        // Single statement: concurrent redemptions of one token see at most one row.
        let row = sqlx::query_as::<_, ApprovalToken>(
            r#"DELETE FROM approval_tokens
               WHERE token = $1 AND expires_at > NOW()
               RETURNING token, report_id, created_at, expires_at"#,
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_expired_tokens(&self) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM approval_tokens WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
