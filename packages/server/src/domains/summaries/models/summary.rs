use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A stored text summary for one URL.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Summary {
    pub id: i64,
    pub url: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl Summary {
    /// Insert a new record with an empty summary.
    pub async fn create(url: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO summaries (url)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM summaries WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All records in insertion order.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM summaries ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Overwrite url and summary. `created_at` is never touched.
    pub async fn update(id: i64, url: &str, summary: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE summaries SET url = $2, summary = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(url)
        .bind(summary)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete a record, returning it if it existed.
    pub async fn delete(id: i64, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("DELETE FROM summaries WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Write the enrichment result. Returns false when the record no
    /// longer exists.
    pub async fn set_summary(id: i64, summary: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("UPDATE summaries SET summary = $2 WHERE id = $1")
            .bind(id)
            .bind(summary)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
