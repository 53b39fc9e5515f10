use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::Database;
use crate::article::ArticleSummary;
use crate::{Error, Result};

const SUMMARY_CACHE: &str = "summaries";

/// Repository for the persisted summary-list cache
pub struct CacheRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct SummaryRow {
    id: String,
    title: String,
    date: String,
}

impl SummaryRow {
    fn into_summary(self) -> Result<ArticleSummary> {
        let date = parse_stored_date(&self.date)?;
        Ok(ArticleSummary {
            id: self.id,
            title: self.title,
            date,
        })
    }
}

fn parse_stored_date(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("invalid stored date '{}': {}", text, e)))
}

impl<'a> CacheRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Replace the persisted summary list atomically
    pub async fn replace(
        &self,
        summaries: &[ArticleSummary],
        refreshed_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM summary_cache")
            .execute(&mut *tx)
            .await?;

        for (position, summary) in summaries.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO summary_cache (id, title, date, position)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&summary.id)
            .bind(&summary.title)
            .bind(summary.date.to_rfc3339())
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO cache_state (cache, refreshed_at)
            VALUES (?, ?)
            ON CONFLICT (cache) DO UPDATE SET refreshed_at = excluded.refreshed_at
            "#,
        )
        .bind(SUMMARY_CACHE)
        .bind(refreshed_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Load the persisted summary list, if one exists
    pub async fn load(&self) -> Result<Option<(Vec<ArticleSummary>, DateTime<Utc>)>> {
        let refreshed_at: Option<(String,)> =
            sqlx::query_as("SELECT refreshed_at FROM cache_state WHERE cache = ?")
                .bind(SUMMARY_CACHE)
                .fetch_optional(self.db.pool())
                .await?;

        let Some((refreshed_at,)) = refreshed_at else {
            return Ok(None);
        };
        let refreshed_at = parse_stored_date(&refreshed_at)?;

        let rows: Vec<SummaryRow> = sqlx::query_as(
            "SELECT id, title, date FROM summary_cache ORDER BY position",
        )
        .fetch_all(self.db.pool())
        .await?;

        let summaries = rows
            .into_iter()
            .map(SummaryRow::into_summary)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some((summaries, refreshed_at)))
    }

    /// Drop the persisted summary list
    pub async fn clear(&self) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM summary_cache")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM cache_state WHERE cache = ?")
            .bind(SUMMARY_CACHE)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
