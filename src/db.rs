use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AcknowledgementStats, Report, ReportItem};
use crate::store::{AcknowledgementLog, ReportStore};

pub async fn init_db(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Postgres backend for reports and the acknowledgement log.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const REPORT_COLUMNS: &str = "id, generated_at, items, acknowledged, acknowledged_at, \
     use_auto_summarization, enable_priority_scoring";

fn report_from_row(row: &PgRow) -> Result<Report> {
    let items: Json<Vec<ReportItem>> = row.try_get("items")?;
    Ok(Report {
        id: row.try_get("id")?,
        generated_at: row.try_get("generated_at")?,
        items: items.0,
        acknowledged: row.try_get("acknowledged")?,
        acknowledged_at: row.try_get("acknowledged_at")?,
        use_auto_summarization: row.try_get("use_auto_summarization")?,
        enable_priority_scoring: row.try_get("enable_priority_scoring")?,
    })
}

#[async_trait]
impl ReportStore for PgStore {
    async fn save(&self, report: &Report) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO signal_digest.reports
            (id, generated_at, items, acknowledged, acknowledged_at,
             use_auto_summarization, enable_priority_scoring)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET items = EXCLUDED.items,
                acknowledged = EXCLUDED.acknowledged,
                acknowledged_at = EXCLUDED.acknowledged_at
            "#,
        )
        .bind(report.id)
        .bind(report.generated_at)
        .bind(Json(&report.items))
        .bind(report.acknowledged)
        .bind(report.acknowledged_at)
        .bind(report.use_auto_summarization)
        .bind(report.enable_priority_scoring)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM signal_digest.reports WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(report_from_row).transpose()
    }

    async fn get_latest(&self) -> Result<Option<Report>> {
        let query = format!(
            "SELECT {REPORT_COLUMNS} FROM signal_digest.reports \
             ORDER BY generated_at DESC LIMIT 1"
        );
        let row = sqlx::query(&query).fetch_optional(&self.pool).await?;
        row.as_ref().map(report_from_row).transpose()
    }

    async fn update_acknowledgment(&self, id: Uuid, acknowledged: bool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE signal_digest.reports
            SET acknowledged = $2,
                acknowledged_at = CASE WHEN $2 THEN NOW() ELSE NULL END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(acknowledged)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_all(&self) -> Result<Vec<Report>> {
        let query = format!(
            "SELECT {REPORT_COLUMNS} FROM signal_digest.reports ORDER BY generated_at DESC"
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(report_from_row).collect()
    }
}

#[async_trait]
impl AcknowledgementLog for PgStore {
    async fn record(&self, actor: &str, report_date: NaiveDate, acknowledged: bool) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO signal_digest.acknowledgements
            (id, actor, report_date, acknowledged)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(actor)
        .bind(report_date)
        .bind(acknowledged)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn stats(&self) -> Result<AcknowledgementStats> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE acknowledged) AS acknowledged
            FROM signal_digest.acknowledgements
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let total: i64 = row.try_get("total")?;
        let acknowledged: i64 = row.try_get("acknowledged")?;
        Ok(AcknowledgementStats {
            total: usize::try_from(total).unwrap_or_default(),
            acknowledged: usize::try_from(acknowledged).unwrap_or_default(),
        })
    }
}
