use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::tally::{PageRequest, SnapshotPage, SnapshotQuery, TallySnapshotRepository};
use domain::{DomainError, Granularity, ServiceLevel, TallySnapshot, Uom, Usage};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

const FILTER: &str = r#"
    FROM tally_snapshots
    WHERE account_number = $1
      AND product_id = $2
      AND granularity = $3
      AND ($4::text = '_ANY' OR service_level = $4::text)
      AND ($5::text = '_ANY' OR usage = $5::text)
      AND snapshot_date BETWEEN $6 AND $7
"#;

#[derive(FromRow)]
struct SnapshotRow {
    id: Uuid,
    account_number: String,
    product_id: String,
    granularity: String,
    service_level: String,
    usage: String,
    snapshot_date: DateTime<Utc>,
    measurements: Json<BTreeMap<Uom, f64>>,
}

impl TryFrom<SnapshotRow> for TallySnapshot {
    type Error = DomainError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        Ok(TallySnapshot {
            id: row.id,
            account_number: row.account_number,
            product_id: row.product_id,
            granularity: row.granularity.parse::<Granularity>()?,
            service_level: ServiceLevel::from_lenient(&row.service_level),
            usage: Usage::from_lenient(&row.usage),
            snapshot_date: row.snapshot_date,
            measurements: row.measurements.0,
        })
    }
}

/// PostgreSQL implementation of TallySnapshotRepository
pub struct PostgresTallySnapshotRepository {
    pool: PgPool,
}

impl PostgresTallySnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn db_error(e: sqlx::Error) -> DomainError {
        DomainError::Repository(format!("Database error: {}", e))
    }

    async fn count(&self, query: &SnapshotQuery) -> Result<u64, DomainError> {
        let sql = format!("SELECT COUNT(*) {FILTER}");
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(&query.account_number)
            .bind(&query.product_id)
            .bind(query.granularity.as_str())
            .bind(query.service_level.as_str())
            .bind(query.usage.as_str())
            .bind(query.beginning)
            .bind(query.ending)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::db_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[async_trait]
impl TallySnapshotRepository for PostgresTallySnapshotRepository {
    async fn find_snapshots(
        &self,
        query: &SnapshotQuery,
        page: Option<PageRequest>,
    ) -> Result<SnapshotPage, DomainError> {
        // LIMIT NULL is no limit
        let sql = format!(
            "SELECT id, account_number, product_id, granularity, service_level, usage, \
             snapshot_date, measurements {FILTER} ORDER BY snapshot_date LIMIT $8 OFFSET $9"
        );
        let rows: Vec<PgRow> = sqlx::query(&sql)
            .bind(&query.account_number)
            .bind(&query.product_id)
            .bind(query.granularity.as_str())
            .bind(query.service_level.as_str())
            .bind(query.usage.as_str())
            .bind(query.beginning)
            .bind(query.ending)
            .bind(page.map(|p| i64::from(p.limit)))
            .bind(page.map(|p| i64::from(p.offset)).unwrap_or(0))
            .fetch_all(&self.pool)
            .await
            .map_err(Self::db_error)?;

        let items = rows
            .iter()
            .map(|row| {
                SnapshotRow::from_row(row)
                    .map_err(Self::db_error)
                    .and_then(TallySnapshot::try_from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = match page {
            Some(_) => self.count(query).await?,
            None => items.len() as u64,
        };

        debug!(
            account = %query.account_number,
            product = %query.product_id,
            rows = items.len(),
            total,
            "Loaded tally snapshots"
        );
        Ok(SnapshotPage { items, total })
    }

    async fn save(&self, snapshot: &TallySnapshot) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tally_snapshots (
                id, account_number, product_id, granularity,
                service_level, usage, snapshot_date, measurements
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                account_number = EXCLUDED.account_number,
                product_id = EXCLUDED.product_id,
                granularity = EXCLUDED.granularity,
                service_level = EXCLUDED.service_level,
                usage = EXCLUDED.usage,
                snapshot_date = EXCLUDED.snapshot_date,
                measurements = EXCLUDED.measurements
            "#,
        )
        .bind(snapshot.id)
        .bind(&snapshot.account_number)
        .bind(&snapshot.product_id)
        .bind(snapshot.granularity.as_str())
        .bind(snapshot.service_level.as_str())
        .bind(snapshot.usage.as_str())
        .bind(snapshot.snapshot_date)
        .bind(Json(&snapshot.measurements))
        .execute(&self.pool)
        .await
        .map_err(Self::db_error)?;

        Ok(())
    }
}
