//! PostgreSQL implementation of RedemptionLedger.
//!
//! Redeem runs in one transaction:
//!
//! 1. `INSERT ... ON CONFLICT DO NOTHING` the ledger row. A concurrent
//!    insert for the same order blocks on the primary key until the other
//!    transaction finishes, then becomes a no-op.
//! 2. A single guarded `UPDATE ... SET used = used + 1 WHERE ... used <
//!    usage_limit RETURNING used`. The row lock serializes increments and
//!    the guard is re-evaluated against the latest committed row.
//!
//! If either step finds nothing to do the transaction is rolled back, so
//! the ledger never holds an entry without a matching increment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, Money, OrderId, PromotionId, Timestamp};
use crate::domain::promotion::{LedgerEntry, RedemptionOutcome, RedemptionRequest};
use crate::ports::RedemptionLedger;

/// Postgres SQLSTATE for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL implementation of the RedemptionLedger port.
pub struct PostgresRedemptionLedger {
    pool: PgPool,
}

impl PostgresRedemptionLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LedgerRow {
    promotion_id: Uuid,
    order_id: String,
    discount_amount: i64,
    redeemed_at: DateTime<Utc>,
}

impl TryFrom<LedgerRow> for LedgerEntry {
    type Error = DomainError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        Ok(LedgerEntry {
            promotion_id: PromotionId::from_uuid(row.promotion_id),
            order_id: OrderId::new(row.order_id)
                .map_err(|e| DomainError::database(format!("Invalid order_id value: {}", e)))?,
            discount_amount: Money::from_cents(row.discount_amount),
            redeemed_at: Timestamp::from_datetime(row.redeemed_at),
        })
    }
}

fn db_error(action: &str) -> impl FnOnce(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::database(format!("Failed to {}: {}", action, e))
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION))
}

async fn rollback(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.rollback().await.map_err(db_error("roll back redemption"))
}

impl PostgresRedemptionLedger {
    async fn current_counts(&self, promotion_id: &PromotionId) -> Result<Option<(i32, i32)>, DomainError> {
        sqlx::query_as("SELECT used, usage_limit FROM promotions WHERE id = $1")
            .bind(promotion_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("read promotion usage"))
    }
}

fn to_count(value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|e| DomainError::database(format!("Invalid usage count: {}", e)))
}

#[async_trait]
impl RedemptionLedger for PostgresRedemptionLedger {
    async fn redeem(&self, request: RedemptionRequest) -> Result<RedemptionOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin redemption"))?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO promotion_redemptions (promotion_id, order_id, discount_amount, redeemed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (promotion_id, order_id) DO NOTHING
            "#,
        )
        .bind(request.promotion_id.as_uuid())
        .bind(request.order_id.as_str())
        .bind(request.discount_amount.cents())
        .bind(request.redeemed_at.as_datetime())
        .execute(&mut *tx)
        .await;

        let inserted = match inserted {
            Ok(result) => result.rows_affected(),
            Err(e) if is_foreign_key_violation(&e) => {
                rollback(tx).await?;
                return Ok(RedemptionOutcome::NotFound);
            }
            Err(e) => return Err(db_error("record redemption")(e)),
        };

        if inserted == 0 {
            rollback(tx).await?;
            let entry = self
                .find(&request.promotion_id, &request.order_id)
                .await?
                .ok_or_else(|| DomainError::database("Redemption vanished during replay"))?;
            let used = match self.current_counts(&request.promotion_id).await? {
                Some((used, _)) => to_count(used)?,
                None => return Ok(RedemptionOutcome::NotFound),
            };
            return Ok(RedemptionOutcome::AlreadyRedeemed { entry, used });
        }

        let used: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE promotions
            SET used = used + 1
            WHERE id = $1 AND (usage_limit = 0 OR used < usage_limit)
            RETURNING used
            "#,
        )
        .bind(request.promotion_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("increment usage"))?;

        let Some(used) = used else {
            rollback(tx).await?;
            return Ok(match self.current_counts(&request.promotion_id).await? {
                Some((_, limit)) => RedemptionOutcome::LimitReached {
                    limit: to_count(limit)?,
                },
                None => RedemptionOutcome::NotFound,
            });
        };

        tx.commit().await.map_err(db_error("commit redemption"))?;

        Ok(RedemptionOutcome::Redeemed {
            used: to_count(used)?,
            entry: LedgerEntry::from(request),
        })
    }

    async fn find(
        &self,
        promotion_id: &PromotionId,
        order_id: &OrderId,
    ) -> Result<Option<LedgerEntry>, DomainError> {
        let row: Option<LedgerRow> = sqlx::query_as(
            r#"
            SELECT promotion_id, order_id, discount_amount, redeemed_at
            FROM promotion_redemptions
            WHERE promotion_id = $1 AND order_id = $2
            "#,
        )
        .bind(promotion_id.as_uuid())
        .bind(order_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find redemption"))?;

        row.map(LedgerEntry::try_from).transpose()
    }

    async fn list(&self, promotion_id: &PromotionId) -> Result<Vec<LedgerEntry>, DomainError> {
        let rows: Vec<LedgerRow> = sqlx::query_as(
            r#"
            SELECT promotion_id, order_id, discount_amount, redeemed_at
            FROM promotion_redemptions
            WHERE promotion_id = $1
            ORDER BY redeemed_at ASC, order_id ASC
            "#,
        )
        .bind(promotion_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list redemptions"))?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }
}
