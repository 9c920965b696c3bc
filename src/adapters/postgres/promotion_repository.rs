//! PostgreSQL implementation of PromotionRepository.
//!
//! Provides persistent storage for Promotion aggregates using PostgreSQL.
//! The `used` column is owned by [`PostgresRedemptionLedger`] and is never
//! written from here.
//!
//! [`PostgresRedemptionLedger`]: super::PostgresRedemptionLedger

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Money, Percentage, PromotionId, Timestamp};
use crate::domain::promotion::{
    AdminState, DiscountKind, DiscountKindTag, Promotion, PromotionCode, ValidityWindow,
};
use crate::ports::{PromotionQuery, PromotionRepository};

/// Name of the unique index on `upper(code)`.
const CODE_UNIQUE_INDEX: &str = "promotions_code_key";

const SELECT_COLUMNS: &str = r#"
    SELECT id, code, name, kind, value, min_spend, max_discount, usage_limit, used,
           admin_state, starts_at, ends_at, created_at, updated_at
    FROM promotions
"#;

/// PostgreSQL implementation of the PromotionRepository port.
pub struct PostgresPromotionRepository {
    pool: PgPool,
}

impl PostgresPromotionRepository {
    /// Creates a new PostgresPromotionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a promotion.
#[derive(Debug, sqlx::FromRow)]
struct PromotionRow {
    id: Uuid,
    code: String,
    name: String,
    kind: String,
    value: i64,
    min_spend: i64,
    max_discount: i64,
    usage_limit: i32,
    used: i32,
    admin_state: String,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PromotionRow> for Promotion {
    type Error = DomainError;

    fn try_from(row: PromotionRow) -> Result<Self, Self::Error> {
        let code = PromotionCode::try_new(&row.code).map_err(corrupt("code"))?;
        let discount = parse_discount(&row.kind, row.value, row.max_discount)?;
        let admin_state = row
            .admin_state
            .parse::<AdminState>()
            .map_err(|e| DomainError::database(format!("Invalid admin_state value: {}", e)))?;
        let window = ValidityWindow::new(
            row.starts_at.map(Timestamp::from_datetime),
            row.ends_at.map(Timestamp::from_datetime),
        )
        .map_err(corrupt("window"))?;

        Ok(Promotion {
            id: PromotionId::from_uuid(row.id),
            code,
            name: row.name,
            discount,
            min_spend: Money::from_cents(row.min_spend),
            usage_limit: to_count("usage_limit", row.usage_limit)?,
            used: to_count("used", row.used)?,
            admin_state,
            window,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn corrupt<E: std::fmt::Display>(column: &'static str) -> impl Fn(E) -> DomainError {
    move |e| DomainError::database(format!("Invalid {} value: {}", column, e))
}

fn to_count(column: &'static str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(corrupt(column))
}

fn parse_discount(kind: &str, value: i64, max_discount: i64) -> Result<DiscountKind, DomainError> {
    let tag = kind
        .parse::<DiscountKindTag>()
        .map_err(|e| DomainError::database(format!("Invalid kind value: {}", e)))?;
    Ok(match tag {
        DiscountKindTag::Percentage => DiscountKind::Percentage {
            percent: Percentage::try_new(value).map_err(corrupt("value"))?,
            max_discount: (max_discount != 0).then(|| Money::from_cents(max_discount)),
        },
        DiscountKindTag::FixedAmount => DiscountKind::FixedAmount {
            amount: Money::from_cents(value),
        },
        DiscountKindTag::FreeShipping => DiscountKind::FreeShipping,
    })
}

fn to_db_count(value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|e| DomainError::database(format!("Count out of range: {}", e)))
}

/// Wraps a search term for ILIKE, escaping its wildcards.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn map_write_error<'a>(
    promotion: &'a Promotion,
    action: &str,
) -> impl FnOnce(sqlx::Error) -> DomainError + 'a {
    let action = action.to_string();
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.constraint() == Some(CODE_UNIQUE_INDEX) {
                return DomainError::new(
                    ErrorCode::PromotionCodeTaken,
                    format!("Promotion code '{}' is already in use", promotion.code),
                )
                .with_detail("code", promotion.code.as_str());
            }
        }
        DomainError::database(format!("Failed to {} promotion: {}", action, e))
    }
}

#[async_trait]
impl PromotionRepository for PostgresPromotionRepository {
    async fn find_by_id(&self, id: &PromotionId) -> Result<Option<Promotion>, DomainError> {
        let row: Option<PromotionRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find promotion: {}", e)))?;

        row.map(Promotion::try_from).transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Promotion>, DomainError> {
        let row: Option<PromotionRow> =
            sqlx::query_as(&format!("{} WHERE upper(code) = upper($1)", SELECT_COLUMNS))
                .bind(code.trim())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to find promotion: {}", e)))?;

        row.map(Promotion::try_from).transpose()
    }

    async fn list(&self, query: &PromotionQuery) -> Result<Vec<Promotion>, DomainError> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let rows: Vec<PromotionRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE ($1::text IS NULL OR kind = $1)
              AND ($2::text IS NULL OR code ILIKE $2 OR name ILIKE $2)
            ORDER BY created_at DESC
            "#,
            SELECT_COLUMNS
        ))
        .bind(query.kind.map(|k| k.as_str()))
        .bind(search)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list promotions: {}", e)))?;

        rows.into_iter().map(Promotion::try_from).collect()
    }

    async fn insert(&self, promotion: &Promotion) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO promotions (
                id, code, name, kind, value, min_spend, max_discount, usage_limit, used,
                admin_state, starts_at, ends_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(promotion.id.as_uuid())
        .bind(promotion.code.as_str())
        .bind(&promotion.name)
        .bind(promotion.discount.tag().as_str())
        .bind(promotion.discount.value())
        .bind(promotion.min_spend.cents())
        .bind(promotion.discount.max_discount().cents())
        .bind(to_db_count(promotion.usage_limit)?)
        .bind(to_db_count(promotion.used)?)
        .bind(promotion.admin_state.as_str())
        .bind(promotion.window.starts_at().map(|t| *t.as_datetime()))
        .bind(promotion.window.ends_at().map(|t| *t.as_datetime()))
        .bind(promotion.created_at.as_datetime())
        .bind(promotion.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_write_error(promotion, "insert"))?;

        Ok(())
    }

    async fn update(&self, promotion: &Promotion) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE promotions SET
                code = $2,
                name = $3,
                kind = $4,
                value = $5,
                min_spend = $6,
                max_discount = $7,
                usage_limit = $8,
                admin_state = $9,
                starts_at = $10,
                ends_at = $11,
                updated_at = $12
            WHERE id = $1 AND ($8 = 0 OR used <= $8)
            "#,
        )
        .bind(promotion.id.as_uuid())
        .bind(promotion.code.as_str())
        .bind(&promotion.name)
        .bind(promotion.discount.tag().as_str())
        .bind(promotion.discount.value())
        .bind(promotion.min_spend.cents())
        .bind(promotion.discount.max_discount().cents())
        .bind(to_db_count(promotion.usage_limit)?)
        .bind(promotion.admin_state.as_str())
        .bind(promotion.window.starts_at().map(|t| *t.as_datetime()))
        .bind(promotion.window.ends_at().map(|t| *t.as_datetime()))
        .bind(promotion.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(map_write_error(promotion, "update"))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Either the row is gone or redemptions committed past the new limit.
        let used: Option<i32> = sqlx::query_scalar("SELECT used FROM promotions WHERE id = $1")
            .bind(promotion.id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to update promotion: {}", e)))?;

        match used {
            None => Err(DomainError::promotion_not_found(promotion.id)),
            Some(used) => Err(DomainError::usage_limit_below_used(
                to_count("used", used)?,
                promotion.usage_limit,
            )),
        }
    }

    async fn delete(&self, id: &PromotionId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM promotions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to delete promotion: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("spring"), "%spring%");
    }

    #[test]
    fn parse_discount_zero_cap_is_none() {
        assert_eq!(
            parse_discount("percentage", 20, 0).unwrap(),
            DiscountKind::Percentage {
                percent: Percentage::try_new(20).unwrap(),
                max_discount: None,
            }
        );
        assert_eq!(
            parse_discount("percentage", 20, 500).unwrap().max_discount(),
            Money::from_cents(500)
        );
    }

    #[test]
    fn parse_discount_rejects_unknown_kind() {
        let err = parse_discount("bogof", 0, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn row_converts_to_promotion() {
        let now = Utc::now();
        let row = PromotionRow {
            id: Uuid::new_v4(),
            code: "ship".to_string(),
            name: "Free shipping".to_string(),
            kind: "free_shipping".to_string(),
            value: 0,
            min_spend: 5_000,
            max_discount: 0,
            usage_limit: 100,
            used: 7,
            admin_state: "paused".to_string(),
            starts_at: None,
            ends_at: Some(now),
            created_at: now,
            updated_at: now,
        };
        let promo = Promotion::try_from(row).unwrap();
        assert_eq!(promo.code.as_str(), "SHIP");
        assert_eq!(promo.discount, DiscountKind::FreeShipping);
        assert_eq!(promo.used, 7);
        assert_eq!(promo.admin_state, AdminState::Paused);
    }

    #[test]
    fn row_with_negative_count_is_rejected() {
        let now = Utc::now();
        let row = PromotionRow {
            id: Uuid::new_v4(),
            code: "X".to_string(),
            name: "X".to_string(),
            kind: "fixed_amount".to_string(),
            value: 100,
            min_spend: 5_000,
            max_discount: 0,
            usage_limit: 0,
            used: -1,
            admin_state: "active".to_string(),
            starts_at: None,
            ends_at: None,
            created_at: now,
            updated_at: now,
        };
        assert!(Promotion::try_from(row).is_err());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Integration Tests (require PostgreSQL, marked ignore)
    // ════════════════════════════════════════════════════════════════════════════

    use crate::adapters::postgres::{test_db, PostgresRedemptionLedger};
    use crate::domain::foundation::OrderId;
    use crate::domain::promotion::RedemptionRequest;
    use crate::ports::RedemptionLedger;

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
    async fn code_is_unique_regardless_of_case() {
        let repo = PostgresPromotionRepository::new(test_db::pool().await);
        let promo = test_db::promotion(0);
        repo.insert(&promo).await.unwrap();

        let mut twin = test_db::promotion(0);
        twin.code = promo.code.clone();
        let err = repo.insert(&twin).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PromotionCodeTaken);

        let found = repo
            .find_by_code(&promo.code.as_str().to_lowercase())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, promo.id);
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
    async fn update_rejects_limit_below_committed_usage() {
        let pool = test_db::pool().await;
        let repo = PostgresPromotionRepository::new(pool.clone());
        let ledger = PostgresRedemptionLedger::new(pool);
        let promo = test_db::promotion(5);
        repo.insert(&promo).await.unwrap();

        for order in ["o-1", "o-2", "o-3"] {
            ledger
                .redeem(RedemptionRequest {
                    promotion_id: promo.id,
                    order_id: OrderId::new(order).unwrap(),
                    discount_amount: Money::from_cents(500),
                    redeemed_at: Timestamp::now(),
                })
                .await
                .unwrap();
        }

        let mut stale = promo.clone();
        stale.usage_limit = 2;
        let err = repo.update(&stale).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UsageLimitBelowUsed);

        let stored = repo.find_by_id(&promo.id).await.unwrap().unwrap();
        assert_eq!((stored.used, stored.usage_limit), (3, 5));
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
    async fn update_missing_is_not_found_with_id() {
        let repo = PostgresPromotionRepository::new(test_db::pool().await);
        let promo = test_db::promotion(0);
        let err = repo.update(&promo).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PromotionNotFound);
        assert_eq!(err.details.get("id"), Some(&promo.id.to_string()));
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL (TEST_DATABASE_URL)"]
    async fn delete_cascades_to_ledger() {
        let pool = test_db::pool().await;
        let repo = PostgresPromotionRepository::new(pool.clone());
        let ledger = PostgresRedemptionLedger::new(pool);
        let promo = test_db::promotion(0);
        repo.insert(&promo).await.unwrap();
        ledger
            .redeem(RedemptionRequest {
                promotion_id: promo.id,
                order_id: OrderId::new("o-1").unwrap(),
                discount_amount: Money::from_cents(500),
                redeemed_at: Timestamp::now(),
            })
            .await
            .unwrap();

        assert!(repo.delete(&promo.id).await.unwrap());
        assert!(ledger.list(&promo.id).await.unwrap().is_empty());
        assert!(!repo.delete(&promo.id).await.unwrap());
    }
}
