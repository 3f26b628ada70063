use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::offer_repository::{NewOffer, OfferFilter, OfferRepository};
use crate::data::post_repository::Pagination;
use crate::domain::error::DomainError;
use crate::domain::offer::{Offer, OfferStatus};

#[derive(Debug, Clone)]
pub(crate) struct PostgresOfferRepository {
    pool: PgPool,
}

impl PostgresOfferRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct OfferRow {
    id: i64,
    post_id: i64,
    car_id: String,
    dealer_id: String,
    additional_message: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl OfferRepository for PostgresOfferRepository {
    async fn create_offer(&self, input: NewOffer) -> Result<Offer, DomainError> {
        let row = sqlx::query_as::<_, OfferRow>(
            r#"
            INSERT INTO offers (post_id, car_id, dealer_id, additional_message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, post_id, car_id, dealer_id, additional_message, status, created_at, updated_at
            "#,
        )
        .bind(input.post_id)
        .bind(input.car_id)
        .bind(input.dealer_id)
        .bind(input.additional_message)
        .bind(input.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_offer_db_error)?;

        map_row_to_offer(row)
    }

    async fn get_offer(&self, id: i64) -> Result<Option<Offer>, DomainError> {
        let row = sqlx::query_as::<_, OfferRow>(
            r#"
            SELECT id, post_id, car_id, dealer_id, additional_message, status, created_at, updated_at
            FROM offers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_offer_db_error)?;

        row.map(map_row_to_offer).transpose()
    }

    async fn update_offer_status(
        &self,
        id: i64,
        status: OfferStatus,
    ) -> Result<Option<Offer>, DomainError> {
        let row = sqlx::query_as::<_, OfferRow>(
            r#"
            UPDATE offers
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, post_id, car_id, dealer_id, additional_message, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_offer_db_error)?;

        row.map(map_row_to_offer).transpose()
    }

    async fn delete_offer(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM offers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_offer_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_offers(
        &self,
        filter: &OfferFilter,
        pagination: Pagination,
    ) -> Result<Vec<Offer>, DomainError> {
        let rows = sqlx::query_as::<_, OfferRow>(
            r#"
            SELECT id, post_id, car_id, dealer_id, additional_message, status, created_at, updated_at
            FROM offers
            WHERE ($1::BIGINT IS NULL OR post_id = $1)
              AND ($2::TEXT IS NULL OR dealer_id = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            OFFSET $4
            "#,
        )
        .bind(filter.post_id)
        .bind(filter.dealer_id.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_offer_db_error)?;

        rows.into_iter().map(map_row_to_offer).collect()
    }

    async fn total_offers(&self, filter: &OfferFilter) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM offers
            WHERE ($1::BIGINT IS NULL OR post_id = $1)
              AND ($2::TEXT IS NULL OR dealer_id = $2)
            "#,
        )
        .bind(filter.post_id)
        .bind(filter.dealer_id.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_offer_db_error)?;

        Ok(count)
    }
}

fn map_row_to_offer(row: OfferRow) -> Result<Offer, DomainError> {
    let status = row
        .status
        .parse::<OfferStatus>()
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

    Offer::new(
        row.id,
        row.post_id,
        row.car_id,
        row.dealer_id,
        row.additional_message,
        status,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_offer_db_error(err: sqlx::Error) -> DomainError {
    // status column carries a CHECK constraint over the four labels
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23514")
    {
        return DomainError::Validation {
            field: "status",
            message: "must be one of PENDING, ACCEPT, DECLINE, CANCEL",
        };
    }
    DomainError::Unexpected(err.to_string())
}
