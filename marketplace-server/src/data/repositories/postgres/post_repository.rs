use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::data::post_repository::{NewPost, Pagination, PostFilter, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostFields};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    user_id: String,
    title: String,
    car_make: Option<String>,
    car_model: Option<String>,
    car_year: Option<String>,
    zip_code: Option<String>,
    radius: Option<f64>,
    mileage: Option<f64>,
    trim: Option<String>,
    color: Option<String>,
    drivetrain: Option<String>,
    image_url: Option<String>,
    price: f64,
    additional_information: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let fields = input.fields;
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (
                user_id, title, car_make, car_model, car_year, zip_code, radius, mileage,
                trim, color, drivetrain, image_url, price, additional_information
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING
                id, user_id, title, car_make, car_model, car_year, zip_code, radius, mileage,
                trim, color, drivetrain, image_url, price, additional_information,
                created_at, updated_at
            "#,
        )
        .bind(input.user_id)
        .bind(fields.title)
        .bind(fields.car_make)
        .bind(fields.car_model)
        .bind(fields.car_year)
        .bind(fields.zip_code)
        .bind(fields.radius)
        .bind(fields.mileage)
        .bind(fields.trim)
        .bind(fields.color)
        .bind(fields.drivetrain)
        .bind(fields.image_url)
        .bind(fields.price)
        .bind(fields.additional_information)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                id, user_id, title, car_make, car_model, car_year, zip_code, radius, mileage,
                trim, color, drivetrain, image_url, price, additional_information,
                created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: &str,
        fields: PostFields,
    ) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = $3,
                car_make = $4,
                car_model = $5,
                car_year = $6,
                zip_code = $7,
                radius = $8,
                mileage = $9,
                trim = $10,
                color = $11,
                drivetrain = $12,
                image_url = $13,
                price = $14,
                additional_information = $15,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING
                id, user_id, title, car_make, car_model, car_year, zip_code, radius, mileage,
                trim, color, drivetrain, image_url, price, additional_information,
                created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .bind(fields.title)
        .bind(fields.car_make)
        .bind(fields.car_model)
        .bind(fields.car_year)
        .bind(fields.zip_code)
        .bind(fields.radius)
        .bind(fields.mileage)
        .bind(fields.trim)
        .bind(fields.color)
        .bind(fields.drivetrain)
        .bind(fields.image_url)
        .bind(fields.price)
        .bind(fields.additional_information)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                id, user_id, title, car_make, car_model, car_year, zip_code, radius, mileage,
                trim, color, drivetrain, image_url, price, additional_information,
                created_at, updated_at
            FROM posts
            WHERE ($1::TEXT IS NULL OR user_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(filter.user_id.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }

    async fn total_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM posts
            WHERE ($1::TEXT IS NULL OR user_id = $1)
            "#,
        )
        .bind(filter.user_id.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(count)
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    let fields = PostFields {
        title: row.title,
        car_make: row.car_make,
        car_model: row.car_model,
        car_year: row.car_year,
        zip_code: row.zip_code,
        radius: row.radius,
        mileage: row.mileage,
        trim: row.trim,
        color: row.color,
        drivetrain: row.drivetrain,
        image_url: row.image_url,
        price: row.price,
        additional_information: row.additional_information,
    };

    Post::new(row.id, row.user_id, fields, row.created_at, row.updated_at)
        .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Unexpected(err.to_string())
}
