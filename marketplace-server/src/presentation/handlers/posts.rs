use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::resolve_pagination;
use crate::application::post_service::ListPostsResult;
use crate::data::post_repository::PostFilter;
use crate::domain::post::{Post, PostFields};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::extract::{ApiJson, ApiPath, ApiQuery};
use crate::presentation::middleware::auth::AuthenticatedUser;

/// Body of both `POST /api/posts` and `PUT /api/posts/{id}`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostInputDto {
    #[validate(length(min = 1))]
    pub(crate) title: String,
    pub(crate) car_make: Option<String>,
    pub(crate) car_model: Option<String>,
    pub(crate) car_year: Option<String>,
    pub(crate) zip_code: Option<String>,
    pub(crate) radius: Option<f64>,
    pub(crate) mileage: Option<f64>,
    pub(crate) trim: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) drivetrain: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) price: f64,
    pub(crate) additional_information: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListPostsQuery {
    pub(crate) user_id: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) user_id: String,
    pub(crate) title: String,
    pub(crate) car_make: Option<String>,
    pub(crate) car_model: Option<String>,
    pub(crate) car_year: Option<String>,
    pub(crate) zip_code: Option<String>,
    pub(crate) radius: Option<f64>,
    pub(crate) mileage: Option<f64>,
    pub(crate) trim: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) drivetrain: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) price: f64,
    pub(crate) additional_information: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListPostsResponseDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

impl From<PostInputDto> for PostFields {
    fn from(dto: PostInputDto) -> Self {
        Self {
            title: dto.title,
            car_make: dto.car_make,
            car_model: dto.car_model,
            car_year: dto.car_year,
            zip_code: dto.zip_code,
            radius: dto.radius,
            mileage: dto.mileage,
            trim: dto.trim,
            color: dto.color,
            drivetrain: dto.drivetrain,
            image_url: dto.image_url,
            price: dto.price,
            additional_information: dto.additional_information,
        }
    }
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        let fields = post.fields;
        Self {
            id: post.id,
            user_id: post.user_id,
            title: fields.title,
            car_make: fields.car_make,
            car_model: fields.car_model,
            car_year: fields.car_year,
            zip_code: fields.zip_code,
            radius: fields.radius,
            mileage: fields.mileage,
            trim: fields.trim,
            color: fields.color,
            drivetrain: fields.drivetrain,
            image_url: fields.image_url,
            price: fields.price,
            additional_information: fields.additional_information,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<ListPostsResult> for ListPostsResponseDto {
    fn from(result: ListPostsResult) -> Self {
        Self {
            posts: result.posts.into_iter().map(PostDto::from).collect(),
            limit: result.limit,
            offset: result.offset,
            total: result.total,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(
        ("userId" = Option<String>, Query, description = "Only posts of this user"),
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Posts listed", body = ListPostsResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> AppResult<(StatusCode, Json<ListPostsResponseDto>)> {
    query.validate()?;
    let pagination = resolve_pagination(query.limit, query.offset);
    let filter = PostFilter {
        user_id: query.user_id,
    };

    let result = state
        .post_service
        .list_posts(filter, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ListPostsResponseDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    let result = state.post_service.get_post(id).await?;

    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = PostInputDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(dto): ApiJson<PostInputDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let result = state
        .post_service
        .create_post(&auth.user_id, PostFields::from(dto))
        .await?;
    tracing::info!(post_id = result.id, user_id = %result.user_id, "post created");

    Ok((StatusCode::CREATED, Json(PostDto::from(result))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    request_body = PostInputDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<PostInputDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let result = state
        .post_service
        .update_post(&auth.user_id, id, PostFields::from(dto))
        .await?;
    Ok((StatusCode::OK, Json(PostDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.post_service.delete_post(&auth.user_id, id).await?;
    tracing::info!(post_id = id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use validator::Validate;

    use super::{PostDto, PostInputDto};
    use crate::domain::post::{Post, PostFields};

    #[test]
    fn input_dto_reads_camel_case_fields() {
        let raw = r#"{
            "title": "Family SUV",
            "carMake": "Toyota",
            "carModel": "Highlander",
            "zipCode": "94107",
            "radius": 25,
            "price": 32000,
            "additionalInformation": "third row needed"
        }"#;

        let dto: PostInputDto = serde_json::from_str(raw).expect("dto must parse");
        assert!(dto.validate().is_ok());

        let fields = PostFields::from(dto);
        assert_eq!(fields.car_make.as_deref(), Some("Toyota"));
        assert_eq!(fields.zip_code.as_deref(), Some("94107"));
        assert_eq!(fields.radius, Some(25.0));
        assert_eq!(fields.price, 32000.0);
    }

    #[test]
    fn input_dto_requires_price() {
        let raw = r#"{"title": "No budget"}"#;
        assert!(serde_json::from_str::<PostInputDto>(raw).is_err());
    }

    #[test]
    fn input_dto_rejects_empty_title() {
        let raw = r#"{"title": "", "price": 100}"#;
        let dto: PostInputDto = serde_json::from_str(raw).expect("dto must parse");
        assert!(dto.validate().is_err());
    }

    #[test]
    fn input_dto_accepts_long_title() {
        let raw = format!(r#"{{"title": "{}", "price": 100}}"#, "x".repeat(400));
        let dto: PostInputDto = serde_json::from_str(&raw).expect("dto must parse");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn post_dto_writes_camel_case_fields() {
        let now = Utc::now();
        let post = Post::new(
            9,
            "auth0|buyer",
            PostFields {
                title: "Hatchback".to_string(),
                image_url: Some("https://img.test/1.png".to_string()),
                price: 9000.0,
                ..Default::default()
            },
            now,
            now,
        )
        .expect("valid post");

        let json = serde_json::to_value(PostDto::from(post)).expect("serialize");
        assert_eq!(json["userId"], "auth0|buyer");
        assert_eq!(json["imageUrl"], "https://img.test/1.png");
        assert!(json.get("createdAt").is_some());
    }
}
