use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::resolve_pagination;
use crate::application::offer_service::ListOffersResult;
use crate::data::offer_repository::OfferFilter;
use crate::domain::offer::{CreateOfferRequest, Offer, OfferStatus};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::extract::{ApiJson, ApiPath, ApiQuery};
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOfferDto {
    #[validate(range(min = 1))]
    pub(crate) post_id: i64,
    #[validate(length(min = 1))]
    pub(crate) car_id: String,
    pub(crate) additional_message: Option<String>,
    /// Defaults to `PENDING` when omitted.
    pub(crate) status: Option<OfferStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateOfferStatusDto {
    pub(crate) status: OfferStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListOffersQuery {
    pub(crate) post_id: Option<i64>,
    pub(crate) dealer_id: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PaginationQuery {
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OfferDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) car_id: String,
    pub(crate) dealer_id: String,
    pub(crate) additional_message: Option<String>,
    pub(crate) status: OfferStatus,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListOffersResponseDto {
    pub(crate) offers: Vec<OfferDto>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

impl From<Offer> for OfferDto {
    fn from(offer: Offer) -> Self {
        Self {
            id: offer.id,
            post_id: offer.post_id,
            car_id: offer.car_id,
            dealer_id: offer.dealer_id,
            additional_message: offer.additional_message,
            status: offer.status,
            created_at: offer.created_at,
            updated_at: offer.updated_at,
        }
    }
}

impl From<ListOffersResult> for ListOffersResponseDto {
    fn from(result: ListOffersResult) -> Self {
        Self {
            offers: result.offers.into_iter().map(OfferDto::from).collect(),
            limit: result.limit,
            offset: result.offset,
            total: result.total,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/offers",
    tag = "offers",
    params(
        ("postId" = Option<i64>, Query, description = "Only offers for this post"),
        ("dealerId" = Option<String>, Query, description = "Only offers of this dealer"),
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Offers listed", body = ListOffersResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_offers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListOffersQuery>,
) -> AppResult<(StatusCode, Json<ListOffersResponseDto>)> {
    query.validate()?;
    let pagination = resolve_pagination(query.limit, query.offset);
    let filter = OfferFilter {
        post_id: query.post_id,
        dealer_id: query.dealer_id,
    };

    let result = state
        .offer_service
        .list_offers(filter, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ListOffersResponseDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/offers",
    tag = "offers",
    params(
        ("id" = i64, Path, description = "Post id"),
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Offers for the post", body = ListOffersResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_post_offers(
    State(state): State<AppState>,
    ApiPath(post_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<PaginationQuery>,
) -> AppResult<(StatusCode, Json<ListOffersResponseDto>)> {
    query.validate()?;
    let pagination = resolve_pagination(query.limit, query.offset);
    let filter = OfferFilter {
        post_id: Some(post_id),
        dealer_id: None,
    };

    let result = state
        .offer_service
        .list_offers(filter, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ListOffersResponseDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/api/offers/{id}",
    tag = "offers",
    params(
        ("id" = i64, Path, description = "Offer id")
    ),
    responses(
        (status = 200, description = "Offer found", body = OfferDto),
        (status = 404, description = "Offer not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_offer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<(StatusCode, Json<OfferDto>)> {
    let result = state.offer_service.get_offer(id).await?;

    Ok((StatusCode::OK, Json(OfferDto::from(result))))
}

#[utoipa::path(
    post,
    path = "/api/offers",
    tag = "offers",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateOfferDto,
    responses(
        (status = 201, description = "Offer created", body = OfferDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_offer(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(dto): ApiJson<CreateOfferDto>,
) -> AppResult<(StatusCode, Json<OfferDto>)> {
    dto.validate()?;
    let req = CreateOfferRequest {
        post_id: dto.post_id,
        car_id: dto.car_id,
        additional_message: dto.additional_message,
        status: dto.status,
    };

    let result = state
        .offer_service
        .create_offer(&auth.user_id, req)
        .await?;
    tracing::info!(
        offer_id = result.id,
        post_id = result.post_id,
        dealer_id = %result.dealer_id,
        "offer created"
    );

    Ok((StatusCode::CREATED, Json(OfferDto::from(result))))
}

#[utoipa::path(
    patch,
    path = "/api/offers/{id}/status",
    tag = "offers",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Offer id")
    ),
    request_body = UpdateOfferStatusDto,
    responses(
        (status = 200, description = "Status overwritten", body = OfferDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Neither the dealer nor the post owner"),
        (status = 404, description = "Offer not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_offer_status(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<UpdateOfferStatusDto>,
) -> AppResult<(StatusCode, Json<OfferDto>)> {
    let result = state
        .offer_service
        .update_offer_status(&auth.user_id, id, dto.status)
        .await?;
    tracing::info!(offer_id = id, status = %result.status, "offer status updated");

    Ok((StatusCode::OK, Json(OfferDto::from(result))))
}

#[utoipa::path(
    delete,
    path = "/api/offers/{id}",
    tag = "offers",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Offer id")
    ),
    responses(
        (status = 204, description = "Offer deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Offer not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_offer(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.offer_service.delete_offer(&auth.user_id, id).await?;
    tracing::info!(offer_id = id, "offer deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::{CreateOfferDto, UpdateOfferStatusDto};
    use crate::domain::offer::OfferStatus;

    #[test]
    fn create_dto_without_status_leaves_it_unset() {
        let raw = r#"{"postId": 3, "carId": "64f1c0ffee", "additionalMessage": "Can deliver"}"#;
        let dto: CreateOfferDto = serde_json::from_str(raw).expect("dto must parse");

        assert!(dto.validate().is_ok());
        assert_eq!(dto.post_id, 3);
        assert!(dto.status.is_none());
    }

    #[test]
    fn create_dto_rejects_blank_car_id() {
        let raw = r#"{"postId": 3, "carId": ""}"#;
        let dto: CreateOfferDto = serde_json::from_str(raw).expect("dto must parse");
        assert!(dto.validate().is_err());
    }

    #[test]
    fn status_dto_accepts_only_known_labels() {
        let dto: UpdateOfferStatusDto =
            serde_json::from_str(r#"{"status": "ACCEPT"}"#).expect("dto must parse");
        assert_eq!(dto.status, OfferStatus::Accept);

        assert!(serde_json::from_str::<UpdateOfferStatusDto>(r#"{"status": "SOLD"}"#).is_err());
    }
}
