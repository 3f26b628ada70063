use std::sync::Arc;

use crate::application::offer_service::OfferService;
use crate::application::post_service::PostService;
use crate::data::repositories::postgres::offer_repository::PostgresOfferRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod app_error;
pub(crate) mod extract;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

pub(crate) type AppPostService = PostService<PostgresPostRepository>;
pub(crate) type AppOfferService = OfferService<PostgresOfferRepository, PostgresPostRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: Arc<AppPostService>,
    pub(crate) offer_service: Arc<AppOfferService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        post_service: Arc<AppPostService>,
        offer_service: Arc<AppOfferService>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            post_service,
            offer_service,
            jwt,
        }
    }
}
