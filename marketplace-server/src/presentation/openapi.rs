use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::offer::OfferStatus;
use crate::presentation::handlers::offers::{
    CreateOfferDto, ListOffersQuery, ListOffersResponseDto, OfferDto, PaginationQuery,
    UpdateOfferStatusDto,
};
use crate::presentation::handlers::posts::{
    ListPostsQuery, ListPostsResponseDto, PostDto, PostInputDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::offers::list_offers,
        crate::presentation::handlers::offers::list_post_offers,
        crate::presentation::handlers::offers::get_offer,
        crate::presentation::handlers::offers::create_offer,
        crate::presentation::handlers::offers::update_offer_status,
        crate::presentation::handlers::offers::delete_offer
    ),
    components(
        schemas(
            PostInputDto,
            ListPostsQuery,
            PostDto,
            ListPostsResponseDto,
            CreateOfferDto,
            UpdateOfferStatusDto,
            ListOffersQuery,
            PaginationQuery,
            OfferDto,
            ListOffersResponseDto,
            OfferStatus
        )
    ),
    tags(
        (name = "posts", description = "Car requests published by users"),
        (name = "offers", description = "Dealer offers against posts")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
