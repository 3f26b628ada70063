use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, patch, post};

use crate::presentation::AppState;
use crate::presentation::handlers::offers::{
    create_offer, delete_offer, get_offer, list_offers, update_offer_status,
};
use crate::presentation::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_offers))
        .route("/{id}", get(get_offer));

    let protected = Router::new()
        .route("/", post(create_offer))
        .route("/{id}", delete(delete_offer))
        .route("/{id}/status", patch(update_offer_status))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}
