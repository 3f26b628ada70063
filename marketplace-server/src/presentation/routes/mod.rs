use axum::Router;

use super::AppState;

pub(crate) mod offers;
pub(crate) mod posts;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/offers", offers::router(state))
}
