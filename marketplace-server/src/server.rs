use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::settings::Settings;
use crate::presentation::middleware::cors::apply_cors;
use crate::presentation::middleware::limits::apply_limits;
use crate::presentation::middleware::trace::apply_trace;
use crate::presentation::openapi::ApiDoc;
use crate::presentation::{AppState, http_handlers};

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let app = apply_limits(
        app,
        settings.http_request_body_limit_bytes,
        settings.http_concurrency_limit,
        Duration::from_secs(settings.http_request_timeout_secs),
    );
    let app = apply_trace(app);
    let app = apply_cors(app, &settings.cors_origins)?;

    let listener = TcpListener::bind(&settings.http_addr).await?;

    info!("HTTP server listening on {}", settings.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

pub(crate) fn build_router(state: AppState) -> Router {
    http_handlers::routes(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::build_router;
    use crate::application::offer_service::OfferService;
    use crate::application::post_service::PostService;
    use crate::data::repositories::postgres::offer_repository::PostgresOfferRepository;
    use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
    use crate::infrastructure::jwt::JwtService;
    use crate::infrastructure::jwt::tests::{SECRET, issue_token};
    use crate::presentation::AppState;
    use crate::presentation::middleware::limits::apply_limits;

    // The pool never connects: every request below is answered before a query runs.
    fn state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://marketplace@127.0.0.1:1/marketplace")
            .expect("lazy pool must build");
        let post_repo = PostgresPostRepository::new(pool.clone());
        let offer_repo = PostgresOfferRepository::new(pool);

        AppState::new(
            Arc::new(PostService::new(post_repo.clone())),
            Arc::new(OfferService::new(offer_repo, post_repo)),
            Arc::new(JwtService::new(SECRET, None, None)),
        )
    }

    #[tokio::test]
    async fn healthz_answers_ok() {
        let response = build_router(state())
            .oneshot(
                Request::get("/healthz")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router must answer");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = build_router(state())
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router must answer");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let doc: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert!(doc["paths"]["/api/offers/{id}/status"]["patch"].is_object());
    }

    #[tokio::test]
    async fn creating_offer_without_token_is_unauthorized() {
        let response = build_router(state())
            .oneshot(
                Request::post("/api/offers")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"postId": 1, "carId": "car-1"}"#))
                    .expect("request"),
            )
            .await
            .expect("router must answer");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    async fn error_body(response: axum::response::Response) -> serde_json::Value {
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("error body must be json")
    }

    #[tokio::test]
    async fn unknown_status_label_is_rejected_before_storage() {
        let state = state();
        let token = issue_token(&state.jwt, "auth0|dealer", 60);

        let response = build_router(state)
            .oneshot(
                Request::patch("/api/offers/1/status")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"status": "SOLD"}"#))
                    .expect("request"),
            )
            .await
            .expect("router must answer");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert!(body["error"].as_str().is_some_and(|msg| msg.contains("SOLD")));
    }

    #[tokio::test]
    async fn post_without_price_is_bad_request() {
        let state = state();
        let token = issue_token(&state.jwt, "auth0|buyer", 60);

        let response = build_router(state)
            .oneshot(
                Request::post("/api/posts")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"title": "Need a car"}"#))
                    .expect("request"),
            )
            .await
            .expect("router must answer");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert!(body["error"].as_str().is_some_and(|msg| msg.contains("price")));
    }

    #[tokio::test]
    async fn malformed_path_and_query_are_bad_request() {
        let response = build_router(state())
            .oneshot(
                Request::get("/api/posts/not-a-number")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router must answer");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_body(response).await["error"].is_string());

        let response = build_router(state())
            .oneshot(
                Request::get("/api/offers?offset=-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router must answer");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_by_limits() {
        let app = apply_limits(build_router(state()), 16, 8, Duration::from_secs(5));
        let payload = r#"{"title": "A body well over sixteen bytes", "price": 1}"#;

        let response = app
            .oneshot(
                Request::post("/api/posts")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, payload.len())
                    .body(Body::from(payload))
                    .expect("request"),
            )
            .await
            .expect("router must answer");

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn limits_let_small_requests_through() {
        let app = apply_limits(build_router(state()), 16, 8, Duration::from_secs(5));

        let response = app
            .oneshot(
                Request::get("/healthz")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router must answer");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn forged_token_is_unauthorized() {
        let forger = JwtService::new("another-secret-another-secret-xx", None, None);
        let token = issue_token(&forger, "auth0|dealer", 60);

        let response = build_router(state())
            .oneshot(
                Request::delete("/api/posts/1")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router must answer");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
