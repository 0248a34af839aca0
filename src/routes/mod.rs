use crate::models::AppState;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use http::{Request, Response, StatusCode};
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::Any;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

mod api_routes;
mod webhooks;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn init(state: AppState) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<axum::body::Body>| {
            tracing::info_span!("http", method = %request.method(), path = request.uri().path())
        })
        .on_request(|_request: &Request<axum::body::Body>, _span: &Span| {
            tracing::debug!("Запрос принят")
        })
        .on_response(|response: &Response<axum::body::Body>, latency: Duration, _span: &Span| {
            tracing::debug!("Ответ {} за {latency:?}", response.status())
        })
        .on_failure(|error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
            tracing::error!("Запрос завершился ошибкой {error} через {latency:?}")
        });
    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api",
            api_routes::init(state.clone()).merge(webhooks::init(state)),
        )
        .layer(trace)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(cors)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok").into_response()
}
