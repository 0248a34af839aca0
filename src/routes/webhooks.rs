use axum::{
    extract::State,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use http::StatusCode;
use serde_json::json;
use teloxide::types::Update;

use crate::{models::AppState, tg_bot::Inbound};

pub fn init(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(webhook_status).post(telegram_webhook))
        .route("/set-webhook", get(set_webhook))
        .with_state(state)
}

async fn telegram_webhook(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let update = match serde_json::from_slice::<Update>(&body) {
        Ok(u) => u,
        Err(e) => {
            tracing::error!("Ошибка при десериализации события Telegram: {e:?}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to process update" })),
            );
        }
    };
    match state.dispatcher.handle(Inbound::from(update)).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => {
            tracing::error!("Ошибка обработки события Telegram: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

async fn webhook_status() -> impl IntoResponse {
    Json(json!({ "status": "Telegram bot webhook is active" }))
}

async fn set_webhook(State(state): State<AppState>) -> impl IntoResponse {
    let Some(base) = state.webhook_url.as_deref() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing environment variables" })),
        );
    };
    let url = format!("{base}/api/webhook");
    match state.chat.set_webhook(&url).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true, "url": url }))),
        Err(e) => {
            tracing::error!("Ошибка регистрации webhook: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to set webhook" })),
            )
        }
    }
}
