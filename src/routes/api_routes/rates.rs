use crate::models::{AppState, RateUpdate};
use crate::AppError;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::json;

pub(super) async fn rates(State(state): State<AppState>) -> impl IntoResponse {
    match state.rate_storage.get_all().await {
        Ok(rates) => (StatusCode::OK, Json(json!({ "rates": rates }))).into_response(),
        Err(err) => {
            tracing::error!("Ошибка чтения курсов: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch rates" })),
            )
                .into_response()
        }
    }
}

pub(super) async fn update_rate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<RateUpdate>,
) -> impl IntoResponse {
    if !payload.is_valid() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "tryRate must be a positive number" })),
        )
            .into_response();
    }
    match state.rate_storage.update(id, payload.try_rate).await {
        Ok(Some(rate)) => (StatusCode::OK, Json(json!(rate))).into_response(),
        Ok(None) => {
            let err = AppError::NotFound(format!("rate {id}"));
            (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))).into_response()
        }
        Err(err) => {
            tracing::error!("Ошибка обновления курса {id}: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to update rate" })),
            )
                .into_response()
        }
    }
}
